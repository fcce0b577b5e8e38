//! Searching directory trees for files by name
//!
//! A [`PathMatch`] decides whether a bare entry name is wanted;
//! [`find_in_path`] and [`find_in_paths`] walk directories and collect the
//! full paths of matching entries. Hidden entries (names starting with `.`)
//! are never visited and symbolic links to directories are not descended.

use crate::error::{FsError, Result};
use crate::filesystem::{EntryType, TypedDirScanner};
use regex::Regex;
use tracing::{debug, error};

/// Predicate over entry names
pub trait PathMatch {
    /// True if `name` is wanted
    fn is_match(&self, name: &str) -> bool;
}

/// Matches every name
#[derive(Debug, Clone, Copy, Default)]
pub struct PathMatchAny;

impl PathMatch for PathMatchAny {
    fn is_match(&self, _name: &str) -> bool {
        true
    }
}

/// Matches names containing a regular expression
///
/// The expression is searched for anywhere in the name; anchor it with `^`
/// and `$` to require a whole-name match.
#[derive(Debug, Clone)]
pub struct PathMatchRegex {
    regex: Regex,
}

impl PathMatchRegex {
    /// Compile `pattern`
    ///
    /// # Errors
    ///
    /// `Param` (logged) if the expression does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            error!("PathMatchRegex: {}", e);
            FsError::Param
        })?;
        Ok(Self { regex })
    }
}

impl PathMatch for PathMatchRegex {
    fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Matches whole names against a shell-style wildcard
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character, and everything else matches itself.
///
/// The match is anchored at both ends: `*.mxf` accepts `reel1.mxf` but not
/// `reel1.mxf.bak`. A `?` never matches an empty position, so `reel?.wav`
/// rejects `reel.wav`.
#[derive(Debug, Clone)]
pub struct PathMatchGlob {
    regex: Regex,
}

impl PathMatchGlob {
    /// Compile `glob`
    ///
    /// # Errors
    ///
    /// `Param` (logged) if the translated expression does not compile, which
    /// can only happen when it exceeds the regex size limit.
    pub fn new(glob: &str) -> Result<Self> {
        let mut pattern = String::with_capacity(glob.len() * 2 + 2);
        pattern.push('^');
        let mut literal = [0u8; 4];
        for c in glob.chars() {
            match c {
                '*' => pattern.push_str(".*"),
                '?' => pattern.push('.'),
                _ => pattern.push_str(&regex::escape(c.encode_utf8(&mut literal))),
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| {
            error!("PathMatchGlob: {}", e);
            FsError::Param
        })?;
        Ok(Self { regex })
    }
}

impl PathMatch for PathMatchGlob {
    fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Collect paths beneath `dir` whose names satisfy `pattern`
///
/// Found paths are appended to `found` as `dir + separator + ... + name`, in
/// directory-stream order, depth first. Directories that cannot be read are
/// skipped.
///
/// Names beginning with `.` are neither matched nor descended into.
/// Directories are descended but never matched themselves. Links, including
/// links to directories, are matched like files and never descended.
///
/// # Parameters
///
/// * `pattern` - Predicate applied to each entry name
/// * `dir` - Directory to search beneath
/// * `found` - Receives matching paths; existing contents are kept
/// * `one_shot` - Stop at the first match. This ends the whole walk, not
///   just the directory where the match was found.
/// * `separator` - Separator used to build the appended paths
///
/// # Returns
///
/// Returns true if anything was appended.
///
/// # Examples
///
/// ```rust,no_run
/// use fsport::find::{find_in_path, PathMatchGlob};
/// use fsport::path::NATIVE_SEPARATOR;
///
/// # fn example() -> fsport::Result<()> {
/// let mut found = Vec::new();
/// let mxf = PathMatchGlob::new("*.mxf")?;
/// if find_in_path(&mxf, "/media/package", &mut found, false, NATIVE_SEPARATOR) {
///     println!("{} reels", found.len());
/// }
/// # Ok(())
/// # }
/// ```
pub fn find_in_path(
    pattern: &dyn PathMatch,
    dir: &str,
    found: &mut Vec<String>,
    one_shot: bool,
    separator: char,
) -> bool {
    let before = found.len();
    let mut stack: Vec<(TypedDirScanner, String)> = Vec::new();
    if let Some(scanner) = open_for_search(dir) {
        stack.push((scanner, dir.to_owned()));
    }

    while let Some((scanner, current)) = stack.last_mut() {
        let entry = match scanner.next_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                stack.pop();
                continue;
            }
            Err(e) => {
                debug!("FindInPath {}: {}", current, e);
                stack.pop();
                continue;
            }
        };

        if entry.name.starts_with('.') {
            continue;
        }

        let child = format!("{current}{separator}{}", entry.name);
        if entry.kind == EntryType::Directory {
            if let Some(child_scanner) = open_for_search(&child) {
                stack.push((child_scanner, child));
            }
        } else if pattern.is_match(&entry.name) {
            found.push(child);
            if one_shot {
                break;
            }
        }
    }

    found.len() > before
}

fn open_for_search(dir: &str) -> Option<TypedDirScanner> {
    TypedDirScanner::open(dir)
        .map_err(|e| debug!("FindInPath {}: {}", dir, e))
        .ok()
}

/// [`find_in_path`] over each of `roots` in turn
///
/// With `one_shot`, stops after the first root that yields a match.
///
/// Returns true if anything was appended.
pub fn find_in_paths<S: AsRef<str>>(
    pattern: &dyn PathMatch,
    roots: &[S],
    found: &mut Vec<String>,
    one_shot: bool,
    separator: char,
) -> bool {
    let before = found.len();
    for root in roots {
        if find_in_path(pattern, root.as_ref(), found, one_shot, separator) && one_shot {
            break;
        }
    }
    found.len() > before
}
