//! Lexical canonicalization and absolutization
//!
//! Canonicalization only looks at the text of a path. It never consults the
//! filesystem and never resolves symbolic links, so `a/link/..` collapses to
//! `a` even when `link` points somewhere else entirely. Use
//! [`crate::path::resolve_links`] when link semantics matter.

use super::components::{is_absolute, join, join_absolute, split, ComponentList};
use super::NATIVE_SEPARATOR;
use tracing::error;

/// Reduce a component list by dropping `.` and letting `..` pop its parent
///
/// A `..` with nothing left to pop is dropped, so a path can never climb
/// above its starting point (or above the root).
pub(crate) fn canonical_components<I, S>(components: I) -> ComponentList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = ComponentList::new();
    for component in components {
        match component.as_ref() {
            "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other.to_owned()),
        }
    }
    out
}

/// Lexically collapse `.` and `..` segments
///
/// The result is absolute exactly when the input is.
///
/// ```
/// use fsport::path::canonicalize;
///
/// assert_eq!(canonicalize("/a/b/../c", '/'), "/a/c");
/// assert_eq!(canonicalize("/a/../../b", '/'), "/b");
/// assert_eq!(canonicalize("a/./b", '/'), "a/b");
/// ```
#[must_use]
pub fn canonicalize(path: &str, separator: char) -> String {
    let components = canonical_components(split(path, separator));
    if is_absolute(path, separator) {
        join_absolute(&components, separator)
    } else {
        join(&components, separator)
    }
}

/// The process's current working directory as a string
///
/// Returns the empty string (and logs an error) if the directory cannot be
/// determined. The value is queried on every call so that a process which
/// changes directory between calls always sees the current one.
#[must_use]
pub fn cwd() -> String {
    match std::env::current_dir() {
        Ok(dir) => dir.to_string_lossy().into_owned(),
        Err(e) => {
            error!("Error retrieving current working directory: {}", e);
            String::new()
        }
    }
}

/// Make `path` absolute and canonical
///
/// An empty path yields the root. A relative path is appended to the current
/// working directory before canonicalizing.
#[must_use]
pub fn make_absolute(path: &str, separator: char) -> String {
    if path.is_empty() {
        return separator.to_string();
    }

    if is_absolute(path, separator) {
        return canonicalize(path, separator);
    }

    let mut joined = cwd();
    joined.push(separator);
    joined.push_str(path);
    join_absolute(&canonical_components(split(&joined, separator)), separator)
}

/// True iff both paths absolutize to the same string
///
/// This is a textual comparison using the native separator, not an identity
/// check: two different spellings that reach the same inode through a link
/// compare unequal.
#[must_use]
pub fn paths_are_equivalent(lhs: &str, rhs: &str) -> bool {
    make_absolute(lhs, NATIVE_SEPARATOR) == make_absolute(rhs, NATIVE_SEPARATOR)
}

/// Strip `parent` from the front of `path`
///
/// The comparison is component-wise, so `/foo` is a prefix of `/foo/x` but
/// not of `/foobar/x`. When `parent` is not a prefix, `path` is returned
/// unchanged. The remainder is returned in relative form.
#[must_use]
pub fn make_local(path: &str, parent: &str, separator: char) -> String {
    let path_components = split(path, separator);
    let parent_components = split(parent, separator);

    let is_prefix = is_absolute(path, separator) == is_absolute(parent, separator)
        && parent_components.len() <= path_components.len()
        && parent_components
            .iter()
            .zip(&path_components)
            .all(|(a, b)| a == b);

    if !is_prefix {
        return path.to_owned();
    }

    join(&path_components[parent_components.len()..], separator)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[rstest]
    #[case("/a/b/../c", "/a/c")]
    #[case("/a/../../b", "/b")]
    #[case("a/./b", "a/b")]
    #[case("../x", "x")]
    #[case("/..", "/")]
    #[case("", "")]
    #[case("/", "/")]
    #[case("./", "")]
    #[case("a/b/c/../../d/./e/", "a/d/e")]
    fn test_canonicalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canonicalize(input, '/'), expected);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for path in [
            "/a/b/../c",
            "a/./b/../../..",
            "//x//y/.",
            "..",
            "/srv/media/../media/./reel",
        ] {
            let once = canonicalize(path, '/');
            assert_eq!(canonicalize(&once, '/'), once, "path {path:?}");
        }
    }

    #[test]
    fn test_canonicalize_preserves_absoluteness() {
        for path in ["/..", "/a/..", "a/..", "", "/", "x/../../y"] {
            assert_eq!(
                is_absolute(path, '/'),
                is_absolute(&canonicalize(path, '/'), '/'),
                "path {path:?}"
            );
        }
    }

    #[test]
    fn test_canonicalize_with_foreign_separator() {
        assert_eq!(canonicalize("\\a\\b\\..\\c", '\\'), "\\a\\c");
        // '/' is an ordinary character when the separator is '\'
        assert_eq!(canonicalize("a/..\\b", '\\'), "a/..\\b");
    }

    #[test]
    fn test_make_absolute_of_absolute_path() {
        assert_eq!(make_absolute("/a/./b/..", '/'), "/a");
        assert_eq!(make_absolute("", '/'), "/");
    }

    #[test]
    #[serial]
    fn test_make_absolute_follows_cwd_changes() {
        let first = tempfile::TempDir::new().unwrap();
        let second = tempfile::TempDir::new().unwrap();
        let original = std::env::current_dir().unwrap();
        let relative = format!("x{NATIVE_SEPARATOR}..{NATIVE_SEPARATOR}y");

        std::env::set_current_dir(first.path()).unwrap();
        let under_first = make_absolute(&relative, NATIVE_SEPARATOR);
        std::env::set_current_dir(second.path()).unwrap();
        let under_second = make_absolute(&relative, NATIVE_SEPARATOR);
        std::env::set_current_dir(original).unwrap();

        assert!(under_first.ends_with("y"));
        assert!(under_second.ends_with("y"));
        assert_ne!(under_first, under_second);
    }

    #[test]
    #[serial]
    fn test_paths_are_equivalent() {
        let here = cwd();
        let sep = NATIVE_SEPARATOR;
        assert!(paths_are_equivalent(&format!("a{sep}b{sep}..{sep}c"), &format!("a{sep}c")));
        assert!(paths_are_equivalent(&format!("{here}{sep}a"), "a"));
        assert!(!paths_are_equivalent("a", "b"));
    }

    #[rstest]
    #[case("/foo/x/y", "/foo", "x/y")]
    #[case("/foo", "/foo", "")]
    #[case("/foobar/x", "/foo", "/foobar/x")]
    #[case("/foo/x", "/foo/", "x")]
    #[case("rel/a", "rel", "a")]
    #[case("rel/a", "/rel", "rel/a")]
    #[case("/a", "/a/b", "/a")]
    fn test_make_local(#[case] path: &str, #[case] parent: &str, #[case] expected: &str) {
        assert_eq!(make_local(path, parent, '/'), expected);
    }
}
