//! Symbolic link resolution
//!
//! Resolution walks a canonical path one component at a time. After each
//! component is appended, the accumulated prefix is read as a link; when it
//! is one, the accumulator is replaced by the (canonicalized) target and the
//! new prefix is examined again, so chains of links are followed to the end
//! before moving on. Relative targets are re-rooted at the directory holding
//! the link being resolved, not at the input path.
//!
//! Every successful link read costs one hop. Resolution fails with
//! [`FsError::TooManyLinks`] once the hop budget is spent, which also
//! terminates link cycles.

use super::canonical::canonicalize;
use super::components::{dirname, is_absolute, join_absolute, path_join, split, ComponentList};
use crate::error::{FsError, Result};
use crate::sys;
use tracing::{debug, error};

/// Hop budget matching the Linux kernel's `MAXSYMLINKS`
pub const DEFAULT_MAX_LINK_HOPS: usize = 40;

/// Source of symbolic link targets
///
/// Implemented by [`HostLinks`] for the real filesystem; tests and callers
/// with their own namespace can supply another implementation.
pub trait ReadLink {
    /// Read `path` as a symbolic link
    ///
    /// Returns `Ok(Some(target))` for a link, `Ok(None)` when the path exists
    /// but is not a link.
    ///
    /// # Errors
    ///
    /// Any other failure (missing path, permission denied, I/O error) aborts
    /// resolution and is propagated unchanged.
    fn read_link(&self, path: &str) -> Result<Option<String>>;
}

/// Link reads against the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostLinks;

impl ReadLink for HostLinks {
    fn read_link(&self, path: &str) -> Result<Option<String>> {
        sys::read_link(path).map_err(|e| {
            error!("{}: readlink: {}", path, e);
            FsError::from_lookup(&e)
        })
    }
}

/// Resolves symbolic links with a fixed separator and hop budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkResolver {
    separator: char,
    max_hops: usize,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(super::NATIVE_SEPARATOR, DEFAULT_MAX_LINK_HOPS)
    }
}

impl LinkResolver {
    /// Create a resolver
    #[must_use]
    pub const fn new(separator: char, max_hops: usize) -> Self {
        Self {
            separator,
            max_hops,
        }
    }

    /// Separator this resolver splits and joins with
    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Maximum number of links followed before giving up
    #[must_use]
    pub const fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Resolve every symbolic link in `path` against the host filesystem
    ///
    /// On platforms without symbolic links the input is returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the first link-read failure other than "not a link", or
    /// `TooManyLinks` when the hop budget is exhausted.
    pub fn resolve(&self, path: &str) -> Result<String> {
        if !sys::HAS_SYMLINKS {
            return Ok(path.to_owned());
        }
        self.resolve_with(path, &HostLinks)
    }

    /// Resolve every symbolic link in `path` using `links` as the link source
    ///
    /// The input is treated as rooted: `a/b` is resolved as `/a/b`. The result
    /// is always absolute and canonical.
    ///
    /// # Errors
    ///
    /// Propagates the first error from `links`, or `TooManyLinks` when the
    /// hop budget is exhausted.
    pub fn resolve_with<L: ReadLink + ?Sized>(&self, path: &str, links: &L) -> Result<String> {
        let sep = self.separator;
        let mut hops = 0usize;
        let mut resolved = ComponentList::new();

        for component in split(&canonicalize(path, sep), sep) {
            resolved.push(component);

            loop {
                let current = join_absolute(&resolved, sep);
                let Some(target) = links.read_link(&current)? else {
                    break;
                };

                hops += 1;
                if hops > self.max_hops {
                    error!(
                        "{}: more than {} levels of symbolic links",
                        path, self.max_hops
                    );
                    return Err(FsError::TooManyLinks);
                }

                let next = if is_absolute(&target, sep) {
                    target
                } else {
                    path_join(&[&dirname(&current, sep), &target], sep)
                };
                debug!("{} -> {}", current, next);
                resolved = split(&canonicalize(&next, sep), sep);
            }
        }

        Ok(join_absolute(&resolved, sep))
    }
}

/// Resolve every symbolic link in `path` with the default hop budget
///
/// # Errors
///
/// See [`LinkResolver::resolve`].
pub fn resolve_links(path: &str, separator: char) -> Result<String> {
    LinkResolver::new(separator, DEFAULT_MAX_LINK_HOPS).resolve(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// In-memory link namespace: paths not listed are plain entries
    #[derive(Default)]
    struct LinkTable {
        links: HashMap<String, String>,
        denied: HashSet<String>,
    }

    impl LinkTable {
        fn link(mut self, path: &str, target: &str) -> Self {
            self.links.insert(path.to_owned(), target.to_owned());
            self
        }

        fn deny(mut self, path: &str) -> Self {
            self.denied.insert(path.to_owned());
            self
        }
    }

    impl ReadLink for LinkTable {
        fn read_link(&self, path: &str) -> Result<Option<String>> {
            if self.denied.contains(path) {
                return Err(FsError::NoPerm);
            }
            Ok(self.links.get(path).cloned())
        }
    }

    fn resolver() -> LinkResolver {
        LinkResolver::new('/', DEFAULT_MAX_LINK_HOPS)
    }

    #[test]
    fn test_no_links_is_canonical_identity() {
        let table = LinkTable::default();
        assert_eq!(
            resolver().resolve_with("/a/./b/../c", &table).unwrap(),
            "/a/c"
        );
        assert_eq!(resolver().resolve_with("/", &table).unwrap(), "/");
    }

    #[test]
    fn test_relative_input_is_rooted() {
        let table = LinkTable::default();
        assert_eq!(resolver().resolve_with("a/b", &table).unwrap(), "/a/b");
    }

    #[test]
    fn test_absolute_target_replaces_prefix() {
        let table = LinkTable::default().link("/media/current", "/vol/2024/reels");
        assert_eq!(
            resolver()
                .resolve_with("/media/current/reel1.mxf", &table)
                .unwrap(),
            "/vol/2024/reels/reel1.mxf"
        );
    }

    #[test]
    fn test_relative_chain_resolves_against_each_link() {
        // /d1/l1 -> ../d2/l2 (i.e. /d2/l2), /d2/l2 -> target (i.e. /d2/target)
        let table = LinkTable::default()
            .link("/d1/l1", "../d2/l2")
            .link("/d2/l2", "target");
        assert_eq!(
            resolver().resolve_with("/d1/l1/file", &table).unwrap(),
            "/d2/target/file"
        );
    }

    #[test]
    fn test_link_inside_link_target() {
        let table = LinkTable::default()
            .link("/a", "/b/c")
            .link("/b/c/d", "../e");
        assert_eq!(resolver().resolve_with("/a/d/f", &table).unwrap(), "/b/e/f");
    }

    #[test]
    fn test_link_to_root() {
        let table = LinkTable::default().link("/up", "..");
        assert_eq!(resolver().resolve_with("/up/x", &table).unwrap(), "/x");
    }

    #[test]
    fn test_cycle_terminates_with_too_many_links() {
        let table = LinkTable::default().link("/a", "/b").link("/b", "a");
        assert_eq!(
            resolver().resolve_with("/a/x", &table),
            Err(FsError::TooManyLinks)
        );
    }

    #[test]
    fn test_hop_budget_is_exact() {
        let table = LinkTable::default()
            .link("/l1", "/l2")
            .link("/l2", "/l3")
            .link("/l3", "/end");

        assert_eq!(
            LinkResolver::new('/', 3).resolve_with("/l1", &table).unwrap(),
            "/end"
        );
        assert_eq!(
            LinkResolver::new('/', 2).resolve_with("/l1", &table),
            Err(FsError::TooManyLinks)
        );
    }

    #[test]
    fn test_read_failure_propagates() {
        let table = LinkTable::default().deny("/a/secret");
        assert_eq!(
            resolver().resolve_with("/a/secret/x", &table),
            Err(FsError::NoPerm)
        );
    }

    #[test]
    fn test_foreign_separator() {
        let table = LinkTable::default().link("\\a\\l", "..\\b");
        assert_eq!(
            LinkResolver::new('\\', DEFAULT_MAX_LINK_HOPS)
                .resolve_with("\\a\\l\\c", &table)
                .unwrap(),
            "\\b\\c"
        );
    }

    #[test]
    fn test_default_resolver() {
        let resolver = LinkResolver::default();
        assert_eq!(resolver.separator(), super::super::NATIVE_SEPARATOR);
        assert_eq!(resolver.max_hops(), DEFAULT_MAX_LINK_HOPS);
    }
}
