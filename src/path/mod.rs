//! Path strings and their algebra
//!
//! Paths are plain strings over an explicit separator character rather than
//! `std::path::Path`, so the same code can reason about POSIX paths on a
//! Windows host (and the reverse) and be tested for either.
//!
//! - [`components`]: split/join and the basename/dirname/extension family
//! - [`canonical`]: lexical `.`/`..` collapse and absolutization
//! - [`links`]: iterative symbolic link resolution

pub mod canonical;
pub mod components;
pub mod links;

pub use canonical::{canonicalize, cwd, make_absolute, make_local, paths_are_equivalent};
pub use components::{
    basename, dirname, extension, has_components, is_absolute, join, join_absolute, path_join,
    set_extension, split, ComponentList, NATIVE_SEPARATOR,
};
pub use links::{resolve_links, HostLinks, LinkResolver, ReadLink, DEFAULT_MAX_LINK_HOPS};
