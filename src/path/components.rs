//! Path component algebra
//!
//! Pure string transformations over paths written with an explicit separator
//! character. Nothing here touches the filesystem and every function is
//! total: odd inputs (empty strings, repeated separators) produce a
//! well-defined result rather than an error.

/// The host's native path separator
pub const NATIVE_SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Ordered, non-empty path segments in left-to-right order
pub type ComponentList = Vec<String>;

/// Split a path into its non-empty components
///
/// Repeated, leading and trailing separators produce no empty segments, so
/// `"/a//b/"` and `"a/b"` both split to `["a", "b"]`.
#[must_use]
pub fn split(path: &str, separator: char) -> ComponentList {
    path.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join components into a relative path (no leading separator)
///
/// An empty list joins to the empty string.
#[must_use]
pub fn join<S: AsRef<str>>(components: &[S], separator: char) -> String {
    let mut out = String::new();
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(component.as_ref());
    }
    out
}

/// Join components into an absolute path
///
/// An empty list yields the separator alone (the root).
#[must_use]
pub fn join_absolute<S: AsRef<str>>(components: &[S], separator: char) -> String {
    if components.is_empty() {
        return separator.to_string();
    }

    let mut out = String::new();
    for component in components {
        out.push(separator);
        out.push_str(component.as_ref());
    }
    out
}

/// True iff `path` is non-empty and starts with the separator
#[must_use]
pub fn is_absolute(path: &str, separator: char) -> bool {
    path.starts_with(separator)
}

/// True iff `path` contains the separator anywhere
#[must_use]
pub fn has_components(path: &str, separator: char) -> bool {
    path.contains(separator)
}

/// Last component of `path`, or the empty string if it has none
#[must_use]
pub fn basename(path: &str, separator: char) -> String {
    path.split(separator)
        .rfind(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_owned()
}

/// All but the last component of `path`
///
/// The result keeps the absoluteness of the input: an absolute path with no
/// remaining components yields the root, a relative one yields `""`.
#[must_use]
pub fn dirname(path: &str, separator: char) -> String {
    let mut components = split(path, separator);
    components.pop();

    if is_absolute(path, separator) {
        join_absolute(&components, separator)
    } else {
        join(&components, separator)
    }
}

/// Text after the last `.` of the basename, or `""` when there is none
#[must_use]
pub fn extension(path: &str, separator: char) -> String {
    let name = basename(path, separator);
    match name.rfind('.') {
        Some(dot) => name[dot + 1..].to_owned(),
        None => String::new(),
    }
}

/// Replace the extension of the basename of `path`
///
/// Only the last extension is stripped (`a.b.c` becomes `a.b`) before
/// `.ext` is appended. An empty `ext` leaves the name without that last
/// extension. Note that only the basename is returned; the directory part of
/// `path` is dropped.
#[must_use]
pub fn set_extension(path: &str, ext: &str, separator: char) -> String {
    let mut name = basename(path, separator);
    if let Some(dot) = name.rfind('.') {
        name.truncate(dot);
    }

    if !ext.is_empty() {
        name.push('.');
        name.push_str(ext);
    }
    name
}

/// Concatenate path fragments with the separator between each pair
///
/// No normalization happens: `path_join(&["a/", "b"], '/')` is `"a//b"`.
#[must_use]
pub fn path_join(parts: &[&str], separator: char) -> String {
    parts.join(separator.to_string().as_str())
}
