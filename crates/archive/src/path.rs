//! Archive entry name sanitization.
//!
//! Tar entry names are attacker-controlled. Before one is joined to the
//! destination directory it is normalised component by component so that it
//! can never resolve outside of that directory.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Normalises a tar entry name into a path relative to the destination.
///
/// - Leading `/` and `.` components are dropped (`/etc/x` lands in `etc/x`).
/// - `..` is resolved against the components seen so far; popping past the
///   destination root is rejected with [`UnsafeEntry`](ErrorKind::UnsafeEntry).
/// - NUL bytes and platform prefixes are rejected.
///
/// An entry that normalises to nothing (`./`) is not an error: the empty path
/// is returned and the caller decides to skip it.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use karun_archive::sanitize_entry_path;
/// assert_eq!(sanitize_entry_path("linux-6.9.1-1/desc").unwrap(), Path::new("linux-6.9.1-1/desc"));
/// assert_eq!(sanitize_entry_path("./linux-6.9.1-1/").unwrap(), Path::new("linux-6.9.1-1"));
/// assert!(sanitize_entry_path("../evil").is_err());
/// assert!(sanitize_entry_path("a/../../b").is_err());
/// ```
pub fn sanitize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::UnsafeEntry(path.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::UnsafeEntry(path.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::UnsafeEntry(path.to_path_buf()));
                }
            },
        }
    }
    Ok(components.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("linux-6.9.1-1/desc", "linux-6.9.1-1/desc")]
    #[case("linux-6.9.1-1/", "linux-6.9.1-1")]
    #[case("a//b//c", "a/b/c")]
    #[case("a/./b/./c", "a/b/c")]
    // Absolute entries are re-rooted inside the destination.
    #[case("/etc/passwd", "etc/passwd")]
    // Traversal that stays inside the destination is resolved.
    #[case("a/b/../c", "a/c")]
    #[case("a/b/..", "a")]
    fn test_normalised(#[case] entry: &str, #[case] expected: &str) {
        assert_eq!(sanitize(entry).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("../evil")]
    #[case("..")]
    #[case("../..")]
    #[case("a/../../b")]
    #[case("./../evil")]
    #[case("a\0b")]
    fn test_rejected(#[case] entry: &str) {
        let err = sanitize(entry).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsafeEntry(_)));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("./")]
    #[case("//")]
    #[case("a/..")]
    fn test_empty(#[case] entry: &str) {
        assert_eq!(sanitize(entry).unwrap(), PathBuf::new());
    }
}
