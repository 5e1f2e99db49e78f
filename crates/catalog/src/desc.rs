//! Package descriptor (`desc`) parsing.
//!
//! Every package in a sync or local database is a directory holding a `desc`
//! file made of `%FIELD%` markers, each followed by the field's value lines.
//! Only the name, version and description are read.
//!
//! Markers toggle a per-field flag rather than set it, so a marker repeated
//! before its value turns capture back off. A non-marker line is captured by
//! the first active field in the order name, version, description, and
//! capture for that field then stops. Lines are compared after trimming and
//! collapsing whitespace runs, and bytes that aren't UTF-8 are replaced.

use crate::error::{ErrorKind, Result};
use crate::record::PackageRecord;
use derive_more::Display;
use exn::ResultExt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File name of a package descriptor inside its package directory.
pub const DESC_FILE: &str = "desc";

const NAME_MARKER: &str = "%NAME%";
const VERSION_MARKER: &str = "%VERSION%";
const DESC_MARKER: &str = "%DESC%";

#[derive(Debug, Default)]
struct Capture {
    name: bool,
    version: bool,
    desc: bool,
}

/// Parses a descriptor stream into a record with `repo` and `local_version`
/// left empty.
///
/// Fields that never get a value stay empty. Fails only if reading fails.
///
/// ```
/// use karun_catalog::desc;
///
/// let record = desc::parse("%NAME%\nlinux\n\n%VERSION%\n6.9.1-1\n".as_bytes()).unwrap();
/// assert_eq!(record.name, "linux");
/// assert_eq!(record.repo_version, "6.9.1-1");
/// assert!(record.description.is_empty());
/// ```
pub fn parse(mut reader: impl BufRead) -> Result<PackageRecord> {
    let mut record = PackageRecord::default();
    let mut capture = Capture::default();
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).or_raise(|| ErrorKind::MalformedRecord)? == 0 {
            break;
        }
        let line = normalize_space(&String::from_utf8_lossy(&buffer));
        match line.as_str() {
            NAME_MARKER => capture.name = !capture.name,
            VERSION_MARKER => capture.version = !capture.version,
            DESC_MARKER => capture.desc = !capture.desc,
            _ if capture.name => {
                record.name = line;
                capture.name = false;
            },
            _ if capture.version => {
                record.repo_version = line;
                capture.version = false;
            },
            _ if capture.desc => {
                record.description = line;
                capture.desc = false;
            },
            _ => {},
        }
    }
    Ok(record)
}

/// Outcome of reading one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Parsed(PackageRecord),
    /// The directory can't contribute a record; the build carries on.
    Skipped { path: PathBuf, reason: SkipReason },
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[display("no descriptor file")]
    Missing,
    #[display("descriptor cannot be opened: {_0}")]
    Unreadable(io::ErrorKind),
    #[display("descriptor read failed part-way")]
    Malformed,
    #[display("descriptor has no package name")]
    Nameless,
}

/// Reads the descriptor of the package directory `dir`.
pub fn read_package(dir: &Path) -> Descriptor {
    let path = dir.join(DESC_FILE);
    let skip = |reason| Descriptor::Skipped { path: path.clone(), reason };
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return skip(SkipReason::Missing),
        Err(err) => return skip(SkipReason::Unreadable(err.kind())),
    };
    match parse(BufReader::new(file)) {
        Ok(record) if record.name.is_empty() => skip(SkipReason::Nameless),
        Ok(record) => Descriptor::Parsed(record),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = ?err, "Descriptor read failed");
            skip(SkipReason::Malformed)
        },
    }
}

fn normalize_space(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    const LINUX_DESC: &str = "\
%FILENAME%
linux-6.9.1.arch1-1-x86_64.pkg.tar.zst

%NAME%
linux

%BASE%
linux

%VERSION%
6.9.1.arch1-1

%DESC%
The Linux kernel and modules

%CSIZE%
139117564

%DEPENDS%
coreutils
kmod
";

    fn parse_str(content: &str) -> PackageRecord {
        parse(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_sync_descriptor() {
        let record = parse_str(LINUX_DESC);
        assert_eq!(record.name, "linux");
        assert_eq!(record.repo_version, "6.9.1.arch1-1");
        assert_eq!(record.description, "The Linux kernel and modules");
        assert!(record.repo.is_empty());
        assert!(record.local_version.is_empty());
    }

    #[test]
    fn test_repeated_marker_toggles_capture_off() {
        let record = parse_str("%NAME%\n%NAME%\nfoo\n%VERSION%\n1.0\n");
        assert_eq!(record.name, "");
        assert_eq!(record.repo_version, "1.0");
    }

    #[test]
    fn test_name_captures_before_version() {
        // Both flags are active when "a" arrives; name takes it, version takes "b".
        let record = parse_str("%VERSION%\n%NAME%\na\nb\nc\n");
        assert_eq!(record.name, "a");
        assert_eq!(record.repo_version, "b");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_only_first_value_line_is_kept() {
        let record = parse_str("%DESC%\nfirst line\nsecond line\n");
        assert_eq!(record.description, "first line");
    }

    #[test]
    fn test_blank_line_is_a_value() {
        let record = parse_str("%NAME%\n\nfoo\n");
        assert_eq!(record.name, "");
    }

    #[rstest]
    #[case("  %NAME%  \r\n  foo  \r\n", "foo")]
    #[case("%NAME%\nlib\t32 \t foo", "lib 32 foo")]
    #[case("\t%NAME%\n\u{a0}bar\u{a0}\n", "bar")]
    fn test_whitespace_is_normalized(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(parse_str(content).name, expected);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let record = parse(&b"%NAME%\nfo\xffo\n"[..]).unwrap();
        assert_eq!(record.name, "fo\u{fffd}o");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_str(""), PackageRecord::default());
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_str(LINUX_DESC), parse_str(LINUX_DESC));
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::other("device went away"));
            }
            self.served = true;
            let chunk = b"%NAME%\nfoo\n";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_read_failure_is_malformed() {
        let err = parse(BufReader::new(FailingReader { served: false })).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedRecord));
    }

    #[test]
    fn test_read_package() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DESC_FILE), LINUX_DESC).unwrap();
        let Descriptor::Parsed(record) = read_package(dir.path()) else {
            panic!("expected a parsed descriptor");
        };
        assert_eq!(record.name, "linux");
    }

    #[test]
    fn test_read_package_without_desc() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            read_package(dir.path()),
            Descriptor::Skipped { path: dir.path().join(DESC_FILE), reason: SkipReason::Missing },
        );
    }

    #[test]
    fn test_read_package_without_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DESC_FILE), "%VERSION%\n1.0\n").unwrap();
        assert!(matches!(
            read_package(dir.path()),
            Descriptor::Skipped { reason: SkipReason::Nameless, .. }
        ));
    }

    #[test]
    fn test_read_package_desc_is_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(DESC_FILE)).unwrap();
        // Opening a directory succeeds on Linux but reading it fails.
        assert!(matches!(
            read_package(dir.path()),
            Descriptor::Skipped { reason: SkipReason::Malformed | SkipReason::Unreadable(_), .. }
        ));
    }
}
