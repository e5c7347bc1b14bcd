// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Adds and removes configuration bindings in a project Makefile.
//!
//! The edits are computed on a parsed [`MakefileSource`] and returned as new
//! file contents, so they can be inspected before anything is written. The
//! path-based wrappers [`add_configuration`] and [`remove_configuration`]
//! load, edit and write the file in one step.
//!
//! # Example
//! ```
//! use hlgen::binding::BindingKey;
//! use hlgen::project::insert_binding;
//! use hlgen::sources::MakefileSource;
//!
//! let makefile = MakefileSource::parse(
//!     "Makefile",
//!     "# Configure generators\nCFG__blur = P1\n\nall:\n",
//! );
//! let key = BindingKey::new("blur", Some("fast")).unwrap();
//! let edit = insert_binding(&makefile, &key, "vectorize=true").unwrap();
//!
//! assert_eq!(edit.line, 3);
//! assert_eq!(
//!     edit.contents,
//!     "# Configure generators\nCFG__blur = P1\nCFG__blur__fast = vectorize=true\n\nall:\n"
//! );
//! ```

use crate::binding::{BindingKey, BindingValue};
use crate::config::consts::CONFIG_BLOCK_MARKER;
use crate::errors::{EnumerationError, ProjectError};
use crate::observability::messages::project::MakefileEdited;
use crate::observability::messages::StructuredLog;
use crate::sources::{parse_binding_line, MakefileSource};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// New Makefile contents produced by an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakefileEdit {
    pub contents: String,
    /// 1-based line of the inserted, existing or first removed binding
    pub line: usize,
    /// False when the file already had the requested content
    pub changed: bool,
}

/// Format a binding line the way hlgen writes them.
pub fn format_binding_line(key: &BindingKey, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        format!("{} =", key)
    } else {
        format!("{} = {}", key, value)
    }
}

/// Lines of `source` that declare `key`, as 0-based indices with their values.
///
/// `CFG__foo__` declares the same configuration as `CFG__foo`. Lines whose
/// key does not tokenize never match.
fn declarations<'a>(
    source: &'a MakefileSource,
    key: &'a BindingKey,
) -> impl Iterator<Item = (usize, String)> + 'a {
    source
        .lines()
        .iter()
        .enumerate()
        .filter_map(move |(index, line)| {
            let (raw_key, value) = parse_binding_line(line)?;
            let parsed = BindingKey::parse(&raw_key).ok()?;
            (&parsed == key).then_some((index, value))
        })
}

/// Join `lines` with the line ending of `source`.
fn render(source: &MakefileSource, lines: &[String]) -> String {
    let ending = source.line_ending();
    let mut contents = lines.join(ending);
    contents.push_str(ending);
    contents
}

/// Insert a binding for `key` into the configuration block of `source`.
///
/// A new line goes after the last binding of the block, or after the
/// `# Configure generators` comment when there are no bindings yet. A
/// Makefile with neither gets the comment and the line appended.
///
/// Adding a configuration that already exists with an equivalent value
/// changes nothing.
///
/// # Errors
/// * `Enumeration(MalformedValue)` if `value` does not parse
/// * `ConfigurationExists` if `key` is declared with a different value
pub fn insert_binding(
    source: &MakefileSource,
    key: &BindingKey,
    value: &str,
) -> Result<MakefileEdit, ProjectError> {
    let parsed = BindingValue::parse(value).map_err(|reason| EnumerationError::MalformedValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
        origin: None,
    })?;

    if let Some((index, existing)) = declarations(source, key).next() {
        if BindingValue::parse(&existing).ok().as_ref() == Some(&parsed) {
            return Ok(MakefileEdit {
                contents: render(source, source.lines()),
                line: index + 1,
                changed: false,
            });
        }
        return Err(ProjectError::ConfigurationExists {
            key: key.to_string(),
            existing,
        });
    }

    let mut lines = source.lines().to_vec();
    let block = source.block();
    let line = format_binding_line(key, value);

    let index = if block.marker.is_none() && block.start.is_none() {
        if lines.last().is_some_and(|last| !last.trim().is_empty()) {
            lines.push(String::new());
        }
        lines.push(CONFIG_BLOCK_MARKER.to_string());
        lines.push(line);
        lines.len() - 1
    } else {
        let index = block.insertion_index(lines.len());
        lines.insert(index, line);
        index
    };

    Ok(MakefileEdit {
        contents: render(source, &lines),
        line: index + 1,
        changed: true,
    })
}

/// Remove every binding line that declares `key`.
///
/// # Errors
/// * `ConfigurationNotFound` if no line declares `key`
pub fn delete_binding(
    source: &MakefileSource,
    key: &BindingKey,
) -> Result<MakefileEdit, ProjectError> {
    let doomed: Vec<usize> = declarations(source, key).map(|(index, _)| index).collect();
    let first = doomed.first().copied().ok_or_else(|| ProjectError::ConfigurationNotFound {
        key: key.to_string(),
    })?;

    let lines: Vec<String> = source
        .lines()
        .iter()
        .enumerate()
        .filter(|(index, _)| !doomed.contains(index))
        .map(|(_, line)| line.clone())
        .collect();

    Ok(MakefileEdit {
        contents: render(source, &lines),
        line: first + 1,
        changed: true,
    })
}

pub(super) fn make_key(generator: &str, suffix: Option<&str>) -> Result<BindingKey, ProjectError> {
    BindingKey::new(generator, suffix).map_err(|reason| {
        let key = match suffix {
            Some(suffix) => format!("CFG__{}__{}", generator, suffix),
            None => format!("CFG__{}", generator),
        };
        ProjectError::Enumeration(EnumerationError::MalformedKey {
            key,
            reason,
            origin: None,
        })
    })
}

/// Replace `path` with `contents` through a temporary file in the same
/// directory, so readers never see a half-written Makefile.
fn write_atomically(path: &Path, contents: &str) -> Result<(), ProjectError> {
    let write_error = |source: std::io::Error| ProjectError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        file.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

fn write_edit(
    path: &Path,
    key: &BindingKey,
    action: &str,
    edit: &MakefileEdit,
) -> Result<(), ProjectError> {
    if !edit.changed {
        return Ok(());
    }
    write_atomically(path, &edit.contents)?;
    MakefileEdited {
        path: &path.display().to_string(),
        key: &key.to_string(),
        action,
        line: edit.line,
    }
    .log();
    Ok(())
}

/// Add configuration `suffix` (or the default, for `None`) of `generator`
/// to the Makefile at `path`.
pub fn add_configuration<P: AsRef<Path>>(
    path: P,
    generator: &str,
    suffix: Option<&str>,
    value: &str,
) -> Result<MakefileEdit, ProjectError> {
    let path = path.as_ref();
    let key = make_key(generator, suffix)?;
    let source = MakefileSource::load(path)?;
    let edit = insert_binding(&source, &key, value)?;
    write_edit(path, &key, "added", &edit)?;
    Ok(edit)
}

/// Remove configuration `suffix` (or the default, for `None`) of
/// `generator` from the Makefile at `path`.
pub fn remove_configuration<P: AsRef<Path>>(
    path: P,
    generator: &str,
    suffix: Option<&str>,
) -> Result<MakefileEdit, ProjectError> {
    let path = path.as_ref();
    let key = make_key(generator, suffix)?;
    let source = MakefileSource::load(path)?;
    let edit = delete_binding(&source, &key)?;
    write_edit(path, &key, "removed", &edit)?;
    Ok(edit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{KeyError, SourceError, ValueError};

    const MAKEFILE: &str = "\
include ../support/Makefile.inc

# Configure generators

CFG__blur = target=host
CFG__blur__fast = vectorize=true

all: $(GENERATORS)
";

    fn key(generator: &str, suffix: Option<&str>) -> BindingKey {
        BindingKey::new(generator, suffix).unwrap()
    }

    fn source(contents: &str) -> MakefileSource {
        MakefileSource::parse("Makefile", contents)
    }

    #[test]
    fn test_format_binding_line() {
        assert_eq!(format_binding_line(&key("a", None), ""), "CFG__a =");
        assert_eq!(
            format_binding_line(&key("a", Some("b")), " target=x P1 "),
            "CFG__a__b = target=x P1"
        );
    }

    #[test]
    fn test_insert_at_end_of_block() {
        let edit = insert_binding(&source(MAKEFILE), &key("sharpen", None), "P1").unwrap();
        assert!(edit.changed);
        assert_eq!(edit.line, 7);
        let lines: Vec<&str> = edit.contents.lines().collect();
        assert_eq!(lines[5], "CFG__blur__fast = vectorize=true");
        assert_eq!(lines[6], "CFG__sharpen = P1");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "all: $(GENERATORS)");
    }

    #[test]
    fn test_insert_after_marker_without_bindings() {
        let contents = "# Configure generators\n# one per line\n\nall:\n";
        let edit = insert_binding(&source(contents), &key("blur", None), "").unwrap();
        assert_eq!(edit.line, 3);
        assert_eq!(
            edit.contents,
            "# Configure generators\n# one per line\nCFG__blur =\n\nall:\n"
        );
    }

    #[test]
    fn test_insert_into_makefile_without_block() {
        let edit = insert_binding(&source("all:\n\techo hi\n"), &key("blur", None), "P1").unwrap();
        assert_eq!(
            edit.contents,
            "all:\n\techo hi\n\n# Configure generators\nCFG__blur = P1\n"
        );
        assert_eq!(edit.line, 5);
    }

    #[test]
    fn test_insert_identical_is_a_no_op() {
        let edit = insert_binding(
            &source(MAKEFILE),
            &key("blur", Some("fast")),
            "  vectorize=true",
        )
        .unwrap();
        assert!(!edit.changed);
        assert_eq!(edit.line, 6);
        assert_eq!(edit.contents, MAKEFILE);
    }

    #[test]
    fn test_insert_conflicting_value() {
        let err = insert_binding(&source(MAKEFILE), &key("blur", None), "target=arm").unwrap_err();
        match err {
            ProjectError::ConfigurationExists { key, existing } => {
                assert_eq!(key, "CFG__blur");
                assert_eq!(existing, "target=host");
            }
            other => panic!("expected ConfigurationExists, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_delimiter_counts_as_bare_key() {
        let contents = "# Configure generators\nCFG__blur__ = P1\n";
        let err = insert_binding(&source(contents), &key("blur", None), "P2").unwrap_err();
        assert!(matches!(err, ProjectError::ConfigurationExists { .. }));

        let edit = delete_binding(&source(contents), &key("blur", None)).unwrap();
        assert_eq!(edit.contents, "# Configure generators\n");
    }

    #[test]
    fn test_insert_rejects_empty_target() {
        let err = insert_binding(&source(MAKEFILE), &key("x", None), "target= P1").unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Enumeration(EnumerationError::MalformedValue {
                reason: ValueError::EmptyTarget,
                ..
            })
        ));
    }

    #[test]
    fn test_delete_binding() {
        let edit = delete_binding(&source(MAKEFILE), &key("blur", None)).unwrap();
        assert_eq!(edit.line, 5);
        assert!(!edit.contents.contains("CFG__blur = target=host"));
        assert!(edit.contents.contains("CFG__blur__fast = vectorize=true"));
    }

    #[test]
    fn test_delete_missing_binding() {
        let err = delete_binding(&source(MAKEFILE), &key("blur", Some("slow"))).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::ConfigurationNotFound { key } if key == "CFG__blur__slow"
        ));
    }

    #[test]
    fn test_add_then_remove_restores_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile");
        fs::write(&path, MAKEFILE).unwrap();

        let added = add_configuration(&path, "sharpen", Some("hq"), "target=arm P2").unwrap();
        assert_eq!(added.line, 7);
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("CFG__sharpen__hq = target=arm P2\n"));

        remove_configuration(&path, "sharpen", Some("hq")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), MAKEFILE);
    }

    #[test]
    fn test_add_rejects_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile");
        fs::write(&path, MAKEFILE).unwrap();

        let err = add_configuration(&path, "bad-name", None, "").unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Enumeration(EnumerationError::MalformedKey {
                reason: KeyError::InvalidSegment { .. },
                ..
            })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), MAKEFILE);
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        let contents = "# Configure generators\r\nCFG__blur = P1\r\n\r\nall:\r\n";
        let edit = insert_binding(&source(contents), &key("blur", Some("fast")), "P2").unwrap();
        assert_eq!(
            edit.contents,
            "# Configure generators\r\nCFG__blur = P1\r\nCFG__blur__fast = P2\r\n\r\nall:\r\n"
        );

        let removed = delete_binding(&source(&edit.contents), &key("blur", Some("fast"))).unwrap();
        assert_eq!(removed.contents, contents);
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile");
        fs::write(&path, MAKEFILE).unwrap();

        add_configuration(&path, "warp", None, "P1").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("Makefile")]);
        assert!(fs::read_to_string(&path).unwrap().contains("CFG__warp = P1\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile");
        fs::write(&path, MAKEFILE).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        remove_configuration(&path, "blur", None).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_missing_makefile() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove_configuration(dir.path().join("Makefile"), "blur", None).unwrap_err();
        assert!(matches!(err, ProjectError::Source(SourceError::Io { .. })));
    }
}
