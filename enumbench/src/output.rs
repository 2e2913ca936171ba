//! Output filenames and writing generated sources to disk.
//!
//! Files are written through a temporary sibling and renamed into place, so a
//! failed write never leaves a truncated `.cpp` under the final name.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize as _;
use similar::{ChangeTag, TextDiff};

use crate::config::{TestCaseConfig, check_filename_fragment};
use crate::error::{Error, Result};
use crate::profile::LibraryProfile;

/// How output filenames are derived.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Naming {
    /// `{library}_{base_filename}.cpp`
    #[default]
    PerLibrary,
    /// `{prefix}_{base_filename}.cpp`, for runs targeting a single library
    Legacy {
        /// Fixed filename prefix
        prefix: String,
    },
}

impl Naming {
    /// Legacy naming with a validated prefix.
    pub fn legacy(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        check_filename_fragment(&prefix)
            .map_err(|reason| Error::invalid(&prefix, format!("prefix {reason}")))?;
        Ok(Naming::Legacy { prefix })
    }

    /// Filename for one (test case, library) pair.
    pub fn file_name(&self, profile: &LibraryProfile, config: &TestCaseConfig) -> String {
        let prefix = match self {
            Naming::PerLibrary => profile.identifier,
            Naming::Legacy { prefix } => prefix.as_str(),
        };
        format!("{prefix}_{}.cpp", config.base_filename)
    }
}

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced
    Written,
    /// The file already had exactly this content
    Unchanged,
    /// Check mode: the file is missing or its content differs
    Stale,
}

/// Destination directory plus the write policy.
#[derive(Debug, Clone)]
pub struct OutputDir {
    dir: PathBuf,
    check: bool,
}

impl OutputDir {
    /// Write into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            check: false,
        }
    }

    /// Compare against existing files instead of writing.
    pub fn check_only(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// The directory files land in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path for a filename.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write `content` to `file_name`, unless it is already up to date.
    pub fn write(&self, file_name: &str, content: &str) -> Result<WriteOutcome> {
        let path = self.path_for(file_name);
        let differs = check_diff(&path, content)?;
        if !differs {
            return Ok(WriteOutcome::Unchanged);
        }
        if self.check {
            return Ok(WriteOutcome::Stale);
        }
        write_atomic(&path, content.as_bytes())?;
        Ok(WriteOutcome::Written)
    }
}

/// Returns true when `path` is missing or holds something other than `new_content`.
fn check_diff(path: &Path, new_content: &str) -> Result<bool> {
    if !path.exists() {
        tracing::debug!("{}: would create new file", path.display());
        return Ok(true);
    }

    let old_content = fs_err::read(path).map_err(|e| Error::io(path, e))?;
    if old_content == new_content.as_bytes() {
        return Ok(false);
    }

    let old_str = String::from_utf8_lossy(&old_content);
    let header = format!("Diff for {}:", path.display());
    tracing::info!("{}", header.blue());
    for line in diff_lines(&old_str, new_content) {
        tracing::info!("{line}");
    }

    Ok(true)
}

/// Equal lines kept around each change before the rest are elided.
const CONTEXT_LINES: usize = 3;

/// Line diff of `old` against `new`: changed lines prefixed with `-`/`+`, at
/// most three unchanged lines per run, then a count of the ones skipped.
fn diff_lines(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);
    let mut out = Vec::new();
    let mut equal_count = 0;
    let flush = |out: &mut Vec<String>, equal_count: usize| {
        if equal_count > CONTEXT_LINES {
            out.push(format!(" {} lines omitted.", equal_count - CONTEXT_LINES));
        }
    };

    for change in diff.iter_all_changes() {
        let line = change.to_string();
        let line = line.trim_end();
        match change.tag() {
            ChangeTag::Equal => {
                if equal_count < CONTEXT_LINES {
                    out.push(format!(" {line}"));
                }
                equal_count += 1;
            }
            ChangeTag::Delete => {
                flush(&mut out, equal_count);
                equal_count = 0;
                out.push(format!("-{}", line.red()));
            }
            ChangeTag::Insert => {
                flush(&mut out, equal_count);
                equal_count = 0;
                out.push(format!("+{}", line.green()));
            }
        }
    }
    flush(&mut out, equal_count);
    out
}

/// Write through a temporary file in the same directory, then rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".enumbench-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;
    tmp.write_all(content).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
