//! Directory scanning and best-effort deletion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PruneError;
use crate::prune::pattern::{CheckpointPattern, Stride};

/// Directory-name prefix of per-drive output directories.
pub const DRIVE_PREFIX: &str = "drive-";

/// Keep/delete partition of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub directory: PathBuf,
    /// Checkpoints that survive, sorted by name.
    pub keep: Vec<String>,
    /// Checkpoints marked for deletion, sorted by name.
    pub delete: Vec<String>,
}

impl ScanReport {
    /// Number of matching checkpoint files.
    #[must_use]
    pub fn total(&self) -> usize {
        self.keep.len() + self.delete.len()
    }

    #[must_use]
    pub fn has_deletions(&self) -> bool {
        !self.delete.is_empty()
    }
}

/// Partitions checkpoint names into keep/delete lists.
///
/// Names that are not checkpoints are ignored. Both lists come back sorted.
pub fn partition<'a, I>(names: I, pattern: &CheckpointPattern, stride: Stride) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keep = Vec::new();
    let mut delete = Vec::new();
    for name in names {
        let Some(parsed) = pattern.parse(name) else {
            continue;
        };
        if stride.keeps(parsed.seq) {
            keep.push(name.to_string());
        } else {
            delete.push(name.to_string());
        }
    }
    keep.sort_unstable();
    delete.sort_unstable();
    (keep, delete)
}

/// Scans `dir` for checkpoints and partitions them by `stride`.
///
/// # Errors
///
/// Returns `PruneError::ReadDir` if the directory cannot be listed.
pub fn scan_dir(dir: &Path, pattern: &CheckpointPattern, stride: Stride) -> Result<ScanReport, PruneError> {
    let read_err = |source: io::Error| PruneError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        // Non UTF-8 names cannot match the checkpoint pattern.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    let (keep, delete) = partition(names.iter().map(String::as_str), pattern, stride);
    tracing::info!(
        directory = %dir.display(),
        matched = keep.len() + delete.len(),
        keep = keep.len(),
        delete = delete.len(),
        "scanned checkpoint directory"
    );
    Ok(ScanReport {
        directory: dir.to_path_buf(),
        keep,
        delete,
    })
}

/// A file that could not be removed.
#[derive(Debug)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Outcome of [`delete_files`].
#[derive(Debug, Default)]
pub struct DeletionSummary {
    pub deleted: usize,
    pub failed: Vec<DeletionFailure>,
}

impl DeletionSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes `names` inside `dir`.
///
/// Each failure is logged and recorded; the remaining files are still attempted.
pub fn delete_files<S: AsRef<str>>(dir: &Path, names: &[S]) -> DeletionSummary {
    let mut summary = DeletionSummary::default();
    for name in names {
        let path = dir.join(name.as_ref());
        match fs::remove_file(&path) {
            Ok(()) => summary.deleted += 1,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to delete checkpoint");
                summary.failed.push(DeletionFailure { path, error });
            }
        }
    }
    tracing::info!(
        directory = %dir.display(),
        deleted = summary.deleted,
        failed = summary.failed.len(),
        "deletion finished"
    );
    summary
}

/// Sort key for `drive-<N>` directories: `N`, or 0 when the name does not match.
#[must_use]
pub fn drive_sort_key(path: &Path) -> u64 {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix(DRIVE_PREFIX))
        .and_then(|rest| {
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            rest[..end].parse().ok()
        })
        .unwrap_or(0)
}

/// True if the final path component starts with `drive-`.
#[must_use]
pub fn is_drive_dir_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(DRIVE_PREFIX))
}

/// Lists `drive-*` subdirectories of `target`, sorted by [`drive_sort_key`].
///
/// # Errors
///
/// Returns `PruneError::ReadDir` if `target` cannot be listed.
pub fn find_drive_dirs(target: &Path) -> Result<Vec<PathBuf>, PruneError> {
    let read_err = |source: io::Error| PruneError::ReadDir {
        path: target.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(target).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_dir() && is_drive_dir_name(&path) {
            dirs.push(path);
        }
    }
    // Stable sort, name as tie-breaker so "drive-x" dirs (key 0) stay deterministic.
    dirs.sort_by(|a, b| drive_sort_key(a).cmp(&drive_sort_key(b)).then_with(|| a.cmp(b)));
    Ok(dirs)
}
