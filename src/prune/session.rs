//! The interactive pruning workflow.
//!
//! Two entry shapes are supported:
//!
//! - the target itself is a `drive-*` directory: ask for the stride and prune
//!   it with per-directory confirmation;
//! - otherwise the target's `drive-*` subdirectories are the candidates. The
//!   user may confirm each directory or answer `yes-to-all`, which after a
//!   second confirmation (and a confirmation of the stride) deletes without
//!   further prompts.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::PruneError;
use crate::prune::pattern::{CheckpointPattern, Stride};
use crate::prune::prompt::{Answer, Prompter, YES_NO, YES_NO_ALL};
use crate::prune::scan::{self, DeletionSummary, ScanReport};

const RULE: &str = "----------------------------------------";

/// Whether each directory's deletion needs its own confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Batch,
}

/// What happened to one directory.
#[derive(Debug)]
pub enum DirOutcome {
    /// No checkpoint was marked; nothing was asked.
    NothingToDelete,
    /// The user declined deletion for this directory.
    Cancelled,
    Deleted(DeletionSummary),
}

/// Scan result and outcome for one directory.
#[derive(Debug)]
pub struct DirReport {
    pub scan: ScanReport,
    pub outcome: DirOutcome,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    InvalidTarget,
    NoCandidates,
    Cancelled,
    InvalidStride,
    StrideNotConfirmed,
    Completed,
}

/// Everything a run did.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub directories: Vec<DirReport>,
}

impl RunSummary {
    fn ended(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            directories: Vec::new(),
        }
    }

    /// Files deleted across all directories.
    #[must_use]
    pub fn deleted(&self) -> usize {
        self.directories
            .iter()
            .map(|d| match &d.outcome {
                DirOutcome::Deleted(summary) => summary.deleted,
                _ => 0,
            })
            .sum()
    }
}

/// Drives one pruning run over a prompter.
pub struct Session<R, W> {
    prompter: Prompter<R, W>,
    pattern: CheckpointPattern,
    stride: Option<Stride>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(prompter: Prompter<R, W>, pattern: CheckpointPattern) -> Self {
        Self {
            prompter,
            pattern,
            stride: None,
        }
    }

    /// Uses `stride` instead of prompting for it.
    #[must_use]
    pub fn with_stride(mut self, stride: Option<Stride>) -> Self {
        self.stride = stride;
        self
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Runs the workflow. Without a target, the user is asked for one.
    ///
    /// # Errors
    ///
    /// Returns `PruneError` if input ends early, the terminal fails, or a
    /// directory cannot be listed.
    pub fn run(&mut self, target: Option<&Path>) -> Result<RunSummary, PruneError> {
        let target = match target {
            Some(t) => t.to_path_buf(),
            None => PathBuf::from(self.prompter.read_line("Enter target directory: ")?),
        };
        if !target.is_dir() {
            writeln!(self.prompter.out(), "Provided target directory is not valid.")?;
            return Ok(RunSummary::ended(RunOutcome::InvalidTarget));
        }

        if scan::is_drive_dir_name(&target) {
            tracing::info!(target = %target.display(), "pruning single drive directory");
            let Some(stride) = self.resolve_stride()? else {
                return Ok(RunSummary::ended(RunOutcome::InvalidStride));
            };
            let report = self.process_dir(&target, stride, Mode::Interactive)?;
            return Ok(RunSummary {
                outcome: RunOutcome::Completed,
                directories: vec![report],
            });
        }

        let candidates = scan::find_drive_dirs(&target)?;
        if candidates.is_empty() {
            writeln!(
                self.prompter.out(),
                "No candidate drive- directories found in the specified directory."
            )?;
            return Ok(RunSummary::ended(RunOutcome::NoCandidates));
        }

        let out = self.prompter.out();
        writeln!(out, "\nCandidate drive- directories found:")?;
        for cand in &candidates {
            let name = cand.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            writeln!(out, "  - {name}")?;
        }
        writeln!(out)?;

        let mut mode = Mode::Interactive;
        match self.prompter.ask(
            "Do you want to check all files in these candidate directories? (yes/no/yes-to-all): ",
            YES_NO_ALL,
        )? {
            Answer::No => {
                writeln!(self.prompter.out(), "Operation cancelled.")?;
                return Ok(RunSummary::ended(RunOutcome::Cancelled));
            }
            Answer::YesToAll => {
                let confirm = self.prompter.ask(
                    "Are you really sure you want to delete all files without further confirmation? (yes/no): ",
                    YES_NO,
                )?;
                if confirm == Answer::Yes {
                    mode = Mode::Batch;
                } else {
                    writeln!(
                        self.prompter.out(),
                        "Batch deletion cancelled. Reverting to manual confirmation mode."
                    )?;
                }
            }
            Answer::Yes => {}
        }

        let Some(stride) = self.resolve_stride()? else {
            return Ok(RunSummary::ended(RunOutcome::InvalidStride));
        };

        if mode == Mode::Batch {
            writeln!(
                self.prompter.out(),
                "\n[Confirmation] You have entered a save spacing value of: {stride}"
            )?;
            if self.prompter.ask("Is this correct? (yes/no): ", YES_NO)? != Answer::Yes {
                writeln!(
                    self.prompter.out(),
                    "Save spacing not confirmed. Exiting to avoid mass deletion."
                )?;
                return Ok(RunSummary::ended(RunOutcome::StrideNotConfirmed));
            }
            tracing::warn!(stride = stride.get(), dirs = candidates.len(), "batch deletion confirmed");
        }

        let mut directories = Vec::with_capacity(candidates.len());
        for cand in &candidates {
            directories.push(self.process_dir(cand, stride, mode)?);
        }
        Ok(RunSummary {
            outcome: RunOutcome::Completed,
            directories,
        })
    }

    fn resolve_stride(&mut self) -> Result<Option<Stride>, PruneError> {
        if let Some(stride) = self.stride {
            return Ok(Some(stride));
        }
        let stride = self.prompter.read_stride("Enter save spacing (e.g., 500): ")?;
        if stride.is_none() {
            writeln!(self.prompter.out(), "Invalid spacing value. Exiting.")?;
        }
        Ok(stride)
    }

    /// Scans one directory, reports totals, and deletes the marked files.
    ///
    /// In [`Mode::Interactive`] the user may list the files first and must
    /// answer `yes` before anything is deleted.
    ///
    /// # Errors
    ///
    /// Returns `PruneError` if the directory cannot be listed or the terminal fails.
    /// Individual deletion failures are reported in the summary instead.
    pub fn process_dir(&mut self, dir: &Path, stride: Stride, mode: Mode) -> Result<DirReport, PruneError> {
        let report = scan::scan_dir(dir, &self.pattern, stride)?;

        let out = self.prompter.out();
        writeln!(out, "\n{RULE}")?;
        writeln!(out, "Directory: {}", dir.display())?;
        writeln!(out, "Total matching files found: {}", report.total())?;
        writeln!(out, "Files marked for deletion: {}", report.delete.len())?;
        writeln!(out, "{RULE}\n")?;

        if !report.has_deletions() {
            writeln!(
                out,
                "No files marked for deletion in this directory. Skipping deletion.\n"
            )?;
            return Ok(DirReport {
                scan: report,
                outcome: DirOutcome::NothingToDelete,
            });
        }

        if mode == Mode::Interactive {
            let show = self.prompter.ask(
                "Print all file names marked for deletion? (yes/no): ",
                YES_NO,
            )?;
            if show == Answer::Yes {
                writeln!(self.prompter.out(), "{}", report.delete.join("\n"))?;
            }
            if self.prompter.ask("Delete these files? (yes/no): ", YES_NO)? != Answer::Yes {
                writeln!(self.prompter.out(), "Deletion cancelled for this directory.\n")?;
                tracing::info!(directory = %dir.display(), "deletion cancelled by user");
                return Ok(DirReport {
                    scan: report,
                    outcome: DirOutcome::Cancelled,
                });
            }
        }

        let summary = scan::delete_files(dir, &report.delete);
        let out = self.prompter.out();
        for failure in &summary.failed {
            writeln!(out, "Error deleting {}: {}", failure.path.display(), failure.error)?;
        }
        writeln!(out, "Deletion complete for this directory.\n")?;

        Ok(DirReport {
            scan: report,
            outcome: DirOutcome::Deleted(summary),
        })
    }
}
