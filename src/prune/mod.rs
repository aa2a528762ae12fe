//! Checkpoint pruning for OOMMF time-driver output.
//!
//! A long run writes one magnetisation snapshot per step. Pruning keeps
//! sequence 0 and every snapshot whose successor is a multiple of the
//! retention stride, and deletes the rest after confirmation.

pub mod pattern;
pub mod prompt;
pub mod scan;
pub mod session;

pub use pattern::{CheckpointName, CheckpointPattern, Stride, DEFAULT_PREFIX};
pub use prompt::{Answer, Prompter};
pub use scan::{
    delete_files, drive_sort_key, find_drive_dirs, scan_dir, DeletionFailure, DeletionSummary,
    ScanReport,
};
pub use session::{DirOutcome, DirReport, Mode, RunOutcome, RunSummary, Session};
