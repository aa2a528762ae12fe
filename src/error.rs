//! Error types for magkit.
//!
//! Errors are strongly typed using thiserror so callers can match on the
//! specific condition. Validation and lookup failures are kept apart from
//! geometry-collaborator and pruning (I/O) failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when an input has the wrong shape or value.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid cell: expected three strictly positive components, got {cell:?}")]
    InvalidCell {
        cell: [f64; 3],
    },

    #[error("Invalid colors: {reason}")]
    InvalidColors {
        reason: String,
    },

    #[error("Invalid stride: {value} (the retention stride must be a positive integer)")]
    InvalidStride {
        value: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },
}

/// Errors raised when a named thing cannot be found.
///
/// Lookups that treat absence as a valid answer (for example
/// [`crate::PaletteStore::get_palette`]) return `Option` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Key not found: '{key}'")]
    KeyNotFound {
        key: String,
    },

    #[error("Palette not found: '{name}'")]
    PaletteNotFound {
        name: String,
    },

    #[error("No active palette; load one with load_palette() first")]
    NoActivePalette,

    #[error("Invalid key or index: {what}")]
    InvalidKeyOrIndex {
        what: String,
    },

    #[error("Sub-region not found: '{name}'")]
    SubRegionNotFound {
        name: String,
    },

    #[error("Sub-region '{name}' has not been materialized")]
    SubRegionNotMaterialized {
        name: String,
    },

    #[error("'{name}' is the registry name and cannot be used as a sub-region")]
    ReservedName {
        name: String,
    },
}

/// Errors reported by a region builder.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate region between {p1:?} and {p2:?}: {reason}")]
    DegenerateRegion {
        p1: [f64; 3],
        p2: [f64; 3],
        reason: String,
    },
}

/// Errors from the checkpoint pruning workflow.
#[derive(Debug, Error)]
pub enum PruneError {
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input closed while waiting for an answer to '{prompt}'")]
    InputClosed {
        prompt: String,
    },

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("Invalid checkpoint prefix pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors from loading configuration or palette files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to create log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Top-level error type for magkit.
#[derive(Debug, Error)]
pub enum MagkitError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Prune error: {0}")]
    Prune(#[from] PruneError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl MagkitError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a lookup error.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    /// Returns true if this is a geometry error.
    #[must_use]
    pub const fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry(_))
    }

    /// Returns true if this is a pruning error.
    #[must_use]
    pub const fn is_prune(&self) -> bool {
        matches!(self, Self::Prune(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for magkit operations.
pub type MagkitResult<T> = Result<T, MagkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_invalid_cell() {
        let err = ValidationError::InvalidCell {
            cell: [1.0, 0.0, 1.0],
        };
        let msg = format!("{err}");
        assert!(msg.contains("Invalid cell"));
        assert!(msg.contains("strictly positive"));
    }

    #[test]
    fn test_lookup_error_palette_not_found() {
        let err = LookupError::PaletteNotFound {
            name: "missing".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Palette not found"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_lookup_error_subregion_kinds_differ() {
        let absent = LookupError::SubRegionNotFound {
            name: "core".to_string(),
        };
        let pending = LookupError::SubRegionNotMaterialized {
            name: "core".to_string(),
        };
        assert_ne!(absent, pending);
        assert!(format!("{pending}").contains("not been materialized"));
    }

    #[test]
    fn test_prune_error_input_closed() {
        let err = PruneError::InputClosed {
            prompt: "Delete these files? (yes/no): ".to_string(),
        };
        assert!(format!("{err}").contains("Input closed"));
    }

    #[test]
    fn test_magkit_error_from_validation() {
        let err: MagkitError = ValidationError::InvalidStride {
            value: "0".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_lookup());
    }

    #[test]
    fn test_magkit_error_from_lookup() {
        let err: MagkitError = LookupError::NoActivePalette.into();
        assert!(err.is_lookup());
        assert!(format!("{err}").contains("No active palette"));
    }

    #[test]
    fn test_magkit_error_from_geometry() {
        let err: MagkitError = GeometryError::DegenerateRegion {
            p1: [0.0; 3],
            p2: [0.0; 3],
            reason: "zero edge".to_string(),
        }
        .into();
        assert!(err.is_geometry());
    }

    #[test]
    fn test_magkit_error_from_prune_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let err: MagkitError = PruneError::from(io_err).into();
        assert!(err.is_prune());
        assert!(format!("{err}").contains("closed"));
    }
}
