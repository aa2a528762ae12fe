//! # magkit - helpers for micromagnetic simulation workflows
//!
//! magkit collects the small pieces that sit around a micromagnetic solver:
//! describing fields, choosing plot colours, laying out the simulated box
//! and its sub-regions, and pruning the checkpoint files a long run leaves
//! behind.
//!
//! ## Core Concepts
//!
//! - **FieldInfo**: display metadata for one physical field (label, symbol, units)
//! - **PaletteStore**: named colour palettes with one active palette
//! - **SystemProperties**: the simulated box as cell counts times a cell pitch
//! - **RegionRegistry**: named rectangular sub-regions, materialized on demand
//! - **prune**: keep every n-th magnetisation snapshot and delete the rest
//!
//! ## Usage
//!
//! ```rust
//! use magkit::{RegionRegistry, SubRegionUpdate, SystemProperties};
//!
//! let system = SystemProperties::builder()
//!     .lengths([100.0, 50.0, 1.0])
//!     .cell([1.0, 1.0, 1.0])
//!     .build()?;
//! assert_eq!(system.p2(), [100.0, 50.0, 1.0]);
//!
//! let mut regions = RegionRegistry::new("regions");
//! regions
//!     .get_or_create("free")?
//!     .apply(SubRegionUpdate::corners([0.0; 3], [10.0, 10.0, 1.0]))?;
//! assert_eq!(regions.regions().len(), 1);
//! # Ok::<(), magkit::MagkitError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Field metadata and plotting colours
pub mod error;
pub mod field_info;
pub mod palette;

// Geometry
pub mod geometry;

// Checkpoint pruning and process setup
pub mod config;
pub mod logging;
pub mod prune;

// Re-export primary types at crate root for convenience
pub use config::{MagkitConfig, PruneConfig};
pub use error::{
    ConfigError, GeometryError, LookupError, MagkitError, MagkitResult, PruneError,
    ValidationError,
};
pub use field_info::{FieldInfo, FieldValue};
pub use geometry::{
    Attr, BoxRegionBuilder, Labels, Region, RegionBuilder, RegionRegistry, SubRegion,
    SubRegionUpdate, SubRegionView, SystemBuilder, SystemProperties, UnitSpec, Vec3,
};
pub use logging::{LogLevel, LogSettings};
pub use palette::{ColorEntry, ColorRef, Palette, PaletteAccessor, PaletteColors, PaletteStore};
pub use prune::{CheckpointPattern, Session, Stride};
