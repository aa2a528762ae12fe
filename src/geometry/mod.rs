//! Simulated-system geometry in physical units.
//!
//! - [`SystemProperties`]: the global box, given as cell counts and a cell pitch.
//! - [`Region`] / [`RegionBuilder`]: the materialized box a mesh toolkit works with.
//! - [`SubRegion`]: a mutable description of one rectangular sub-region.
//! - [`RegionRegistry`]: a name-keyed, lazily populated set of sub-regions.

pub mod region;
pub mod registry;
pub mod subregion;
pub mod system;

pub use region::{BoxRegionBuilder, Region, RegionBuilder};
pub use registry::{Attr, RegionRegistry};
pub use subregion::{SubRegion, SubRegionUpdate, SubRegionView, UnitSpec};
pub use system::{SystemBuilder, SystemProperties};

/// A point or extent in 3D, one component per axis.
pub type Vec3 = [f64; 3];

/// Per-axis unit or dimension labels.
pub type Labels = [String; 3];

pub(crate) fn labels(a: &str, b: &str, c: &str) -> Labels {
    [a.to_string(), b.to_string(), c.to_string()]
}

pub(crate) fn scale(v: Vec3, by: Vec3) -> Vec3 {
    [v[0] * by[0], v[1] * by[1], v[2] * by[2]]
}

/// Default unit labels: metres on every axis.
#[must_use]
pub fn default_units() -> Labels {
    labels("m", "m", "m")
}

/// Default dimension labels.
#[must_use]
pub fn default_dims() -> Labels {
    labels("x", "y", "z")
}
