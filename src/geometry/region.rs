//! Materialized regions and the builder seam that produces them.
//!
//! Sub-regions describe their corners; turning a description into a region
//! object is the job of a [`RegionBuilder`]. [`BoxRegionBuilder`] is the
//! default and produces a plain axis-aligned [`Region`]. Mesh toolkits can
//! plug in their own builder and region type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::{Labels, Vec3};

/// Constructs a region object from two corners, unit labels and dimension labels.
pub trait RegionBuilder {
    /// The region handle produced by this builder.
    type Region: fmt::Debug + Clone;

    /// Builds a region spanning `p1` and `p2`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError` if the corners do not describe a valid region.
    fn build(
        &self,
        p1: Vec3,
        p2: Vec3,
        units: &Labels,
        dims: &Labels,
    ) -> Result<Self::Region, GeometryError>;
}

/// Axis-aligned box with `pmin <= pmax` on every axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pmin: Vec3,
    pmax: Vec3,
    units: Labels,
    dims: Labels,
}

impl Region {
    pub const fn pmin(&self) -> Vec3 {
        self.pmin
    }

    pub const fn pmax(&self) -> Vec3 {
        self.pmax
    }

    pub fn units(&self) -> &Labels {
        &self.units
    }

    pub fn dims(&self) -> &Labels {
        &self.dims
    }

    /// Edge length per axis.
    #[must_use]
    pub fn edges(&self) -> Vec3 {
        [0, 1, 2].map(|i| self.pmax[i] - self.pmin[i])
    }

    #[must_use]
    pub fn centre(&self) -> Vec3 {
        [0, 1, 2].map(|i| 0.5 * (self.pmin[i] + self.pmax[i]))
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.edges().iter().product()
    }

    /// True if `point` lies inside the box, faces included.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        (0..3).all(|i| point[i] >= self.pmin[i] && point[i] <= self.pmax[i])
    }

    /// Overlap of two boxes, or `None` if they share no volume.
    ///
    /// The result keeps this region's labels.
    #[must_use]
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let pmin = [0, 1, 2].map(|i| self.pmin[i].max(other.pmin[i]));
        let pmax = [0, 1, 2].map(|i| self.pmax[i].min(other.pmax[i]));
        if (0..3).any(|i| pmax[i] <= pmin[i]) {
            return None;
        }
        Some(Region {
            pmin,
            pmax,
            units: self.units.clone(),
            dims: self.dims.clone(),
        })
    }
}

/// The default builder: validates the corners and returns a [`Region`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxRegionBuilder;

impl RegionBuilder for BoxRegionBuilder {
    type Region = Region;

    fn build(
        &self,
        p1: Vec3,
        p2: Vec3,
        units: &Labels,
        dims: &Labels,
    ) -> Result<Region, GeometryError> {
        if p1.iter().chain(p2.iter()).any(|c| !c.is_finite()) {
            return Err(GeometryError::DegenerateRegion {
                p1,
                p2,
                reason: "corner coordinates must be finite".to_string(),
            });
        }
        if let Some(axis) = (0..3).find(|&i| p1[i] == p2[i]) {
            return Err(GeometryError::DegenerateRegion {
                p1,
                p2,
                reason: format!("zero-length edge along {}", dims[axis]),
            });
        }

        Ok(Region {
            pmin: [0, 1, 2].map(|i| p1[i].min(p2[i])),
            pmax: [0, 1, 2].map(|i| p1[i].max(p2[i])),
            units: units.clone(),
            dims: dims.clone(),
        })
    }
}
