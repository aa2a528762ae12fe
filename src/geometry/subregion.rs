//! One rectangular sub-region of the simulated volume.
//!
//! A [`SubRegion`] collects corner points, an optional cell pitch and axis
//! labels, then materializes a region through its [`RegionBuilder`]. Corners
//! may be given in cell indices and converted to physical units by scaling
//! against the cell size (or an explicit per-axis scale).

use crate::error::GeometryError;
use crate::geometry::region::{BoxRegionBuilder, RegionBuilder};
use crate::geometry::{default_dims, default_units, scale, Labels, Vec3};

/// Default magnetisation direction of a sub-region.
pub const DEFAULT_MAGNETISATION: Vec3 = [0.0, 0.0, 1.0];

/// How the `units` argument of an update is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitSpec {
    /// Replace the unit labels; coordinates are left alone.
    Labels(Labels),
    /// Multiply both corners element-wise by these factors.
    Scale(Vec3),
}

/// A set of field updates for [`SubRegion::apply`].
///
/// Only the fields that are set are changed. After the update the region is
/// rebuilt unless [`Self::no_create`] was called.
#[derive(Debug, Clone)]
pub struct SubRegionUpdate {
    p1: Option<Vec3>,
    p2: Option<Vec3>,
    cellsize: Option<Vec3>,
    units: Option<UnitSpec>,
    dims: Option<Labels>,
    magnetisation: Option<Vec3>,
    auto_create: bool,
}

impl Default for SubRegionUpdate {
    fn default() -> Self {
        Self {
            p1: None,
            p2: None,
            cellsize: None,
            units: None,
            dims: None,
            magnetisation: None,
            auto_create: true,
        }
    }
}

impl SubRegionUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an update setting both corners.
    #[must_use]
    pub fn corners(p1: Vec3, p2: Vec3) -> Self {
        Self::new().p1(p1).p2(p2)
    }

    #[must_use]
    pub fn p1(mut self, p1: Vec3) -> Self {
        self.p1 = Some(p1);
        self
    }

    #[must_use]
    pub fn p2(mut self, p2: Vec3) -> Self {
        self.p2 = Some(p2);
        self
    }

    /// Cell pitch; the corners are scaled by it.
    #[must_use]
    pub fn cellsize(mut self, cellsize: Vec3) -> Self {
        self.cellsize = Some(cellsize);
        self
    }

    #[must_use]
    pub fn units(mut self, units: UnitSpec) -> Self {
        self.units = Some(units);
        self
    }

    #[must_use]
    pub fn dims(mut self, dims: Labels) -> Self {
        self.dims = Some(dims);
        self
    }

    #[must_use]
    pub fn magnetisation(mut self, m: Vec3) -> Self {
        self.magnetisation = Some(m);
        self
    }

    /// Skip the automatic [`SubRegion::create`] after applying.
    #[must_use]
    pub fn no_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// True if no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.p1.is_none()
            && self.p2.is_none()
            && self.cellsize.is_none()
            && self.units.is_none()
            && self.dims.is_none()
            && self.magnetisation.is_none()
    }
}

/// What a sub-region currently resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubRegionView<'a, R> {
    /// The materialized region.
    Region(&'a R),
    /// The far corner, if set, when nothing is materialized yet.
    Corner(Option<Vec3>),
}

/// A mutable description of one rectangular sub-region.
#[derive(Debug, Clone)]
pub struct SubRegion<B: RegionBuilder = BoxRegionBuilder> {
    p1: Option<Vec3>,
    p2: Option<Vec3>,
    cellsize: Option<Vec3>,
    units: Labels,
    dims: Labels,
    magnetisation: Vec3,
    region: Option<B::Region>,
    builder: B,
}

impl Default for SubRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl SubRegion {
    /// An empty sub-region using the default box builder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_builder(BoxRegionBuilder)
    }
}

impl<B: RegionBuilder> SubRegion<B> {
    /// An empty sub-region that materializes through `builder`.
    pub fn with_builder(builder: B) -> Self {
        Self {
            p1: None,
            p2: None,
            cellsize: None,
            units: default_units(),
            dims: default_dims(),
            magnetisation: DEFAULT_MAGNETISATION,
            region: None,
            builder,
        }
    }

    pub const fn p1(&self) -> Option<Vec3> {
        self.p1
    }

    pub const fn p2(&self) -> Option<Vec3> {
        self.p2
    }

    pub const fn cellsize(&self) -> Option<Vec3> {
        self.cellsize
    }

    pub fn units(&self) -> &Labels {
        &self.units
    }

    pub fn dims(&self) -> &Labels {
        &self.dims
    }

    pub const fn magnetisation(&self) -> Vec3 {
        self.magnetisation
    }

    /// The materialized region, if [`Self::create`] has succeeded.
    pub fn region(&self) -> Option<&B::Region> {
        self.region.as_ref()
    }

    pub fn is_materialized(&self) -> bool {
        self.region.is_some()
    }

    /// The region if materialized, otherwise the current far corner.
    pub fn current(&self) -> SubRegionView<'_, B::Region> {
        match &self.region {
            Some(region) => SubRegionView::Region(region),
            None => SubRegionView::Corner(self.p2),
        }
    }

    /// Applies an update and, unless disabled, rebuilds the region.
    ///
    /// Supplied corners are scaled by the supplied cell size, or failing
    /// that by a [`UnitSpec::Scale`], and replace the stored ones. Corners
    /// already stored are never rescaled, so a cell size on its own is only
    /// recorded. [`UnitSpec::Labels`] only replaces the unit labels.
    ///
    /// Returns the result of [`Self::create`], or `Ok(false)` if creation was skipped.
    ///
    /// # Errors
    ///
    /// Propagates builder failures from [`Self::create`].
    pub fn apply(&mut self, update: SubRegionUpdate) -> Result<bool, GeometryError> {
        let SubRegionUpdate {
            p1,
            p2,
            cellsize,
            units,
            dims,
            magnetisation,
            auto_create,
        } = update;

        let factor = match (&cellsize, &units) {
            (Some(cell), _) => Some(*cell),
            (None, Some(UnitSpec::Scale(by))) => Some(*by),
            _ => None,
        };
        // Only corners arriving with this update are in cell units.
        let convert = |p: Vec3| factor.map_or(p, |by| scale(p, by));
        if let Some(p) = p1 {
            self.p1 = Some(convert(p));
        }
        if let Some(p) = p2 {
            self.p2 = Some(convert(p));
        }
        if cellsize.is_some() {
            self.cellsize = cellsize;
        }
        if let Some(UnitSpec::Labels(labels)) = units {
            self.units = labels;
        }
        if let Some(dims) = dims {
            self.dims = dims;
        }
        if let Some(m) = magnetisation {
            self.magnetisation = m;
        }

        tracing::debug!(p1 = ?self.p1, p2 = ?self.p2, auto_create, "updated sub-region");

        if auto_create {
            self.create()
        } else {
            Ok(false)
        }
    }

    /// Materializes the region from the current corners.
    ///
    /// An empty corner is not an error: it is logged as `invalid args` and
    /// `Ok(false)` is returned, leaving any previous region in place.
    ///
    /// # Errors
    ///
    /// Returns whatever the builder reports for invalid corners.
    pub fn create(&mut self) -> Result<bool, GeometryError> {
        let (Some(p1), Some(p2)) = (self.p1, self.p2) else {
            tracing::warn!(p1 = ?self.p1, p2 = ?self.p2, "invalid args: both corners are required");
            return Ok(false);
        };
        let region = self.builder.build(p1, p2, &self.units, &self.dims)?;
        self.region = Some(region);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::labels;
    use crate::geometry::region::Region;

    #[test]
    fn test_fresh_subregion_is_pending() {
        let sub = SubRegion::new();
        assert!(!sub.is_materialized());
        assert_eq!(sub.current(), SubRegionView::Corner(None));
        assert_eq!(sub.magnetisation(), DEFAULT_MAGNETISATION);
    }

    #[test]
    fn test_corners_create_region() {
        let mut sub = SubRegion::new();
        let created = sub
            .apply(SubRegionUpdate::corners([0.0; 3], [1.0; 3]))
            .unwrap();
        assert!(created);
        match sub.current() {
            SubRegionView::Region(r) => assert_eq!(r.pmax(), [1.0; 3]),
            SubRegionView::Corner(_) => panic!("expected a region"),
        }
    }

    #[test]
    fn test_cellsize_scales_corners() {
        let mut sub = SubRegion::new();
        sub.apply(
            SubRegionUpdate::corners([0.0, 0.0, 0.0], [10.0, 20.0, 2.0])
                .cellsize([2.0, 0.5, 4.0])
                .no_create(),
        )
        .unwrap();
        assert_eq!(sub.p2(), Some([20.0, 10.0, 8.0]));
        assert_eq!(sub.cellsize(), Some([2.0, 0.5, 4.0]));
        assert!(!sub.is_materialized());
        assert_eq!(sub.current(), SubRegionView::Corner(Some([20.0, 10.0, 8.0])));
    }

    #[test]
    fn test_cellsize_takes_precedence_over_scale_units() {
        let mut sub = SubRegion::new();
        sub.apply(
            SubRegionUpdate::corners([1.0; 3], [2.0; 3])
                .cellsize([2.0; 3])
                .units(UnitSpec::Scale([100.0; 3]))
                .no_create(),
        )
        .unwrap();
        assert_eq!(sub.p1(), Some([2.0; 3]));
        assert_eq!(sub.p2(), Some([4.0; 3]));
    }

    #[test]
    fn test_scale_units_without_cellsize() {
        let mut sub = SubRegion::new();
        sub.apply(
            SubRegionUpdate::corners([1.0; 3], [2.0; 3])
                .units(UnitSpec::Scale([10.0, 1.0, 0.5]))
                .no_create(),
        )
        .unwrap();
        assert_eq!(sub.p2(), Some([20.0, 2.0, 1.0]));
        assert_eq!(sub.units(), &default_units());
    }

    #[test]
    fn test_cellsize_only_update_does_not_rescale() {
        let mut sub = SubRegion::new();
        sub.apply(SubRegionUpdate::corners([1.0; 3], [2.0; 3]).cellsize([2.0; 3]))
            .unwrap();
        assert_eq!(sub.p2(), Some([4.0; 3]));

        sub.apply(SubRegionUpdate::new().cellsize([2.0; 3])).unwrap();
        sub.apply(SubRegionUpdate::new().units(UnitSpec::Scale([3.0; 3])))
            .unwrap();
        assert_eq!(sub.p1(), Some([2.0; 3]));
        assert_eq!(sub.p2(), Some([4.0; 3]));
        assert_eq!(sub.cellsize(), Some([2.0; 3]));
        match sub.current() {
            SubRegionView::Region(r) => assert_eq!(r.pmax(), [4.0; 3]),
            SubRegionView::Corner(_) => panic!("expected a region"),
        }
    }

    #[test]
    fn test_single_corner_update_scales_only_that_corner() {
        let mut sub = SubRegion::new();
        sub.apply(SubRegionUpdate::corners([1.0; 3], [2.0; 3]).cellsize([2.0; 3]))
            .unwrap();
        sub.apply(SubRegionUpdate::new().p2([5.0; 3]).cellsize([2.0; 3]))
            .unwrap();
        assert_eq!(sub.p1(), Some([2.0; 3]));
        assert_eq!(sub.p2(), Some([10.0; 3]));
    }

    #[test]
    fn test_label_units_do_not_scale() {
        let mut sub = SubRegion::new();
        sub.apply(
            SubRegionUpdate::corners([1.0; 3], [2.0; 3])
                .units(UnitSpec::Labels(labels("nm", "nm", "nm")))
                .dims(labels("u", "v", "w")),
        )
        .unwrap();
        assert_eq!(sub.p2(), Some([2.0; 3]));
        let region: &Region = sub.region().unwrap();
        assert_eq!(region.units(), &labels("nm", "nm", "nm"));
        assert_eq!(region.dims(), &labels("u", "v", "w"));
    }

    #[test]
    fn test_create_with_missing_corner_reports_without_error() {
        let mut sub = SubRegion::new();
        let created = sub.apply(SubRegionUpdate::new().p1([0.0; 3])).unwrap();
        assert!(!created);
        assert!(!sub.is_materialized());
        assert!(!sub.create().unwrap());
    }

    #[test]
    fn test_degenerate_corners_propagate_builder_error() {
        let mut sub = SubRegion::new();
        let err = sub
            .apply(SubRegionUpdate::corners([0.0; 3], [1.0, 1.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateRegion { .. }));
        assert!(!sub.is_materialized());
    }

    #[test]
    fn test_custom_builder_receives_arguments() {
        #[derive(Debug, Clone, Copy)]
        struct Recorder;

        impl RegionBuilder for Recorder {
            type Region = (Vec3, Vec3, String);

            fn build(
                &self,
                p1: Vec3,
                p2: Vec3,
                units: &Labels,
                _dims: &Labels,
            ) -> Result<Self::Region, GeometryError> {
                Ok((p1, p2, units[0].clone()))
            }
        }

        let mut sub = SubRegion::with_builder(Recorder);
        sub.apply(SubRegionUpdate::corners([0.0; 3], [0.0; 3])).unwrap();
        assert_eq!(
            sub.region(),
            Some(&([0.0; 3], [0.0; 3], "m".to_string()))
        );
    }
}
