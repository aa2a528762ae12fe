//! Global system box.
//!
//! The box is described as a number of cells per axis and a cell pitch.
//! Building it converts the cell counts into physical lengths in place and
//! places the far corner `p2` relative to the origin `p1`.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, ValidationError};
use crate::geometry::region::{BoxRegionBuilder, Region, RegionBuilder};
use crate::geometry::{default_dims, default_units, scale, Labels, Vec3};

/// Default cell pitch: 1 nm on every axis.
pub const DEFAULT_CELL: Vec3 = [1e-9, 1e-9, 1e-9];

// Relative distance from an integer below which a cell-count quotient is snapped.
const NUMCELLS_SNAP: f64 = 1e-9;

/// The simulated system's global box.
///
/// # Examples
///
/// ```
/// use magkit::SystemProperties;
///
/// let system = SystemProperties::builder()
///     .lengths([100.0, 50.0, 1.0])
///     .cell([2e-9, 2e-9, 1e-9])
///     .build()
///     .unwrap();
/// assert!((system.lx() - 200e-9).abs() < 1e-18);
/// assert_eq!(system.p2(), [system.lx(), system.ly(), system.lz()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SystemRecord")]
pub struct SystemProperties {
    lx: f64,
    ly: f64,
    lz: f64,
    cell: Vec3,
    p1: Vec3,
    units: Labels,
    p2: Vec3,
    cell_counts: Vec3,
    numcells: Option<[u64; 3]>,
}

impl SystemProperties {
    /// Creates a builder with the default cell, origin and units.
    #[must_use]
    pub fn builder() -> SystemBuilder {
        SystemBuilder::default()
    }

    /// Box lengths along x (physical units once built).
    pub const fn lx(&self) -> f64 {
        self.lx
    }

    pub const fn ly(&self) -> f64 {
        self.ly
    }

    pub const fn lz(&self) -> f64 {
        self.lz
    }

    pub const fn lengths(&self) -> Vec3 {
        [self.lx, self.ly, self.lz]
    }

    pub const fn cell(&self) -> Vec3 {
        self.cell
    }

    /// Origin corner.
    pub const fn p1(&self) -> Vec3 {
        self.p1
    }

    /// Far corner, `p1 + lengths`.
    pub const fn p2(&self) -> Vec3 {
        self.p2
    }

    pub fn units(&self) -> &Labels {
        &self.units
    }

    /// Cell counts as given to the builder.
    pub const fn cell_counts(&self) -> Vec3 {
        self.cell_counts
    }

    /// Derived cell counts; `None` until [`Self::update_numcells`] runs.
    pub const fn numcells(&self) -> Option<[u64; 3]> {
        self.numcells
    }

    /// Edge lengths of the box, `p2 - p1`.
    #[must_use]
    pub fn edges(&self) -> Vec3 {
        [
            self.p2[0] - self.p1[0],
            self.p2[1] - self.p1[1],
            self.p2[2] - self.p1[2],
        ]
    }

    /// Scales the current lengths by the cell pitch and recomputes `p2`.
    ///
    /// Building already does this once. Calling it again scales a second
    /// time; callers that want physical lengths must not call it after build.
    pub fn update_lengths(&mut self) {
        [self.lx, self.ly, self.lz] = scale(self.lengths(), self.cell);
        self.update_p2();
        tracing::debug!(lengths = ?self.lengths(), p2 = ?self.p2, "rescaled system lengths");
    }

    fn update_p2(&mut self) {
        self.p2 = [
            self.p1[0] + self.lx,
            self.p1[1] + self.ly,
            self.p1[2] + self.lz,
        ];
    }

    /// Derives `numcells[i] = floor(length[i] / cell[i])` from the current lengths.
    ///
    /// Quotients within a relative `1e-9` of an integer are taken as that
    /// integer so that `100 * 1e-9 / 1e-9` counts 100 cells, not 99.
    pub fn update_numcells(&mut self) -> [u64; 3] {
        let lengths = self.lengths();
        let counts = [0, 1, 2].map(|i| cell_count(lengths[i], self.cell[i]));
        self.numcells = Some(counts);
        counts
    }

    /// Materializes the whole box with the default region builder.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::DegenerateRegion` if any length is zero.
    pub fn to_region(&self) -> Result<Region, GeometryError> {
        BoxRegionBuilder.build(self.p1, self.p2, &self.units, &default_dims())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_count(length: f64, cell: f64) -> u64 {
    let q = length / cell;
    let nearest = q.round();
    let snapped = if (q - nearest).abs() <= NUMCELLS_SNAP * nearest.abs().max(1.0) {
        nearest
    } else {
        q.floor()
    };
    snapped.max(0.0) as u64
}

fn validate_cell(cell: Vec3) -> Result<(), ValidationError> {
    if cell.iter().all(|c| c.is_finite() && *c > 0.0) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCell { cell })
    }
}

/// Serialized form of [`SystemProperties`].
///
/// Lengths are taken as already scaled. The cell is validated again and `p2`
/// is recomputed from `p1` and the lengths.
#[derive(Deserialize)]
struct SystemRecord {
    lx: f64,
    ly: f64,
    lz: f64,
    cell: Vec3,
    #[serde(default)]
    p1: Vec3,
    #[serde(default = "default_units")]
    units: Labels,
    cell_counts: Vec3,
    #[serde(default)]
    numcells: Option<[u64; 3]>,
}

impl TryFrom<SystemRecord> for SystemProperties {
    type Error = ValidationError;

    fn try_from(record: SystemRecord) -> Result<Self, Self::Error> {
        validate_cell(record.cell)?;
        let mut system = Self {
            lx: record.lx,
            ly: record.ly,
            lz: record.lz,
            cell: record.cell,
            p1: record.p1,
            units: record.units,
            p2: record.p1,
            cell_counts: record.cell_counts,
            numcells: record.numcells,
        };
        system.update_p2();
        Ok(system)
    }
}

/// Builder for [`SystemProperties`].
#[derive(Debug, Clone)]
pub struct SystemBuilder {
    lengths: Option<Vec3>,
    cell: Vec3,
    p1: Vec3,
    units: Labels,
}

impl Default for SystemBuilder {
    fn default() -> Self {
        Self {
            lengths: None,
            cell: DEFAULT_CELL,
            p1: [0.0; 3],
            units: default_units(),
        }
    }
}

impl SystemBuilder {
    /// Number of cells along each axis (required).
    #[must_use]
    pub fn lengths(mut self, lengths: Vec3) -> Self {
        self.lengths = Some(lengths);
        self
    }

    /// Cell pitch (default 1 nm on each axis).
    #[must_use]
    pub fn cell(mut self, cell: Vec3) -> Self {
        self.cell = cell;
        self
    }

    /// Origin corner (default `(0, 0, 0)`).
    #[must_use]
    pub fn origin(mut self, p1: Vec3) -> Self {
        self.p1 = p1;
        self
    }

    /// Unit labels (default metres).
    #[must_use]
    pub fn units(mut self, units: Labels) -> Self {
        self.units = units;
        self
    }

    /// Validates the cell and scales the lengths into physical units.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingField` if no lengths were given
    /// - `ValidationError::InvalidCell` unless every cell component is finite and > 0
    pub fn build(self) -> Result<SystemProperties, ValidationError> {
        let lengths = self.lengths.ok_or_else(|| ValidationError::MissingField {
            field: "lengths".to_string(),
        })?;

        validate_cell(self.cell)?;

        let [lx, ly, lz] = lengths;
        let mut system = SystemProperties {
            lx,
            ly,
            lz,
            cell: self.cell,
            p1: self.p1,
            units: self.units,
            p2: self.p1,
            cell_counts: lengths,
            numcells: None,
        };
        system.update_lengths();
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1e-30)
    }

    #[test]
    fn test_invalid_cell_rejected() {
        for cell in [
            [0.0, 1e-9, 1e-9],
            [1e-9, -1e-9, 1e-9],
            [1e-9, 1e-9, f64::NAN],
        ] {
            let err = SystemProperties::builder()
                .lengths([10.0, 10.0, 1.0])
                .cell(cell)
                .build()
                .unwrap_err();
            assert!(matches!(err, ValidationError::InvalidCell { .. }));
        }
    }

    #[test]
    fn test_serde_round_trip_keeps_geometry() {
        let system = SystemProperties::builder()
            .lengths([4.0, 2.0, 1.0])
            .cell([0.5, 0.5, 0.5])
            .origin([1.0, 0.0, 0.0])
            .build()
            .unwrap();
        let text = serde_json::to_string(&system).unwrap();
        let back: SystemProperties = serde_json::from_str(&text).unwrap();
        assert_eq!(back, system);
    }

    #[test]
    fn test_deserialize_rejects_zero_cell() {
        let text = r#"{"lx": 1.0, "ly": 1.0, "lz": 1.0, "cell": [0.0, 0.0, 0.0],
            "p1": [0.0, 0.0, 0.0], "units": ["m", "m", "m"], "p2": [9.0, 9.0, 9.0],
            "cell_counts": [1.0, 1.0, 1.0], "numcells": null}"#;
        let err = serde_json::from_str::<SystemProperties>(text).unwrap_err();
        assert!(err.to_string().contains("Invalid cell"));
    }

    #[test]
    fn test_deserialize_recomputes_p2() {
        let text = r#"{"lx": 2.0, "ly": 3.0, "lz": 4.0, "cell": [1.0, 1.0, 1.0],
            "p1": [1.0, 1.0, 1.0], "p2": [9.0, 9.0, 9.0], "cell_counts": [2.0, 3.0, 4.0]}"#;
        let mut system: SystemProperties = serde_json::from_str(text).unwrap();
        assert_eq!(system.p2(), [3.0, 4.0, 5.0]);
        assert_eq!(system.update_numcells(), [2, 3, 4]);
    }

    #[test]
    fn test_missing_lengths() {
        let err = SystemProperties::builder().build().unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[test]
    fn test_lengths_scaled_and_p2_offset_from_origin() {
        let system = SystemProperties::builder()
            .lengths([100.0, 20.0, 3.0])
            .cell([2e-9, 5e-9, 1e-9])
            .origin([1e-9, -4e-9, 0.0])
            .build()
            .unwrap();

        assert!(approx(system.lx(), 200e-9));
        assert!(approx(system.ly(), 100e-9));
        assert!(approx(system.lz(), 3e-9));

        let edges = system.edges();
        assert!(approx(edges[0], 100.0 * 2e-9));
        assert!(approx(edges[1], 20.0 * 5e-9));
        assert!(approx(edges[2], 3.0 * 1e-9));
        assert_eq!(system.cell_counts(), [100.0, 20.0, 3.0]);
        assert!(system.numcells().is_none());
    }

    #[test]
    fn test_update_lengths_double_scales() {
        let mut system = SystemProperties::builder()
            .lengths([10.0, 10.0, 10.0])
            .cell([2.0, 2.0, 2.0])
            .build()
            .unwrap();
        assert_eq!(system.lengths(), [20.0, 20.0, 20.0]);
        system.update_lengths();
        assert_eq!(system.lengths(), [40.0, 40.0, 40.0]);
        assert_eq!(system.p2(), [40.0, 40.0, 40.0]);
    }

    #[test]
    fn test_numcells_recovers_counts() {
        let mut system = SystemProperties::builder()
            .lengths([100.0, 50.0, 3.0])
            .cell([1e-9, 3e-9, 0.7e-9])
            .build()
            .unwrap();
        assert_eq!(system.update_numcells(), [100, 50, 3]);
        assert_eq!(system.numcells(), Some([100, 50, 3]));
    }

    #[test]
    fn test_numcells_floors_partial_cells() {
        let mut system = SystemProperties::builder()
            .lengths([10.5, 1.0, 1.0])
            .cell([1.0, 1.0, 1.0])
            .build()
            .unwrap();
        assert_eq!(system.update_numcells(), [10, 1, 1]);
    }

    #[test]
    fn test_to_region_spans_box() {
        let system = SystemProperties::builder()
            .lengths([4.0, 2.0, 1.0])
            .cell([1.0, 1.0, 1.0])
            .build()
            .unwrap();
        let region = system.to_region().unwrap();
        assert_eq!(region.pmin(), [0.0, 0.0, 0.0]);
        assert_eq!(region.pmax(), [4.0, 2.0, 1.0]);
    }
}
