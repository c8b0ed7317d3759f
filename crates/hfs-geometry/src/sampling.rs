//! Grid sampling of a height field over a rectangular lattice.

use hfs_core::error::{HfsError, Result};
use hfs_core::traits::Validate;
use hfs_math::{Aabb3, DVec3, Point3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::height::HeightField;

/// Minimum lattice size per direction for cubic spline work (`degree + 1`).
pub const MIN_SURFACE_POINTS: usize = 4;

/// Minimum lattice size per direction for meshing (a single cell).
pub const MIN_MESH_POINTS: usize = 2;

/// Lattice resolution and domain extents for one sampling request.
///
/// Fields are private: a `SamplingSpec` only exists in validated form.
#[derive(Debug, Clone, Copy)]
pub struct SamplingSpec {
    nu: usize,
    nv: usize,
    lx: f64,
    ly: f64,
    min_points: usize,
}

impl SamplingSpec {
    /// Spec for spline surfaces: `nu, nv >= 4`, positive finite extents.
    pub fn new(nu: usize, nv: usize, lx: f64, ly: f64) -> Result<Self> {
        Self::with_min_points(nu, nv, lx, ly, MIN_SURFACE_POINTS)
    }

    /// Spec for display meshes, which only need one cell: `nu, nv >= 2`.
    pub fn for_mesh(nu: usize, nv: usize, lx: f64, ly: f64) -> Result<Self> {
        Self::with_min_points(nu, nv, lx, ly, MIN_MESH_POINTS)
    }

    /// Square `n x n` lattice over a square domain of side `extent`.
    pub fn square(n: usize, extent: f64) -> Result<Self> {
        Self::new(n, n, extent, extent)
    }

    fn with_min_points(nu: usize, nv: usize, lx: f64, ly: f64, min_points: usize) -> Result<Self> {
        let spec = Self {
            nu,
            nv,
            lx,
            ly,
            min_points,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    pub fn lx(&self) -> f64 {
        self.lx
    }

    pub fn ly(&self) -> f64 {
        self.ly
    }

    /// Whether this spec is large enough for cubic spline work.
    pub fn supports_surface(&self) -> bool {
        self.nu >= MIN_SURFACE_POINTS && self.nv >= MIN_SURFACE_POINTS
    }

    /// Total number of lattice points.
    pub fn point_count(&self) -> usize {
        self.nu * self.nv
    }

    /// x coordinate of lattice column `u`.
    pub fn x_at(&self, u: usize) -> f64 {
        u as f64 * self.lx / (self.nu - 1) as f64
    }

    /// y coordinate of lattice row `v`.
    pub fn y_at(&self, v: usize) -> f64 {
        v as f64 * self.ly / (self.nv - 1) as f64
    }
}

/// Two specs are equal when they describe the same lattice, whichever
/// minimum they were validated against.
impl PartialEq for SamplingSpec {
    fn eq(&self, other: &Self) -> bool {
        self.nu == other.nu && self.nv == other.nv && self.lx == other.lx && self.ly == other.ly
    }
}

impl Validate for SamplingSpec {
    fn validate(&self) -> Result<()> {
        if self.nu < self.min_points || self.nv < self.min_points {
            return Err(HfsError::Validation(format!(
                "lattice {}x{} is too small: need at least {} points per direction",
                self.nu, self.nv, self.min_points
            )));
        }
        for (name, extent) in [("lx", self.lx), ("ly", self.ly)] {
            if !extent.is_finite() || extent <= 0.0 {
                return Err(HfsError::Validation(format!(
                    "extent {} must be positive and finite, got {}",
                    name, extent
                )));
            }
        }
        Ok(())
    }
}

/// Sampled control points, stored flat as `[x, y, z]` triples.
///
/// Point `(u, v)` starts at offset `3 * (v * nu + u)`, so `u` varies fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawControlGrid")]
pub struct ControlGrid {
    pub(crate) nu: usize,
    pub(crate) nv: usize,
    pub(crate) coords: Vec<f64>,
}

/// Unchecked wire form of [`ControlGrid`].
#[derive(Deserialize)]
struct RawControlGrid {
    nu: usize,
    nv: usize,
    coords: Vec<f64>,
}

impl TryFrom<RawControlGrid> for ControlGrid {
    type Error = HfsError;

    fn try_from(raw: RawControlGrid) -> Result<Self> {
        Self::from_coords(raw.nu, raw.nv, raw.coords)
    }
}

impl ControlGrid {
    /// Wrap an existing flat coordinate buffer.
    pub fn from_coords(nu: usize, nv: usize, coords: Vec<f64>) -> Result<Self> {
        if coords.len() != 3 * nu * nv {
            return Err(HfsError::Validation(format!(
                "control grid {}x{} needs {} coordinates, got {}",
                nu,
                nv,
                3 * nu * nv,
                coords.len()
            )));
        }
        Ok(Self { nu, nv, coords })
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.nu * self.nv
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The flat coordinate buffer of length `3 * nu * nv`.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn into_coords(self) -> Vec<f64> {
        self.coords
    }

    /// Offset of point `(u, v)` in the flat buffer.
    pub fn offset(&self, u: usize, v: usize) -> usize {
        3 * (v * self.nu + u)
    }

    /// Point at lattice position `(u, v)`.
    ///
    /// # Panics
    /// Panics if `(u, v)` lies outside the lattice.
    pub fn point(&self, u: usize, v: usize) -> Point3 {
        assert!(
            u < self.nu && v < self.nv,
            "lattice index ({}, {}) out of range for {}x{}",
            u,
            v,
            self.nu,
            self.nv
        );
        let i = self.offset(u, v);
        DVec3::new(self.coords[i], self.coords[i + 1], self.coords[i + 2])
    }

    pub fn get(&self, u: usize, v: usize) -> Option<Point3> {
        (u < self.nu && v < self.nv).then(|| self.point(u, v))
    }

    /// All points in storage order (`u` fastest).
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        self.coords
            .chunks_exact(3)
            .map(|c| DVec3::new(c[0], c[1], c[2]))
    }

    /// Corner points in boundary-loop order: `(0,0)`, `(nu-1,0)`, `(nu-1,nv-1)`, `(0,nv-1)`.
    pub fn corners(&self) -> [Point3; 4] {
        let (u_last, v_last) = (self.nu - 1, self.nv - 1);
        [
            self.point(0, 0),
            self.point(u_last, 0),
            self.point(u_last, v_last),
            self.point(0, v_last),
        ]
    }

    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(self.points()).unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }
}

/// Evaluate `field` over the lattice described by `spec`.
///
/// Fails with [`HfsError::Computation`] on the first non-finite height.
pub fn sample_grid(spec: &SamplingSpec, field: &impl HeightField) -> Result<ControlGrid> {
    let (nu, nv) = (spec.nu(), spec.nv());
    let mut coords = vec![0.0; 3 * nu * nv];

    for u in 0..nu {
        let x = spec.x_at(u);
        for v in 0..nv {
            let y = spec.y_at(v);
            let z = field.height(x, y);
            if !z.is_finite() {
                return Err(HfsError::Computation(format!(
                    "height field returned {} at lattice ({}, {}), x={}, y={}",
                    z, u, v, x, y
                )));
            }
            let idx = 3 * (v * nu + u);
            coords[idx] = x;
            coords[idx + 1] = y;
            coords[idx + 2] = z;
        }
    }

    debug!("sampled {}x{} control grid over {}x{}", nu, nv, spec.lx(), spec.ly());
    Ok(ControlGrid { nu, nv, coords })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::height::HeightFunction;

    #[test]
    fn test_spec_rejects_small_lattice() {
        assert!(matches!(
            SamplingSpec::new(3, 10, 1.0, 1.0),
            Err(HfsError::Validation(_))
        ));
        assert!(matches!(
            SamplingSpec::new(1, 1, 1.0, 1.0),
            Err(HfsError::Validation(_))
        ));
        assert!(SamplingSpec::new(4, 4, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_spec_rejects_bad_extents() {
        assert!(SamplingSpec::new(4, 4, 0.0, 1.0).is_err());
        assert!(SamplingSpec::new(4, 4, 1.0, -2.0).is_err());
        assert!(SamplingSpec::new(4, 4, f64::NAN, 1.0).is_err());
        assert!(SamplingSpec::new(4, 4, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_mesh_spec_allows_single_cell() {
        let spec = SamplingSpec::for_mesh(2, 3, 1.0, 1.0).unwrap();
        assert!(!spec.supports_surface());
        assert!(SamplingSpec::for_mesh(1, 3, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_flat_4x4_grid() {
        let spec = SamplingSpec::square(4, 10.0).unwrap();
        let grid = sample_grid(&spec, &HeightFunction::Flat).unwrap();
        assert_eq!(grid.coords().len(), 3 * 16);
        assert_eq!(grid.len(), 16);
        assert!(grid.points().all(|p| p.z == 0.0));
        assert_eq!(grid.point(3, 3), DVec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_index_formula_round_trip() {
        let spec = SamplingSpec::new(6, 5, 10.0, 4.0).unwrap();
        let f = |x: f64, y: f64| x * x - 3.0 * y;
        let grid = sample_grid(&spec, &f).unwrap();

        for v in 0..5 {
            for u in 0..6 {
                let x = u as f64 * 10.0 / 5.0;
                let y = v as f64 * 4.0 / 4.0;
                let idx = 3 * (v * 6 + u);
                assert_eq!(grid.coords()[idx], x);
                assert_eq!(grid.coords()[idx + 1], y);
                assert_eq!(grid.coords()[idx + 2], f(x, y));
                assert_eq!(grid.point(u, v), DVec3::new(x, y, f(x, y)));
            }
        }
    }

    #[test]
    fn test_non_finite_height_is_computation_error() {
        let spec = SamplingSpec::square(4, 1.0).unwrap();
        let f = |x: f64, _y: f64| if x > 0.5 { f64::NAN } else { 0.0 };
        let err = sample_grid(&spec, &f).unwrap_err();
        assert!(matches!(err, HfsError::Computation(_)), "got {:?}", err);
    }

    #[test]
    fn test_corners_in_loop_order() {
        let spec = SamplingSpec::new(4, 5, 3.0, 8.0).unwrap();
        let grid = sample_grid(&spec, &HeightFunction::Flat).unwrap();
        let [c0, c1, c2, c3] = grid.corners();
        assert_eq!(c0, DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(c1, DVec3::new(3.0, 0.0, 0.0));
        assert_eq!(c2, DVec3::new(3.0, 8.0, 0.0));
        assert_eq!(c3, DVec3::new(0.0, 8.0, 0.0));
    }

    #[test]
    fn test_from_coords_length_check() {
        assert!(ControlGrid::from_coords(4, 4, vec![0.0; 48]).is_ok());
        assert!(matches!(
            ControlGrid::from_coords(4, 4, vec![0.0; 47]),
            Err(HfsError::Validation(_))
        ));
    }

    #[test]
    fn test_get_out_of_range() {
        let spec = SamplingSpec::square(4, 1.0).unwrap();
        let grid = sample_grid(&spec, &HeightFunction::Flat).unwrap();
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(3, 3).is_some());
    }

    #[test]
    fn test_bounding_box_relief() {
        let spec = SamplingSpec::square(8, 10.0).unwrap();
        let grid = sample_grid(&spec, &HeightFunction::surface_default()).unwrap();
        let bb = grid.bounding_box();
        assert_eq!(bb.min.x, 0.0);
        assert_eq!(bb.max.y, 10.0);
        assert!(bb.relief() <= 0.6 + 1e-12);
    }

    #[test]
    fn test_same_lattice_specs_are_equal() {
        let surface = SamplingSpec::new(4, 4, 2.0, 3.0).unwrap();
        let mesh = SamplingSpec::for_mesh(4, 4, 2.0, 3.0).unwrap();
        assert_eq!(surface, mesh);
        assert_ne!(surface, SamplingSpec::new(4, 5, 2.0, 3.0).unwrap());
    }

    #[test]
    fn test_deserialize_checks_length() {
        let err = serde_json::from_str::<ControlGrid>(r#"{"nu":4,"nv":4,"coords":[]}"#);
        assert!(err.is_err());

        let grid = sample_grid(&SamplingSpec::square(4, 1.0).unwrap(), &HeightFunction::Flat).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: ControlGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
