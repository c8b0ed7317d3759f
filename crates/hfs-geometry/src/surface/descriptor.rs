//! Cubic tensor-product B-spline surface descriptor.

use hfs_core::error::{HfsError, Result};
use hfs_core::traits::Validate;
use hfs_math::Point3;
use serde::Serialize;

use crate::nurbs::{KnotVector, CUBIC};
use crate::sampling::ControlGrid;

/// Everything a geometry kernel needs to build a clamped cubic B-spline surface.
///
/// Only constructed through [`SurfaceDescriptor::assemble`] or
/// [`SurfaceDescriptor::from_grid`], so a descriptor in hand has passed
/// validation. Empty `weights` means every control point has weight 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceDescriptor {
    degree_u: usize,
    degree_v: usize,
    periodic_u: bool,
    periodic_v: bool,
    grid: ControlGrid,
    knots_u: KnotVector,
    knots_v: KnotVector,
    weights: Vec<f64>,
}

impl SurfaceDescriptor {
    /// Package a control grid with its knot vectors and optional weights.
    pub fn assemble(
        grid: ControlGrid,
        knots_u: KnotVector,
        knots_v: KnotVector,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let descriptor = Self {
            degree_u: CUBIC,
            degree_v: CUBIC,
            periodic_u: false,
            periodic_v: false,
            grid,
            knots_u,
            knots_v,
            weights,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Unweighted descriptor with clamped uniform cubic knots in both directions.
    pub fn from_grid(grid: ControlGrid) -> Result<Self> {
        let knots_u = KnotVector::cubic(grid.nu())?;
        let knots_v = KnotVector::cubic(grid.nv())?;
        Self::assemble(grid, knots_u, knots_v, Vec::new())
    }

    /// `(degree_u, degree_v)`, always `(3, 3)`.
    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_u, self.degree_v)
    }

    /// `(periodic_u, periodic_v)`, always `(false, false)`.
    pub fn periodic(&self) -> (bool, bool) {
        (self.periodic_u, self.periodic_v)
    }

    pub fn grid(&self) -> &ControlGrid {
        &self.grid
    }

    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn is_rational(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Weight of control point `(u, v)`; 1.0 when unweighted.
    pub fn weight(&self, u: usize, v: usize) -> f64 {
        if self.weights.is_empty() {
            1.0
        } else {
            self.weights[v * self.grid.nu() + u]
        }
    }

    /// Control points as `rows[u][v]`, for kernels that take nested grids.
    pub fn control_rows(&self) -> Vec<Vec<Point3>> {
        (0..self.grid.nu())
            .map(|u| (0..self.grid.nv()).map(|v| self.grid.point(u, v)).collect())
            .collect()
    }

    pub fn domain_u(&self) -> (f64, f64) {
        self.knots_u.domain()
    }

    pub fn domain_v(&self) -> (f64, f64) {
        self.knots_v.domain()
    }

    pub fn into_parts(self) -> (ControlGrid, KnotVector, KnotVector, Vec<f64>) {
        (self.grid, self.knots_u, self.knots_v, self.weights)
    }
}

impl Validate for SurfaceDescriptor {
    fn validate(&self) -> Result<()> {
        let expected = 3 * self.grid.nu() * self.grid.nv();
        if self.grid.coords().len() != expected {
            return Err(HfsError::Validation(format!(
                "control grid {}x{} holds {} coordinates, expected {}",
                self.grid.nu(),
                self.grid.nv(),
                self.grid.coords().len(),
                expected
            )));
        }
        for (name, knots) in [("u", &self.knots_u), ("v", &self.knots_v)] {
            if knots.degree() != CUBIC {
                return Err(HfsError::Validation(format!(
                    "{} knot vector has degree {}, surfaces are cubic",
                    name,
                    knots.degree()
                )));
            }
        }
        self.knots_u.check_len(self.grid.nu(), "u")?;
        self.knots_v.check_len(self.grid.nv(), "v")?;
        self.knots_u.validate()?;
        self.knots_v.validate()?;

        if !self.weights.is_empty() {
            if self.weights.len() != self.grid.len() {
                return Err(HfsError::Validation(format!(
                    "expected {} weights (or none), got {}",
                    self.grid.len(),
                    self.weights.len()
                )));
            }
            if let Some(w) = self.weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
                return Err(HfsError::Validation(format!(
                    "weights must be positive and finite, got {}",
                    w
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::height::HeightFunction;
    use crate::sampling::{sample_grid, SamplingSpec};

    fn grid(nu: usize, nv: usize) -> ControlGrid {
        let spec = SamplingSpec::new(nu, nv, 10.0, 10.0).unwrap();
        sample_grid(&spec, &HeightFunction::surface_default()).unwrap()
    }

    #[test]
    fn test_from_grid_fixed_shape() {
        let desc = SurfaceDescriptor::from_grid(grid(6, 9)).unwrap();
        assert_eq!(desc.degrees(), (3, 3));
        assert_eq!(desc.periodic(), (false, false));
        assert_eq!(desc.knots_u().len(), 10);
        assert_eq!(desc.knots_v().len(), 13);
        assert!(!desc.is_rational());
        assert_eq!(desc.weight(2, 3), 1.0);
        assert_eq!(desc.domain_u(), (0.0, 1.0));
    }

    #[test]
    fn test_rejects_swapped_knot_vectors() {
        let knots_u = KnotVector::cubic(6).unwrap();
        let knots_v = KnotVector::cubic(9).unwrap();
        let err = SurfaceDescriptor::assemble(grid(6, 9), knots_v, knots_u, vec![]).unwrap_err();
        assert!(matches!(err, HfsError::Validation(_)), "got {:?}", err);
    }

    #[test]
    fn test_rejects_non_cubic_knots() {
        let knots_u = KnotVector::clamped_uniform(5, 2).unwrap();
        let knots_v = KnotVector::cubic(5).unwrap();
        assert!(SurfaceDescriptor::assemble(grid(5, 5), knots_u, knots_v, vec![]).is_err());
    }

    #[test]
    fn test_weights_checked() {
        let g = grid(4, 4);
        let k = KnotVector::cubic(4).unwrap();

        let ok = SurfaceDescriptor::assemble(g.clone(), k.clone(), k.clone(), vec![2.0; 16]).unwrap();
        assert!(ok.is_rational());
        assert_eq!(ok.weight(3, 3), 2.0);

        assert!(SurfaceDescriptor::assemble(g.clone(), k.clone(), k.clone(), vec![1.0; 15]).is_err());

        let mut bad = vec![1.0; 16];
        bad[5] = 0.0;
        assert!(SurfaceDescriptor::assemble(g, k.clone(), k, bad).is_err());
    }

    #[test]
    fn test_control_rows_layout() {
        let g = grid(5, 4);
        let desc = SurfaceDescriptor::from_grid(g.clone()).unwrap();
        let rows = desc.control_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(rows[4][3], g.point(4, 3));
    }

    #[test]
    fn test_three_point_grid_rejected() {
        let g = ControlGrid::from_coords(3, 4, vec![0.0; 36]).unwrap();
        assert!(matches!(
            SurfaceDescriptor::from_grid(g),
            Err(HfsError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_short_coordinate_buffer() {
        let short = ControlGrid {
            nu: 4,
            nv: 4,
            coords: Vec::new(),
        };
        let err = SurfaceDescriptor::from_grid(short).unwrap_err();
        assert!(matches!(err, HfsError::Validation(_)), "got {:?}", err);
    }
}
