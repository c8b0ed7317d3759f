//! Boundary curves of the four-sided control-grid patch.
//!
//! Walking `V0 -> UN -> VN -> U0` visits the patch corners counter-clockwise
//! (seen from +z) and ends where it started:
//!
//! ```text
//!   (0,nv-1) <------ VN ------ (nu-1,nv-1)
//!      |                            ^
//!      U0                           UN
//!      v                            |
//!   (0,0) -------- V0 ------> (nu-1,0)
//! ```

use hfs_core::error::{HfsError, Result};
use hfs_core::Tolerance;
use hfs_math::Point3;
use serde::{Deserialize, Serialize};

use crate::nurbs::KnotVector;
use crate::sampling::ControlGrid;

/// One edge of the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryEdge {
    /// `v = 0`, running `u = 0 -> nu-1`.
    V0,
    /// `u = nu-1`, running `v = 0 -> nv-1`.
    UN,
    /// `v = nv-1`, running `u = nu-1 -> 0`.
    VN,
    /// `u = 0`, running `v = nv-1 -> 0`.
    U0,
}

impl BoundaryEdge {
    /// Edges in closed-loop order.
    pub const LOOP: [BoundaryEdge; 4] = [Self::V0, Self::UN, Self::VN, Self::U0];

    /// The edge that follows this one in the loop.
    pub fn next(self) -> Self {
        match self {
            Self::V0 => Self::UN,
            Self::UN => Self::VN,
            Self::VN => Self::U0,
            Self::U0 => Self::V0,
        }
    }

    /// Whether the edge walks against its lattice direction.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::VN | Self::U0)
    }

    /// Whether the edge runs along `u` (and so carries the u knot vector).
    pub fn runs_along_u(self) -> bool {
        matches!(self, Self::V0 | Self::VN)
    }
}

/// A cubic boundary curve: control points taken from the grid edge plus the
/// knot vector of the direction it runs along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCurve {
    pub edge: BoundaryEdge,
    pub control_points: Vec<Point3>,
    pub knots: KnotVector,
}

impl BoundaryCurve {
    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn start(&self) -> Point3 {
        self.control_points[0]
    }

    pub fn end(&self) -> Point3 {
        self.control_points[self.control_points.len() - 1]
    }

    /// Control points as a flat `[x, y, z, ...]` buffer.
    pub fn flat_points(&self) -> Vec<f64> {
        self.control_points
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }
}

/// The four boundary curves of a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchBoundary {
    pub v0: BoundaryCurve,
    pub un: BoundaryCurve,
    pub vn: BoundaryCurve,
    pub u0: BoundaryCurve,
}

impl PatchBoundary {
    pub fn get(&self, edge: BoundaryEdge) -> &BoundaryCurve {
        match edge {
            BoundaryEdge::V0 => &self.v0,
            BoundaryEdge::UN => &self.un,
            BoundaryEdge::VN => &self.vn,
            BoundaryEdge::U0 => &self.u0,
        }
    }

    /// Curves in the order `V0, UN, VN, U0`.
    pub fn in_loop_order(&self) -> [&BoundaryCurve; 4] {
        BoundaryEdge::LOOP.map(|edge| self.get(edge))
    }

    /// Whether each curve ends where the next one starts.
    pub fn is_closed(&self, tol: Tolerance) -> bool {
        BoundaryEdge::LOOP.iter().all(|&edge| {
            let end = self.get(edge).end();
            let start = self.get(edge.next()).start();
            tol.points_eq(end.to_array(), start.to_array())
        })
    }
}

/// Extract the four boundary curves of `grid` with closed-loop orientation.
///
/// Reversed edges reuse the forward knot vector; that is only valid for
/// symmetric knots, which the clamped uniform vectors built here always are.
pub fn extract_boundaries(grid: &ControlGrid) -> Result<PatchBoundary> {
    let (nu, nv) = (grid.nu(), grid.nv());
    let knots_u = KnotVector::cubic(nu)?;
    let knots_v = KnotVector::cubic(nv)?;
    if !knots_u.is_symmetric(Tolerance::default()) || !knots_v.is_symmetric(Tolerance::default()) {
        return Err(HfsError::Computation(
            "boundary knot vectors are not symmetric under reversal".into(),
        ));
    }

    let (u_last, v_last) = (nu - 1, nv - 1);

    let v0 = (0..nu).map(|u| grid.point(u, 0)).collect();
    let un = (0..nv).map(|v| grid.point(u_last, v)).collect();
    let vn = (0..nu).rev().map(|u| grid.point(u, v_last)).collect();
    let u0 = (0..nv).rev().map(|v| grid.point(0, v)).collect();

    Ok(PatchBoundary {
        v0: BoundaryCurve {
            edge: BoundaryEdge::V0,
            control_points: v0,
            knots: knots_u.clone(),
        },
        un: BoundaryCurve {
            edge: BoundaryEdge::UN,
            control_points: un,
            knots: knots_v.clone(),
        },
        vn: BoundaryCurve {
            edge: BoundaryEdge::VN,
            control_points: vn,
            knots: knots_u,
        },
        u0: BoundaryCurve {
            edge: BoundaryEdge::U0,
            control_points: u0,
            knots: knots_v,
        },
    })
}
