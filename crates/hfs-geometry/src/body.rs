//! Single-face bounded surface bodies and the geometry-kernel capability.
//!
//! A [`PatchBodyDefinition`] is the kernel-neutral recipe for a surface body:
//! four corner vertices, four edges joining them (each carrying its boundary
//! curve), and one face whose outer loop uses those edges. Hosts implement
//! [`GeometryKernel`] to turn the recipe into a native body.

use hfs_core::error::{HfsError, Result};
use hfs_core::Tolerance;
use hfs_math::Point3;
use log::warn;
use serde::Serialize;

use crate::boundary::{BoundaryEdge, PatchBoundary};
use crate::surface::SurfaceDescriptor;

/// An edge of the body: joins two corners along one boundary curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeDefinition {
    pub start_corner: usize,
    pub end_corner: usize,
    pub edge: BoundaryEdge,
}

/// Use of an edge in the face loop. `forward == false` traverses the edge
/// from its end corner back to its start corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeUse {
    pub edge: usize,
    pub forward: bool,
}

/// Kernel-neutral description of a bounded single-face surface body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchBodyDefinition {
    pub surface: SurfaceDescriptor,
    pub boundary: PatchBoundary,
    /// Corners `(0,0)`, `(nu-1,0)`, `(nu-1,nv-1)`, `(0,nv-1)`.
    pub corners: [Point3; 4],
    /// Edges `corner i -> corner i+1` along `V0, UN, VN, U0`.
    pub edges: [EdgeDefinition; 4],
    pub face_loop: [EdgeUse; 4],
    /// Host-side associative id for the single face.
    pub face_id: u32,
}

impl PatchBodyDefinition {
    pub const DEFAULT_FACE_ID: u32 = 501;

    /// Fails if `boundary` does not start its edges at the grid corners.
    pub fn new(surface: SurfaceDescriptor, boundary: PatchBoundary) -> Result<Self> {
        let corners = surface.grid().corners();
        let tol = Tolerance::default();
        for (i, edge) in BoundaryEdge::LOOP.into_iter().enumerate() {
            let start = boundary.get(edge).start();
            if !tol.points_eq(start.to_array(), corners[i].to_array()) {
                return Err(HfsError::Validation(format!(
                    "boundary {:?} starts at {}, grid corner {} is {}",
                    edge, start, i, corners[i]
                )));
            }
        }
        let edges = [0, 1, 2, 3].map(|i| EdgeDefinition {
            start_corner: i,
            end_corner: (i + 1) % 4,
            edge: BoundaryEdge::LOOP[i],
        });
        // Counter-clockwise seen from +z, matching the surface normal du x dv.
        let face_loop = [0, 1, 2, 3].map(|edge| EdgeUse { edge, forward: true });
        Ok(Self {
            surface,
            boundary,
            corners,
            edges,
            face_loop,
            face_id: Self::DEFAULT_FACE_ID,
        })
    }

    /// Corner index where an edge use starts.
    pub fn use_start(&self, edge_use: EdgeUse) -> usize {
        let edge = self.edges[edge_use.edge];
        if edge_use.forward {
            edge.start_corner
        } else {
            edge.end_corner
        }
    }

    /// Corner index where an edge use ends.
    pub fn use_end(&self, edge_use: EdgeUse) -> usize {
        let edge = self.edges[edge_use.edge];
        if edge_use.forward {
            edge.end_corner
        } else {
            edge.start_corner
        }
    }

    /// Whether consecutive edge uses share corners head-to-tail.
    pub fn face_loop_is_closed(&self) -> bool {
        (0..4).all(|i| {
            let next = self.face_loop[(i + 1) % 4];
            self.use_end(self.face_loop[i]) == self.use_start(next)
        })
    }
}

/// Host capability that materializes a bounded surface body.
pub trait GeometryKernel {
    type Body;

    /// Build a body from `definition`. `Ok(None)` means the kernel produced
    /// nothing, which callers treat as a terminal failure.
    fn create_surface_body(&mut self, definition: &PatchBodyDefinition) -> Result<Option<Self::Body>>;
}

/// Ask `kernel` for a body, turning an empty result into a collaborator error.
pub fn materialize_body<K: GeometryKernel>(
    kernel: &mut K,
    definition: &PatchBodyDefinition,
) -> Result<K::Body> {
    match kernel.create_surface_body(definition) {
        Ok(Some(body)) => Ok(body),
        Ok(None) => {
            warn!("geometry kernel returned no body");
            Err(HfsError::Collaborator("surface body creation returned empty".into()))
        }
        Err(err) => {
            warn!("geometry kernel failed: {}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::extract_boundaries;
    use crate::height::HeightFunction;
    use crate::sampling::{sample_grid, SamplingSpec};

    fn definition() -> PatchBodyDefinition {
        let spec = SamplingSpec::new(5, 6, 10.0, 10.0).unwrap();
        let grid = sample_grid(&spec, &HeightFunction::surface_default()).unwrap();
        let boundary = extract_boundaries(&grid).unwrap();
        let surface = SurfaceDescriptor::from_grid(grid).unwrap();
        PatchBodyDefinition::new(surface, boundary).unwrap()
    }

    struct EmptyKernel;

    impl GeometryKernel for EmptyKernel {
        type Body = ();

        fn create_surface_body(&mut self, _definition: &PatchBodyDefinition) -> Result<Option<()>> {
            Ok(None)
        }
    }

    struct CountingKernel {
        calls: usize,
    }

    impl GeometryKernel for CountingKernel {
        type Body = usize;

        fn create_surface_body(&mut self, definition: &PatchBodyDefinition) -> Result<Option<usize>> {
            self.calls += 1;
            Ok(Some(definition.surface.grid().len()))
        }
    }

    #[test]
    fn test_edges_match_boundary_curves() {
        let def = definition();
        for edge in def.edges {
            let curve = def.boundary.get(edge.edge);
            assert_eq!(curve.start(), def.corners[edge.start_corner]);
            assert_eq!(curve.end(), def.corners[edge.end_corner]);
        }
    }

    #[test]
    fn test_face_loop_closed() {
        let def = definition();
        assert!(def.face_loop_is_closed());
        assert_eq!(def.use_start(def.face_loop[0]), 0);
        assert_eq!(def.use_end(def.face_loop[3]), 0);
        assert_eq!(def.face_id, 501);
    }

    #[test]
    fn test_reversed_loop_still_closed() {
        let mut def = definition();
        def.face_loop = [3, 2, 1, 0].map(|edge| EdgeUse { edge, forward: false });
        assert!(def.face_loop_is_closed());
        def.face_loop[1].forward = true;
        assert!(!def.face_loop_is_closed());
    }

    #[test]
    fn test_empty_body_is_collaborator_error() {
        let err = materialize_body(&mut EmptyKernel, &definition()).unwrap_err();
        assert!(matches!(err, HfsError::Collaborator(_)));
    }

    #[test]
    fn test_kernel_called_once() {
        let mut kernel = CountingKernel { calls: 0 };
        let body = materialize_body(&mut kernel, &definition()).unwrap();
        assert_eq!(body, 30);
        assert_eq!(kernel.calls, 1);
    }

    #[test]
    fn test_rejects_boundary_of_other_grid() {
        let spec = SamplingSpec::new(5, 6, 10.0, 10.0).unwrap();
        let grid = sample_grid(&spec, &HeightFunction::surface_default()).unwrap();
        let surface = SurfaceDescriptor::from_grid(grid).unwrap();

        let other = SamplingSpec::new(5, 6, 20.0, 10.0).unwrap();
        let other_grid = sample_grid(&other, &HeightFunction::surface_default()).unwrap();
        let boundary = extract_boundaries(&other_grid).unwrap();

        let err = PatchBodyDefinition::new(surface, boundary).unwrap_err();
        assert!(matches!(err, HfsError::Validation(_)), "got {:?}", err);
    }
}
