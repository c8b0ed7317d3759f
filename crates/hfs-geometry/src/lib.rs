//! HFSurf geometry: height-field sampling, knot vectors, boundary curves,
//! and cubic B-spline surface descriptors.

pub mod body;
pub mod boundary;
pub mod height;
pub mod nurbs;
pub mod sampling;
pub mod surface;

pub use body::{materialize_body, GeometryKernel, PatchBodyDefinition};
pub use boundary::{extract_boundaries, BoundaryCurve, BoundaryEdge, PatchBoundary};
pub use height::{HeightField, HeightFunction};
pub use nurbs::KnotVector;
pub use sampling::{sample_grid, ControlGrid, SamplingSpec};
pub use surface::SurfaceDescriptor;
