//! Surface descriptors handed to an external geometry kernel.

mod descriptor;

pub use descriptor::SurfaceDescriptor;
