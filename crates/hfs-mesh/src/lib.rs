pub mod buffers;
pub mod tessellator;

pub use buffers::{IndexBase, MeshBuffers, NormalMode};
pub use tessellator::{tessellate_height_field, MeshOptions};
