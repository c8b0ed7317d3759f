//! Display capability provided by the host.

use std::fmt::Debug;

use hfs_core::error::Result;
use hfs_mesh::MeshBuffers;

/// Host capability that turns mesh buffers into on-screen resources.
///
/// Every successful `materialize` is paired with exactly one `release` of the
/// returned handle; a released handle is never used again.
pub trait DisplayBackend {
    type Handle: Copy + Debug + PartialEq;

    /// Create display resources for `mesh` under `name`.
    fn materialize(&mut self, name: &str, mesh: &MeshBuffers) -> Result<Self::Handle>;

    /// Free the resources behind `handle`.
    fn release(&mut self, handle: Self::Handle) -> Result<()>;

    /// Redraw after resources changed.
    fn refresh(&mut self) {}
}
