//! HFSurf: height fields to clamped cubic B-spline surfaces and display meshes.
//!
//! The engine never talks to a host directly. It returns plain data and
//! drives host capabilities ([`GeometryKernel`], [`DisplayBackend`],
//! [`TransactionManager`]) that the caller injects.

pub mod api;
pub mod config;
pub mod pipeline;

pub use api::{generate_mesh_buffers, generate_patch_body_definition, generate_surface_descriptor};
pub use config::{EngineConfig, MeshConfig, SurfaceConfig};
pub use pipeline::{build_surface_body, mesh_toggle};

pub use hfs_core::{HfsError, Result, TransactionManager};
pub use hfs_geometry::{GeometryKernel, HeightField, HeightFunction, SamplingSpec, SurfaceDescriptor};
pub use hfs_mesh::{IndexBase, MeshBuffers, MeshOptions, NormalMode};
pub use hfs_render::{DisplayAction, DisplayBackend, Scene, ToggleController};
