//! Pure entry points: sampling spec and height field in, plain data out.

use hfs_core::error::Result;
use hfs_geometry::{
    extract_boundaries, sample_grid, HeightField, PatchBodyDefinition, SamplingSpec,
    SurfaceDescriptor,
};
use hfs_mesh::{tessellate_height_field, IndexBase, MeshBuffers, MeshOptions};
use log::debug;

/// Sample `field` and package the result as a clamped cubic B-spline surface.
pub fn generate_surface_descriptor(
    spec: &SamplingSpec,
    field: &impl HeightField,
) -> Result<SurfaceDescriptor> {
    let grid = sample_grid(spec, field)?;
    let descriptor = SurfaceDescriptor::from_grid(grid)?;
    debug!(
        "surface descriptor: {}x{} control points, {}+{} knots",
        spec.nu(),
        spec.nv(),
        descriptor.knots_u().len(),
        descriptor.knots_v().len()
    );
    Ok(descriptor)
}

/// Tessellate `field` with constant-up normals and the given index base.
pub fn generate_mesh_buffers(
    spec: &SamplingSpec,
    field: &impl HeightField,
    index_base: IndexBase,
) -> Result<MeshBuffers> {
    tessellate_height_field(spec, field, &MeshOptions::with_index_base(index_base))
}

/// Surface descriptor plus the four boundary curves, ready for a geometry kernel.
pub fn generate_patch_body_definition(
    spec: &SamplingSpec,
    field: &impl HeightField,
) -> Result<PatchBodyDefinition> {
    let grid = sample_grid(spec, field)?;
    let boundary = extract_boundaries(&grid)?;
    let descriptor = SurfaceDescriptor::from_grid(grid)?;
    PatchBodyDefinition::new(descriptor, boundary)
}
