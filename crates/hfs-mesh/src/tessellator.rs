//! Uniform grid tessellation of a height field.

use hfs_core::error::{HfsError, Result};
use hfs_geometry::{HeightField, SamplingSpec};
use hfs_math::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffers::{IndexBase, MeshBuffers, NormalMode};

/// Output options for [`tessellate_height_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    pub index_base: IndexBase,
    pub normals: NormalMode,
}

impl MeshOptions {
    pub fn with_index_base(index_base: IndexBase) -> Self {
        Self {
            index_base,
            ..Self::default()
        }
    }
}

/// Tessellate `field` over the lattice of `spec`.
///
/// Vertex `(r, c)` sits at `x = r * lx / (nu - 1)`, `y = c * ly / (nv - 1)`
/// and is numbered `r * nv + c`. Each cell splits along the diagonal from its
/// low corner to its high corner:
/// `{(r,c), (r,c+1), (r+1,c+1)}` and `{(r,c), (r+1,c+1), (r+1,c)}`.
/// That gives `(nu-1) * (nv-1) * 2` triangles.
///
/// A non-finite height fails the whole request with [`HfsError::Computation`].
pub fn tessellate_height_field(
    spec: &SamplingSpec,
    field: &impl HeightField,
    options: &MeshOptions,
) -> Result<MeshBuffers> {
    let (rows, cols) = (spec.nu(), spec.nv());

    let mut positions = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        let x = spec.x_at(r);
        for c in 0..cols {
            let y = spec.y_at(c);
            let z = field.height(x, y);
            if !z.is_finite() {
                return Err(HfsError::Computation(format!(
                    "height field returned {} at mesh vertex ({}, {}), x={}, y={}",
                    z, r, c, x, y
                )));
            }
            positions.push(DVec3::new(x, y, z));
        }
    }

    let base = options.index_base.offset();
    let idx = |r: usize, c: usize| -> u32 { (r * cols + c) as u32 + base };

    let mut triangles = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            triangles.push([idx(r, c), idx(r, c + 1), idx(r + 1, c + 1)]);
            triangles.push([idx(r, c), idx(r + 1, c + 1), idx(r + 1, c)]);
        }
    }

    let mut mesh = MeshBuffers {
        positions,
        triangles,
        normals: Vec::new(),
        index_base: options.index_base,
    };
    mesh.compute_face_normals(options.normals)?;

    debug!(
        "tessellated {}x{} height field: {} vertices, {} triangles",
        rows,
        cols,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
