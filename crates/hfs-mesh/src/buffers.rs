use hfs_core::error::{HfsError, Result};
use hfs_core::traits::Validate;
use hfs_math::aabb::Aabb3;
use hfs_math::{Point3, Vector3, UP};
use serde::{Deserialize, Serialize};

/// Numbering of the first vertex in emitted triangle indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBase {
    #[default]
    Zero,
    /// Hosts with 1-based index sets.
    One,
}

impl IndexBase {
    pub fn offset(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// How per-triangle normals are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMode {
    /// Every triangle gets `(0, 0, 1)`.
    ///
    /// Known approximation: only correct for near-flat fields. Kept as the
    /// default so output matches hosts that shade with a constant normal.
    #[default]
    ConstantUp,
    /// Unit normal of each triangle's plane, oriented towards +z.
    FaceCross,
}

/// Flat-shaded triangle mesh ready for a display host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<Point3>,
    /// Vertex indices, already offset by `index_base`.
    pub triangles: Vec<[u32; 3]>,
    /// One normal per triangle.
    pub normals: Vec<Vector3>,
    pub index_base: IndexBase,
}

impl MeshBuffers {
    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `t`, resolving the index base.
    ///
    /// `None` if `t` or any of its indices falls outside the mesh.
    pub fn triangle_positions(&self, t: usize) -> Option<[Point3; 3]> {
        let base = self.index_base.offset();
        let [a, b, c] = *self.triangles.get(t)?;
        let corner = |i: u32| {
            i.checked_sub(base)
                .and_then(|k| self.positions.get(k as usize))
                .copied()
        };
        Some([corner(a)?, corner(b)?, corner(c)?])
    }

    /// Replace the per-triangle normals according to `mode`.
    ///
    /// Fails without touching the normals if any index is out of range.
    pub fn compute_face_normals(&mut self, mode: NormalMode) -> Result<()> {
        self.check_indices()?;
        self.normals = match mode {
            NormalMode::ConstantUp => vec![UP; self.triangles.len()],
            NormalMode::FaceCross => (0..self.triangles.len())
                .filter_map(|t| self.triangle_positions(t))
                .map(|[p0, p1, p2]| upward_normal(p0, p1, p2))
                .collect(),
        };
        Ok(())
    }

    /// Positions as `[x0, y0, z0, x1, ...]`.
    pub fn flat_positions(&self) -> Vec<f64> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Triangle indices as one flat list, three per triangle.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Normals as `[nx0, ny0, nz0, ...]`, one triple per triangle.
    pub fn flat_normals(&self) -> Vec<f64> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    /// Smallest and largest emitted index, or `None` for an empty mesh.
    pub fn index_range(&self) -> Option<(u32, u32)> {
        let mut iter = self.triangles.iter().flatten().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), i| (lo.min(i), hi.max(i))))
    }

    /// Compute the axis-aligned bounding box of all positions.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(self.positions.iter().copied())
            .unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }
}

impl MeshBuffers {
    fn check_indices(&self) -> Result<()> {
        let base = self.index_base.offset();
        let last = base + self.positions.len() as u32;
        if let Some((lo, hi)) = self.index_range() {
            if lo < base || hi >= last {
                return Err(HfsError::Validation(format!(
                    "indices span [{}, {}], allowed [{}, {})",
                    lo, hi, base, last
                )));
            }
        }
        Ok(())
    }
}

impl Validate for MeshBuffers {
    fn validate(&self) -> Result<()> {
        if self.normals.len() != self.triangles.len() {
            return Err(HfsError::Validation(format!(
                "{} normals for {} triangles",
                self.normals.len(),
                self.triangles.len()
            )));
        }
        self.check_indices()
    }
}

/// Unit normal of triangle `(p0, p1, p2)`, flipped to face +z.
///
/// Degenerate triangles fall back to `UP`.
fn upward_normal(p0: Point3, p1: Point3, p2: Point3) -> Vector3 {
    let n = (p1 - p0).cross(p2 - p0);
    let len = n.length();
    if len < 1e-15 {
        return UP;
    }
    let n = n / len;
    if n.z < 0.0 {
        -n
    } else {
        n
    }
}
