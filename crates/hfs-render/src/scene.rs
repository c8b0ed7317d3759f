use hfs_core::error::{HfsError, Result};
use hfs_core::traits::Validate;
use hfs_math::Aabb3;
use hfs_mesh::MeshBuffers;
use log::debug;
use slotmap::{new_key_type, SlotMap};

use crate::display::DisplayBackend;

new_key_type! {
    /// Opaque handle to a mesh held by a [`Scene`].
    pub struct MeshHandle;
}

/// A named mesh in the scene
#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub name: String,
    pub mesh: MeshBuffers,
    pub color: [f32; 3],
}

/// In-memory display backend.
///
/// Holds materialized meshes keyed by [`MeshHandle`]. Headless hosts use it
/// directly; tests use its counters to check that nothing leaks.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: SlotMap<MeshHandle, SceneMesh>,
    materialized: usize,
    released: usize,
    refreshes: usize,
}

impl Scene {
    const PALETTE: [[f32; 3]; 6] = [
        [0.78, 0.63, 0.35], // Brass
        [0.7, 0.8, 0.9],    // Light blue
        [0.9, 0.7, 0.7],    // Light red
        [0.7, 0.9, 0.7],    // Light green
        [0.8, 0.8, 0.8],    // Gray
        [0.8, 0.7, 0.9],    // Purple
    ];

    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh with a name and color
    pub fn add_mesh(&mut self, name: &str, mesh: MeshBuffers, color: [f32; 3]) -> MeshHandle {
        self.materialized += 1;
        self.meshes.insert(SceneMesh {
            name: name.to_string(),
            mesh,
            color,
        })
    }

    /// Add a mesh with a palette color picked by insertion count
    pub fn add_mesh_auto_color(&mut self, name: &str, mesh: MeshBuffers) -> MeshHandle {
        let color = Self::PALETTE[self.materialized % Self::PALETTE.len()];
        self.add_mesh(name, mesh, color)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&SceneMesh> {
        self.meshes.get(handle)
    }

    /// Meshes currently held.
    pub fn live_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total meshes ever materialized.
    pub fn materialized_count(&self) -> usize {
        self.materialized
    }

    /// Total meshes released.
    pub fn released_count(&self) -> usize {
        self.released
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Compute scene bounding box
    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(
            self.meshes
                .values()
                .flat_map(|m| m.mesh.positions.iter().copied()),
        )
    }

    /// Total triangle count across all meshes
    pub fn total_triangles(&self) -> usize {
        self.meshes.values().map(|m| m.mesh.triangle_count()).sum()
    }
}

impl DisplayBackend for Scene {
    type Handle = MeshHandle;

    fn materialize(&mut self, name: &str, mesh: &MeshBuffers) -> Result<MeshHandle> {
        mesh.validate()
            .map_err(|e| HfsError::Collaborator(format!("scene rejected mesh '{}': {}", name, e)))?;
        let handle = self.add_mesh_auto_color(name, mesh.clone());
        debug!(
            "scene: materialized '{}' as {:?} ({} triangles)",
            name,
            handle,
            mesh.triangle_count()
        );
        Ok(handle)
    }

    fn release(&mut self, handle: MeshHandle) -> Result<()> {
        match self.meshes.remove(handle) {
            Some(mesh) => {
                self.released += 1;
                debug!("scene: released '{}' ({:?})", mesh.name, handle);
                Ok(())
            }
            None => Err(HfsError::InvalidOperation(format!(
                "release of unknown or already released handle {:?}",
                handle
            ))),
        }
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfs_geometry::{HeightFunction, SamplingSpec};
    use hfs_mesh::{tessellate_height_field, MeshOptions};

    fn mesh(n: usize) -> MeshBuffers {
        let spec = SamplingSpec::for_mesh(n, n, 10.0, 10.0).unwrap();
        tessellate_height_field(&spec, &HeightFunction::mesh_default(), &MeshOptions::default())
            .unwrap()
    }

    #[test]
    fn test_materialize_and_release() {
        let mut scene = Scene::new();
        let h = scene.materialize("grid", &mesh(4)).unwrap();
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.total_triangles(), 18);
        assert_eq!(scene.get(h).unwrap().name, "grid");

        scene.release(h).unwrap();
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.released_count(), 1);
        assert!(scene.get(h).is_none());
    }

    #[test]
    fn test_double_release_rejected() {
        let mut scene = Scene::new();
        let h = scene.materialize("grid", &mesh(3)).unwrap();
        scene.release(h).unwrap();
        assert!(matches!(scene.release(h), Err(HfsError::InvalidOperation(_))));
    }

    #[test]
    fn test_rejects_invalid_mesh() {
        let mut scene = Scene::new();
        let mut bad = mesh(3);
        bad.normals.pop();
        assert!(matches!(
            scene.materialize("bad", &bad),
            Err(HfsError::Collaborator(_))
        ));
        assert_eq!(scene.live_count(), 0);
    }

    #[test]
    fn test_bounds() {
        let mut scene = Scene::new();
        assert!(scene.bounds().is_none());
        scene.materialize("grid", &mesh(5)).unwrap();
        let bb = scene.bounds().unwrap();
        assert_eq!(bb.min.x, 0.0);
        assert_eq!(bb.max.x, 10.0);
    }

    #[test]
    fn test_auto_color_cycles() {
        let mut scene = Scene::new();
        let a = scene.add_mesh_auto_color("a", mesh(2));
        let b = scene.add_mesh_auto_color("b", mesh(2));
        assert_ne!(scene.get(a).unwrap().color, scene.get(b).unwrap().color);
    }
}
