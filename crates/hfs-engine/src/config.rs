//! Engine configuration, loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration file.

use std::f64::consts::TAU;
use std::path::Path;

use hfs_core::error::Result;
use hfs_geometry::{HeightFunction, SamplingSpec};
use hfs_mesh::{IndexBase, MeshOptions, NormalMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub surface: SurfaceConfig,
    pub mesh: MeshConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Spline surface request: `nu x nv` control points over `lx x ly`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub nu: usize,
    pub nv: usize,
    pub lx: f64,
    pub ly: f64,
    pub height: HeightFunction,
    /// Name of the host transaction wrapping body creation.
    pub transaction_name: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            nu: 100,
            nv: 100,
            lx: 10.0,
            ly: 10.0,
            height: HeightFunction::surface_default(),
            transaction_name: "Create B-Spline Surface".to_string(),
        }
    }
}

impl SurfaceConfig {
    pub fn sampling_spec(&self) -> Result<SamplingSpec> {
        SamplingSpec::new(self.nu, self.nv, self.lx, self.ly)
    }
}

/// Display mesh request: a square `resolution x resolution` vertex grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub resolution: usize,
    pub lx: f64,
    pub ly: f64,
    pub height: HeightFunction,
    pub index_base: IndexBase,
    pub normals: NormalMode,
    /// Name under which the display host stores the mesh.
    pub name: String,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            resolution: 512,
            lx: 10.0,
            ly: 10.0,
            height: HeightFunction::RadialSine {
                amplitude: 0.3,
                frequency: TAU,
            },
            index_base: IndexBase::One,
            normals: NormalMode::ConstantUp,
            name: "height-field".to_string(),
        }
    }
}

impl MeshConfig {
    pub fn sampling_spec(&self) -> Result<SamplingSpec> {
        SamplingSpec::for_mesh(self.resolution, self.resolution, self.lx, self.ly)
    }

    pub fn options(&self) -> MeshOptions {
        MeshOptions {
            index_base: self.index_base,
            normals: self.normals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfs_core::HfsError;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.surface.nu, 100);
        assert_eq!(config.mesh.resolution, 512);
        assert_eq!(config.mesh.index_base, IndexBase::One);
        assert_eq!(config.mesh.height, HeightFunction::mesh_default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "surface": { "nu": 8, "height": { "kind": "flat" } },
            "mesh": { "resolution": 16, "index_base": "zero", "normals": "face_cross" }
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.surface.nu, 8);
        assert_eq!(config.surface.nv, 100);
        assert_eq!(config.surface.height, HeightFunction::Flat);
        assert_eq!(config.mesh.options().index_base, IndexBase::Zero);
        assert_eq!(config.mesh.options().normals, NormalMode::FaceCross);
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ surface: 3 ").unwrap_err();
        assert!(matches!(err, HfsError::Config(_)));
    }

    #[test]
    fn test_invalid_values_fail_at_sampling() {
        let json = r#"{ "surface": { "nu": 1 }, "mesh": { "lx": -1.0 } }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert!(matches!(config.surface.sampling_spec(), Err(HfsError::Validation(_))));
        assert!(matches!(config.mesh.sampling_spec(), Err(HfsError::Validation(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(EngineConfig::from_json_str(&text).unwrap(), config);
    }
}
