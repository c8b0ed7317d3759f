//! Height functions `z = f(x, y)` sampled over the rectangular domain.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// A scalar field over the `(x, y)` plane.
///
/// Implemented for every `Fn(f64, f64) -> f64`, so closures can be passed
/// wherever a height field is expected.
pub trait HeightField {
    fn height(&self, x: f64, y: f64) -> f64;
}

impl<F> HeightField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn height(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Configuration-selectable height functions.
///
/// The radial variants depend only on `r = sqrt(x^2 + y^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightFunction {
    /// `z = 0`
    Flat,
    /// `z = amplitude * cos(frequency * r)`
    RadialCosine { amplitude: f64, frequency: f64 },
    /// `z = amplitude * sin(frequency * r)`
    RadialSine { amplitude: f64, frequency: f64 },
}

impl HeightFunction {
    /// `0.3 * cos(2r)`, the default for spline surfaces.
    pub fn surface_default() -> Self {
        Self::RadialCosine {
            amplitude: 0.3,
            frequency: 2.0,
        }
    }

    /// `0.3 * sin(2 pi r)`, the default for display meshes.
    pub fn mesh_default() -> Self {
        Self::RadialSine {
            amplitude: 0.3,
            frequency: TAU,
        }
    }
}

impl HeightField for HeightFunction {
    fn height(&self, x: f64, y: f64) -> f64 {
        let r = x.hypot(y);
        match *self {
            Self::Flat => 0.0,
            Self::RadialCosine {
                amplitude,
                frequency,
            } => amplitude * (frequency * r).cos(),
            Self::RadialSine {
                amplitude,
                frequency,
            } => amplitude * (frequency * r).sin(),
        }
    }
}
