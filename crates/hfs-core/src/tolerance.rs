/// Comparison tolerances for sampled geometry and knot parameters.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distance tolerance for point comparisons (in model units)
    pub linear: f64,
    /// Tolerance for knot values in the normalized `[0, 1]` parameter range
    pub parametric: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-9;
    pub const DEFAULT_PARAMETRIC: f64 = 1e-12;

    pub fn new(linear: f64, parametric: f64) -> Self {
        Self { linear, parametric }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            parametric: Self::DEFAULT_PARAMETRIC,
        }
    }

    /// Looser tolerances for knots that went through `f32` at some point.
    pub fn single_precision() -> Self {
        Self {
            linear: 1e-5,
            parametric: 1e-6,
        }
    }

    /// Check if two coordinates are equal within linear tolerance
    pub fn linear_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.linear
    }

    /// Check if two 3-D points given as `[x, y, z]` coincide within linear tolerance
    pub fn points_eq(self, a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(&p, &q)| self.linear_eq(p, q))
    }

    /// Check if two knot values are equal within parametric tolerance
    pub fn knot_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.parametric
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
