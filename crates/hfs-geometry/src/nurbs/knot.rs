//! Clamped uniform knot vectors.

use hfs_core::error::{HfsError, Result};
use hfs_core::traits::Validate;
use hfs_core::Tolerance;
use serde::{Deserialize, Serialize};

/// Degree of every spline this crate assembles.
pub const CUBIC: usize = 3;

/// A non-decreasing knot sequence for a B-spline of `degree` over `n` control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotVector {
    degree: usize,
    knots: Vec<f64>,
}

impl KnotVector {
    /// Build a clamped, uniform knot vector on `[0, 1]`.
    ///
    /// The first and last `degree + 1` knots are clamped to 0.0 and 1.0; knot
    /// `i` for `degree < i < n` is `(i - degree) / (n - degree)`. The result
    /// has `n + degree + 1` entries. `n == degree + 1` yields no interior knots
    /// (a single Bezier segment).
    pub fn clamped_uniform(n: usize, degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(HfsError::Validation("knot vector degree must be at least 1".into()));
        }
        if n < degree + 1 {
            return Err(HfsError::Validation(format!(
                "degree {} needs at least {} control points, got {}",
                degree,
                degree + 1,
                n
            )));
        }

        let spans = (n - degree) as f64;
        let mut knots = vec![0.0; n + degree + 1];
        for (i, knot) in knots.iter_mut().enumerate().take(n).skip(degree + 1) {
            *knot = (i - degree) as f64 / spans;
        }
        for knot in &mut knots[n..] {
            *knot = 1.0;
        }

        Ok(Self { degree, knots })
    }

    /// Clamped uniform knots for a cubic curve over `n` control points (length `n + 4`).
    pub fn cubic(n: usize) -> Result<Self> {
        Self::clamped_uniform(n, CUBIC)
    }

    /// Wrap raw knots; call [`Validate::validate`] before trusting them.
    pub fn from_raw(degree: usize, knots: Vec<f64>) -> Self {
        Self { degree, knots }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Number of control points this knot vector is sized for.
    pub fn control_point_count(&self) -> usize {
        self.knots.len().saturating_sub(self.degree + 1)
    }

    /// Knots strictly between the clamped ends.
    pub fn interior(&self) -> &[f64] {
        let p = self.degree;
        if self.knots.len() < 2 * (p + 1) {
            return &[];
        }
        &self.knots[p + 1..self.knots.len() - p - 1]
    }

    /// Parameter domain `(t_min, t_max)`.
    pub fn domain(&self) -> (f64, f64) {
        let p = self.degree;
        (self.knots[p], self.knots[self.knots.len() - p - 1])
    }

    /// The knot vector of the same curve traversed backwards: `t -> 1 - t`.
    pub fn reversed(&self) -> Self {
        let (lo, hi) = (self.knots[0], self.knots[self.knots.len() - 1]);
        Self {
            degree: self.degree,
            knots: self.knots.iter().rev().map(|&t| lo + hi - t).collect(),
        }
    }

    /// Whether reversing the parametrization leaves the knots unchanged.
    ///
    /// Clamped uniform knots are symmetric, so a reversed boundary curve can
    /// reuse them as they are.
    pub fn is_symmetric(&self, tol: Tolerance) -> bool {
        self.knots
            .iter()
            .zip(self.reversed().knots.iter())
            .all(|(&a, &b)| approx::abs_diff_eq!(a, b, epsilon = tol.parametric))
    }

    /// Check that this vector matches `n` control points of its degree.
    pub fn check_len(&self, n: usize, direction: &str) -> Result<()> {
        let expected = n + self.degree + 1;
        if self.knots.len() != expected {
            return Err(HfsError::Validation(format!(
                "{} knot vector has {} entries, expected {} ({} control points + degree {} + 1)",
                direction,
                self.knots.len(),
                expected,
                n,
                self.degree
            )));
        }
        Ok(())
    }
}

impl Validate for KnotVector {
    fn validate(&self) -> Result<()> {
        let p = self.degree;
        if self.knots.len() < 2 * (p + 1) {
            return Err(HfsError::Validation(format!(
                "degree {} knot vector needs at least {} entries, got {}",
                p,
                2 * (p + 1),
                self.knots.len()
            )));
        }
        if self.knots.iter().any(|t| !t.is_finite()) {
            return Err(HfsError::Validation("knot vector contains non-finite values".into()));
        }
        if self.knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(HfsError::Validation("knot vector is not non-decreasing".into()));
        }

        let (lo, hi) = (self.knots[0], self.knots[self.knots.len() - 1]);
        let clamped_lo = self.knots[..=p].iter().all(|&t| t == lo);
        let clamped_hi = self.knots[self.knots.len() - p - 1..].iter().all(|&t| t == hi);
        if !clamped_lo || !clamped_hi {
            return Err(HfsError::Validation(format!(
                "knot vector is not clamped: first and last {} knots must repeat",
                p + 1
            )));
        }

        let interior = self.interior();
        if interior.windows(2).any(|w| w[1] <= w[0])
            || interior.iter().any(|&t| t <= lo || t >= hi)
        {
            return Err(HfsError::Validation(
                "interior knots must be strictly increasing inside the domain".into(),
            ));
        }
        Ok(())
    }
}
