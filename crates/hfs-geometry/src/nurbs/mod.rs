//! Knot vector construction for clamped B-splines.

pub mod knot;

pub use knot::{KnotVector, CUBIC};
