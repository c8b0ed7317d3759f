use crate::error::Result;

/// Validate structural integrity of an input or an assembled data structure.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
