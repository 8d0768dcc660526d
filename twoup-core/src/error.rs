//! Engine errors.

use thiserror::Error;

use crate::domain::ConfigError;

/// Errors raised while simulating.
///
/// Busting, capping out and finishing a box are domain outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Internal fault: a round needed more physical tosses than the ceiling
    /// allows. Points at a broken probability model, never at bad luck.
    #[error("round unresolved after {ceiling} tosses")]
    TossCeilingExceeded { ceiling: u32 },
}

impl SimError {
    /// True for faults that abort a single trial rather than the whole run.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, Self::TossCeilingExceeded { .. })
    }
}
