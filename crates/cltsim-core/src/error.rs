//! Error taxonomy for the resampling engine.
//!
//! Every variant is a usage or configuration error, not a transient runtime
//! condition — there is no I/O in this crate. Errors surface immediately at
//! the call site and are never retried or silently defaulted.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Bad distribution parameters, caught at spec construction time.
    #[error("invalid parameter for {family}: {reason}")]
    InvalidParameter {
        family: &'static str,
        reason: String,
    },

    /// Sample size must be at least 1.
    #[error("invalid sample size {0}: must be at least 1")]
    InvalidSampleSize(usize),

    /// Resample attempted against a zero-length pool.
    #[error("cannot resample from an empty pool")]
    EmptyPool,

    /// Resample operation attempted while the session is idle (no pool drawn).
    #[error("no sample pool drawn yet: call draw_sample first")]
    NoPool,
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Shorthand for parameter validation failures.
    pub(crate) fn param(family: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            family,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_family_and_reason() {
        let err = SimError::param("normal", "std_dev must be positive (got -1)");
        let msg = err.to_string();
        assert!(msg.contains("normal"));
        assert!(msg.contains("std_dev"));
    }

    #[test]
    fn display_sample_size() {
        assert_eq!(
            SimError::InvalidSampleSize(0).to_string(),
            "invalid sample size 0: must be at least 1"
        );
    }
}
