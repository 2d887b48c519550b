//! Unified error type for simulation setup and execution
//!
//! # Design
//!
//! Every failure in this crate is local and fatal to the run: there is no
//! retry layer and no partial-result salvage. Errors therefore split into
//! two families only:
//!
//! - **Setup errors** (`UnsupportedMethod`, `DimensionMismatch`,
//!   `Configuration`): raised before the time loop starts, by configuration
//!   parsing and scenario validation.
//! - **Runtime errors** (`NonFinite`, `Io`): raised during or after the
//!   loop; `NonFinite` aborts the run at the offending step.

use thiserror::Error;

/// Result alias used throughout the crate
pub type EdnaResult<T> = Result<T, EdnaError>;

/// Errors produced by simulation setup and execution
#[derive(Debug, Error)]
pub enum EdnaError {
    /// Invalid integration-mode selector
    ///
    /// Raised at configuration time, before the loop starts.
    #[error("unsupported integration method '{0}' (expected \"euler\" or \"rk4\")")]
    UnsupportedMethod(String),

    /// A profile, forcing frame, or state vector has the wrong length
    ///
    /// Raised by scenario validation; the full run aborts with no partial
    /// recovery.
    #[error("{name} has {actual} cells, expected {expected}")]
    DimensionMismatch {
        /// What was being validated (e.g. "diffusivity profile")
        name: String,
        /// Expected number of cells
        expected: usize,
        /// Actual number of cells
        actual: usize,
    },

    /// Degenerate or inconsistent setup parameters
    ///
    /// Covers zero-length digestion windows, release durations exceeding
    /// the ledger, non-positive time steps, and similar. The source model
    /// silently truncated some of these; here they fail loudly at setup.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// NaN or infinity detected in the concentration field after a step
    #[error(
        "non-finite value detected at step {step}: {detail}. \
         This indicates numerical instability; try reducing the time step."
    )]
    NonFinite {
        /// Step index (1-based, counting completed updates)
        step: usize,
        /// Which check fired
        detail: String,
    },

    /// Export I/O failure
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl EdnaError {
    /// Convenience constructor for configuration errors
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Convenience constructor for dimension mismatches
    pub fn dimension(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_method_message() {
        let err = EdnaError::UnsupportedMethod("leapfrog".to_string());
        assert!(err.to_string().contains("leapfrog"));
        assert!(err.to_string().contains("euler"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = EdnaError::dimension("diffusivity profile", 100, 50);
        let msg = err.to_string();
        assert!(msg.contains("diffusivity profile"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn test_config_helper() {
        let err = EdnaError::config("digestion window must span at least one step");
        assert!(matches!(err, EdnaError::Configuration(_)));
    }
}
