//! Numerical solvers
//!
//! This module provides traits and implementations for time integrators.
//! A solver applies a numerical method to the equations provided by a
//! transport model within a specific scenario.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The solver architecture separates concerns into three layers:
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Transport model (equations)
//!    - Forcing (source and predator densities)
//!    - Initial field
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Time step and step count
//!    - Finiteness checking
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - Applies the time-stepping scheme
//!    - Returns the trace
//!    - Independent of physics
//!
//! This separation allows:
//! - Same solver for different physics
//! - Different solvers for same scenario
//! - Easy benchmarking and method comparison
//!
//! # Quick Start Example
//!
//! ```rust
//! use edna_rs::grid::DepthGrid;
//! use edna_rs::forcing::{Forcing, ForcingPattern};
//! use edna_rs::models::TransportReaction;
//! use edna_rs::solver::{Scenario, SolverConfiguration, EulerSolver, Solver};
//!
//! # fn main() -> edna_rs::error::EdnaResult<()> {
//! let grid = DepthGrid::new(100.0, 2.0)?;
//! let model = TransportReaction::new(
//!     &grid,
//!     grid.uniform_profile(1e-4),
//!     grid.uniform_profile(0.0),
//!     grid.uniform_profile(1e-5),
//!     1e-4, 1e-6, 1.0, 0.1,
//! )?;
//!
//! let forcing = Forcing::source_only(ForcingPattern::constant(grid.cells(), 144, 1.0)?);
//! let scenario = Scenario::new(Box::new(model), forcing);
//!
//! let config = SolverConfiguration::new(600.0, 144);
//! let trace = EulerSolver::new().solve(&scenario, &config)?;
//!
//! assert_eq!(trace.len(), 144);
//! # Ok(())
//! # }
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================
mod methods;
mod scenario;
mod trace;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work off to Rayon is a numerical-execution concern,
// not a physics concern. It therefore lives here (solver) rather than in
// physics/field.rs.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (useful in benchmarks and tests) without requiring a mutex on every
// `apply()` call. Relaxed ordering is sufficient: the value is a
// performance hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of elements above which
/// [`ConcentrationField::apply()`](crate::physics::ConcentrationField::apply)
/// switches to parallel iteration.
///
/// The crossover is set at 1 000 elements. Below that point the overhead of
/// Rayon's thread-pool dispatch outweighs the per-element work of the
/// arithmetic closures these simulations use.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// `ConcentrationField::apply()` uses sequential iteration when the field
/// contains fewer elements than this value, and switches to Rayon when it
/// contains more — but only when the crate is compiled with the `parallel`
/// feature.
///
/// # Example
///
/// ```rust
/// use edna_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`. A zero-element threshold would force
/// parallel dispatch on every single-element `apply()`, which is never
/// the intended behaviour.
///
/// # Example
///
/// ```rust
/// use edna_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds. Prevents one test from leaking a modified
/// threshold value into the next.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring to any value (including
        // the original default) never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use methods::{EulerSolver, Rk4Solver};
pub use scenario::Scenario;
pub use trace::SimulationTrace;
pub use traits::{IntegrationMethod, Solver, SolverConfiguration};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::{EdnaError, EdnaResult};
use crate::physics::ConcentrationField;

/// Validate a concentration field for numerical issues
///
/// Checks that the field does not contain NaN or Inf values, which would
/// indicate numerical instability or errors in the physics computation.
///
/// # Arguments
///
/// * `field` - Field to validate
/// * `step` - Completed time step (for error reporting)
pub(crate) fn validate_finite(field: &ConcentrationField, step: usize) -> EdnaResult<()> {
    // NaN can arise from 0/0, Inf - Inf, or other undefined operations
    if let Some(index) = field.as_vector().iter().position(|x| x.is_nan()) {
        let nz = field.points();
        let (fraction, cell) = if index < nz {
            ("large fraction", index)
        } else {
            ("small fraction", index - nz)
        };
        return Err(EdnaError::NonFinite {
            step,
            detail: format!("NaN in the {} at depth cell {}", fraction, cell),
        });
    }

    // Inf indicates overflow, typically a violated stability condition
    if let Some(index) = field.as_vector().iter().position(|x| x.is_infinite()) {
        let nz = field.points();
        let (fraction, cell) = if index < nz {
            ("large fraction", index)
        } else {
            ("small fraction", index - nz)
        };
        return Err(EdnaError::NonFinite {
            step,
            detail: format!("infinity in the {} at depth cell {}", fraction, cell),
        });
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
