//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - `IntegrationMethod` is the central enum naming the time-stepping scheme
//! - `SolverConfiguration` holds the numerical parameters (HOW to solve)
//! - `Solver` is the stable interface every scheme implements
//!
//! # Stability Guarantee
//!
//! - `Solver` trait: STABLE since v0.1.0, will NEVER change
//! - `IntegrationMethod` enum: EXTENSIBLE (new variants can be added)

use crate::error::{EdnaError, EdnaResult};
use crate::solver::methods::{EulerSolver, Rk4Solver};
use crate::solver::{Scenario, SimulationTrace};
use std::str::FromStr;

// =================================================================================================
// Integration Method
// =================================================================================================

/// Time-stepping scheme selector
///
/// Parses from the strings `"euler"` and `"rk4"` (case-insensitive), the
/// form configuration files use.
///
/// # Example
///
/// ```rust
/// use edna_rs::solver::IntegrationMethod;
///
/// let method: IntegrationMethod = "rk4".parse().unwrap();
/// assert_eq!(method, IntegrationMethod::Rk4);
/// assert!("leapfrog".parse::<IntegrationMethod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    /// Forward Euler, first-order
    Euler,
    /// Classical Runge-Kutta, fourth-order
    Rk4,
}

impl IntegrationMethod {
    /// Instantiate the solver implementing this method
    pub fn solver(&self) -> Box<dyn Solver> {
        match self {
            IntegrationMethod::Euler => Box::new(EulerSolver::new()),
            IntegrationMethod::Rk4 => Box::new(Rk4Solver::new()),
        }
    }
}

impl FromStr for IntegrationMethod {
    type Err = EdnaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(IntegrationMethod::Euler),
            "rk4" => Ok(IntegrationMethod::Rk4),
            other => Err(EdnaError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationMethod::Euler => write!(f, "euler"),
            IntegrationMethod::Rk4 => write!(f, "rk4"),
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Numerical parameters for a time-evolution run
///
/// # Examples
///
/// ```rust
/// use edna_rs::solver::SolverConfiguration;
///
/// // 10 s steps for one simulated day
/// let config = SolverConfiguration::new(10.0, 8640);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_time(), 86400.0);
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfiguration {
    /// Time step \[s\]
    pub dt: f64,

    /// Number of integration steps
    pub total_steps: usize,

    /// Abort on NaN/Inf after each step
    ///
    /// On by default; disable for bit-faithful comparison runs.
    pub check_finite: bool,
}

impl SolverConfiguration {
    /// Create a configuration with the finiteness check enabled
    pub fn new(dt: f64, total_steps: usize) -> Self {
        Self {
            dt,
            total_steps,
            check_finite: true,
        }
    }

    /// Configuration covering a whole number of simulated days
    ///
    /// Computes the step count from `dt`, rounding down when `dt` does not
    /// divide the day evenly. The standard bootstrap for day-long runs.
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] when `dt` is invalid, longer
    /// than a day, or `days` is zero.
    pub fn for_days(dt: f64, days: usize) -> EdnaResult<Self> {
        const SECONDS_PER_DAY: f64 = 86_400.0;

        if days == 0 {
            return Err(EdnaError::config("run must cover at least one day"));
        }
        if !(dt > 0.0 && dt.is_finite() && dt <= SECONDS_PER_DAY) {
            return Err(EdnaError::config(format!(
                "time step must be in (0, 86400] s, got {}",
                dt
            )));
        }

        let steps_per_day = (SECONDS_PER_DAY / dt) as usize;
        Ok(Self::new(dt, days * steps_per_day))
    }

    /// Disable the post-step finiteness check
    pub fn without_finite_check(mut self) -> Self {
        self.check_finite = false;
        self
    }

    /// Total simulated time \[s\]
    pub fn total_time(&self) -> f64 {
        self.dt * self.total_steps as f64
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] on a non-positive or non-finite
    /// time step, or zero steps.
    pub fn validate(&self) -> EdnaResult<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(EdnaError::config(format!(
                "time step must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.total_steps == 0 {
            return Err(EdnaError::config("total steps must be greater than 0"));
        }
        Ok(())
    }
}

// =================================================================================================
// Solver Trait
// =================================================================================================

/// Interface for time integrators
///
/// # Responsibility
/// Applies a numerical scheme to the scenario's model over the configured
/// number of steps. Independent of the physics.
///
/// # Mandatory Point
/// All new integration schemes MUST implement this trait.
pub trait Solver: Send + Sync {
    /// Run the time integration
    ///
    /// # Errors
    ///
    /// Propagates configuration/scenario validation failures, and
    /// [`EdnaError::NonFinite`](crate::error::EdnaError::NonFinite) when
    /// the finiteness check trips mid-run.
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration)
        -> EdnaResult<SimulationTrace>;

    /// Name of the scheme (used for display and logging)
    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parses_known_names() {
        assert_eq!(
            "euler".parse::<IntegrationMethod>().unwrap(),
            IntegrationMethod::Euler
        );
        assert_eq!(
            "RK4".parse::<IntegrationMethod>().unwrap(),
            IntegrationMethod::Rk4
        );
    }

    #[test]
    fn test_method_rejects_unknown_name() {
        let err = "leapfrog".parse::<IntegrationMethod>().unwrap_err();
        assert!(matches!(err, EdnaError::UnsupportedMethod(_)));
        assert!(err.to_string().contains("leapfrog"));
    }

    #[test]
    fn test_method_builds_matching_solver() {
        assert_eq!(IntegrationMethod::Euler.solver().name(), "Forward Euler");
        assert_eq!(IntegrationMethod::Rk4.solver().name(), "Runge-Kutta 4");
    }

    #[test]
    fn test_configuration_validation() {
        assert!(SolverConfiguration::new(10.0, 8640).validate().is_ok());
        assert!(SolverConfiguration::new(0.0, 100).validate().is_err());
        assert!(SolverConfiguration::new(-1.0, 100).validate().is_err());
        assert!(SolverConfiguration::new(f64::NAN, 100).validate().is_err());
        assert!(SolverConfiguration::new(10.0, 0).validate().is_err());
    }

    #[test]
    fn test_for_days_bootstrap() {
        let config = SolverConfiguration::for_days(600.0, 3).unwrap();
        assert_eq!(config.total_steps, 3 * 144);
        assert!((config.total_time() - 3.0 * 86400.0).abs() < 1e-9);

        assert!(SolverConfiguration::for_days(600.0, 0).is_err());
        assert!(SolverConfiguration::for_days(-1.0, 1).is_err());
        assert!(SolverConfiguration::for_days(1e6, 1).is_err());
    }

    #[test]
    fn test_total_time() {
        let config = SolverConfiguration::new(600.0, 144);
        assert!((config.total_time() - 86400.0).abs() < 1e-9);
    }
}
