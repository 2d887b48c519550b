//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! The Forward Euler method is the simplest explicit time-stepping scheme
//! for solving ordinary differential equations (ODEs):
//!
//! ```text
//! dy/dt = f(y, t)
//! ```
//!
//! The scheme approximates the solution at time t_{n+1} = t_n + dt using:
//!
//! ```text
//! y_{n+1} = y_n + dt * f(y_n, t_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (error ~ O(dt))
//! - **Stability**: Conditionally stable (requires small time steps)
//! - **Complexity**: 1 model evaluation per step
//!
//! # When to Use
//!
//! - Quick exploratory simulations
//! - Reproducing legacy first-order results exactly
//! - Non-stiff problems with relaxed accuracy requirements
//!
//! For production runs prefer [`Rk4Solver`](crate::solver::Rk4Solver).

use crate::error::EdnaResult;
use crate::solver::{
    validate_finite, Scenario, SimulationTrace, Solver, SolverConfiguration,
};
use log::{debug, info};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// # Algorithm
///
/// For each step n = 0, 1, ..., N-1:
///
/// 1. Resolve the forcing for step n (held fixed for the whole step)
/// 2. Evaluate the model: `(k, ledger') = f(y_n, forcing, ledger)`
/// 3. Update: `y_{n+1} = y_n + dt · k`, commit `ledger'`
/// 4. Store `y_{n+1}` in the trace and validate it
///
/// The trace stores one field per completed step; the initial field is not
/// included.
///
/// # Stability
///
/// The method is **conditionally stable**: the diffusive CFL condition
/// `κ·dt/dz² ≤ 1/2` and its advective counterpart must hold, otherwise the
/// post-step finiteness check aborts the run once the field blows up.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use edna_rs::solver::{EulerSolver, Solver};
    ///
    /// let solver = EulerSolver::new();
    /// assert_eq!(solver.name(), "Forward Euler");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> EdnaResult<SimulationTrace> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let dt = config.dt;
        let total_steps = config.total_steps;

        info!(
            "Forward Euler: {} ({} steps, dt = {} s)",
            scenario.model_name(),
            total_steps,
            dt
        );

        // ====== Step 2: Setup ======

        let mut field = scenario.initial_field();
        let mut ledger = scenario.model.initial_ledger();

        let mut trace = SimulationTrace::with_capacity(dt, total_steps);

        // ====== Step 3: Time Integration ======

        for step in 0..total_steps {
            // Forcing resolved once per step and held fixed
            let forcing = scenario.forcing.at(step);

            // ====== Euler step ======

            // k = f(y_n); the ledger snapshot evolves with the evaluation
            let (rate, next_ledger) =
                scenario.model.derivative(&field, &forcing, ledger.take());

            // y_{n+1} = y_n + dt * k
            field = field + rate * dt;
            ledger = next_ledger;

            // ====== Validation ======

            if config.check_finite {
                validate_finite(&field, step + 1)?;
            }

            // ====== Storage ======

            trace.push(field.clone());

            if (step + 1) % 1000 == 0 {
                debug!("step {}/{} done", step + 1, total_steps);
            }
        }

        info!(
            "Forward Euler finished: {} steps, {} s simulated",
            total_steps,
            trace.times().last().copied().unwrap_or(0.0)
        );

        // ====== Step 4: Metadata ======

        trace.add_metadata("solver", "Forward Euler");
        trace.add_metadata("time steps", &total_steps.to_string());
        trace.add_metadata("dt", &dt.to_string());
        trace.add_metadata("total time", &config.total_time().to_string());

        Ok(trace)
    }

    fn name(&self) -> &str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digestion::StomachLedger;
    use crate::forcing::{Forcing, ForcingPattern, StepForcing};
    use crate::physics::{ConcentrationField, TransportModel};
    use nalgebra::DVector;

    // ====== Mock Models for Testing ======

    /// Mock model: exponential decay dy/dt = -k * y
    ///
    /// Analytical solution: y(t) = y_0 * exp(-k * t)
    struct ExponentialDecay {
        nz: usize,
        decay_rate: f64,
    }

    impl TransportModel for ExponentialDecay {
        fn points(&self) -> usize {
            self.nz
        }

        fn derivative(
            &self,
            field: &ConcentrationField,
            _forcing: &StepForcing<'_>,
            ledger: Option<StomachLedger>,
        ) -> (ConcentrationField, Option<StomachLedger>) {
            (field.clone() * (-self.decay_rate), ledger)
        }

        fn initial_field(&self) -> ConcentrationField {
            ConcentrationField::from_halves(
                &DVector::from_element(self.nz, 1.0),
                &DVector::from_element(self.nz, 1.0),
            )
        }

        fn name(&self) -> &str {
            "Exponential Decay"
        }
    }

    /// Mock model: constant growth dy/dt = c
    struct ConstantGrowth {
        nz: usize,
        growth_rate: f64,
    }

    impl TransportModel for ConstantGrowth {
        fn points(&self) -> usize {
            self.nz
        }

        fn derivative(
            &self,
            _field: &ConcentrationField,
            _forcing: &StepForcing<'_>,
            ledger: Option<StomachLedger>,
        ) -> (ConcentrationField, Option<StomachLedger>) {
            let mut rate = ConcentrationField::zeros(self.nz);
            let growth = self.growth_rate;
            rate.apply(move |_| growth);
            (rate, ledger)
        }

        fn name(&self) -> &str {
            "Constant Growth"
        }
    }

    fn scenario_for(model: Box<dyn TransportModel>) -> Scenario {
        let nz = model.points();
        Scenario::new(
            model,
            Forcing::source_only(ForcingPattern::zero(nz, 1).unwrap()),
        )
    }

    // ====== Solver Creation Tests ======

    #[test]
    fn test_euler_solver_creation() {
        assert_eq!(EulerSolver::new().name(), "Forward Euler");
        assert_eq!(EulerSolver::default().name(), "Forward Euler");
    }

    // ====== Configuration Tests ======

    #[test]
    fn test_euler_rejects_bad_configuration() {
        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(ConstantGrowth {
            nz: 5,
            growth_rate: 1.0,
        }));

        assert!(solver
            .solve(&scenario, &SolverConfiguration::new(0.0, 100))
            .is_err());
        assert!(solver
            .solve(&scenario, &SolverConfiguration::new(1.0, 0))
            .is_err());
    }

    // ====== Numerical Accuracy Tests ======

    #[test]
    fn test_euler_constant_growth_is_exact() {
        // dy/dt = c → y(t) = y_0 + c*t; Euler is exact here
        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(ConstantGrowth {
            nz: 5,
            growth_rate: 2.0,
        }));

        let config = SolverConfiguration::new(0.1, 100);
        let trace = solver.solve(&scenario, &config).unwrap();

        // y(10) = 0 + 2*10 = 20
        assert!((trace.final_field().as_vector()[0] - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_euler_exponential_decay_accuracy() {
        // dy/dt = -k*y → y(t) = exp(-k*t); Euler has O(dt) error
        let solver = EulerSolver::new();
        let decay_rate = 0.1;
        let scenario = scenario_for(Box::new(ExponentialDecay { nz: 5, decay_rate }));

        let config = SolverConfiguration::new(0.01, 1000);
        let trace = solver.solve(&scenario, &config).unwrap();

        let expected = (-decay_rate * 10.0).exp();
        let actual = trace.final_field().as_vector()[0];
        assert!((actual - expected).abs() < 0.01);
    }

    #[test]
    fn test_euler_first_order_convergence() {
        // Error should halve when dt halves
        let solver = EulerSolver::new();
        let decay_rate: f64 = 0.5;
        let total_time: f64 = 5.0;
        let exact = (-decay_rate * total_time).exp();

        let mut errors = Vec::new();
        for &steps in &[100usize, 200, 400, 800] {
            let scenario = scenario_for(Box::new(ExponentialDecay { nz: 3, decay_rate }));
            let config = SolverConfiguration::new(total_time / steps as f64, steps);
            let trace = solver.solve(&scenario, &config).unwrap();
            errors.push((trace.final_field().as_vector()[0] - exact).abs());
        }

        for i in 0..errors.len() - 1 {
            let ratio = errors[i] / errors[i + 1];
            assert!(
                ratio > 1.8 && ratio < 2.2,
                "convergence ratio {} not first-order at refinement {}",
                ratio,
                i
            );
        }
    }

    // ====== Trajectory tests ======

    #[test]
    fn test_euler_trace_excludes_initial_state() {
        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(ConstantGrowth {
            nz: 5,
            growth_rate: 1.0,
        }));

        let config = SolverConfiguration::new(0.1, 100);
        let trace = solver.solve(&scenario, &config).unwrap();

        // One row per step; first row is AFTER the first update
        assert_eq!(trace.len(), 100);
        assert!((trace.at(0).as_vector()[0] - 0.1).abs() < 1e-12);
        assert!((trace.times()[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_euler_final_time_precision() {
        // Direct (step+1)*dt calculation keeps the final time exact even
        // for a dt that is not representable in binary
        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(ConstantGrowth {
            nz: 3,
            growth_rate: 1.0,
        }));

        let config = SolverConfiguration::new(0.1, 100);
        let trace = solver.solve(&scenario, &config).unwrap();

        let final_time = *trace.times().last().unwrap();
        assert!((final_time - 10.0).abs() < 1e-14);
    }

    // ====== Metadata Tests ======

    #[test]
    fn test_euler_metadata() {
        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(ConstantGrowth {
            nz: 5,
            growth_rate: 1.0,
        }));

        let config = SolverConfiguration::new(0.2, 500);
        let trace = solver.solve(&scenario, &config).unwrap();

        assert_eq!(trace.get_metadata("solver"), Some("Forward Euler"));
        assert_eq!(trace.get_metadata("time steps"), Some("500"));
        let dt: f64 = trace.get_metadata("dt").unwrap().parse().unwrap();
        assert!((dt - 0.2).abs() < 1e-10);
    }

    // ====== Validation Tests ======

    #[test]
    fn test_euler_detects_nan() {
        struct NanModel;
        impl TransportModel for NanModel {
            fn points(&self) -> usize {
                5
            }
            fn derivative(
                &self,
                _field: &ConcentrationField,
                _forcing: &StepForcing<'_>,
                ledger: Option<StomachLedger>,
            ) -> (ConcentrationField, Option<StomachLedger>) {
                let mut rate = ConcentrationField::zeros(5);
                rate.apply(|_| f64::NAN);
                (rate, ledger)
            }
            fn name(&self) -> &str {
                "NaN Model"
            }
        }

        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(NanModel));
        let config = SolverConfiguration::new(1.0, 10);

        let result = solver.solve(&scenario, &config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("non-finite"));
    }

    #[test]
    fn test_euler_finite_check_can_be_disabled() {
        struct InfModel;
        impl TransportModel for InfModel {
            fn points(&self) -> usize {
                3
            }
            fn derivative(
                &self,
                _field: &ConcentrationField,
                _forcing: &StepForcing<'_>,
                ledger: Option<StomachLedger>,
            ) -> (ConcentrationField, Option<StomachLedger>) {
                let mut rate = ConcentrationField::zeros(3);
                rate.apply(|_| f64::INFINITY);
                (rate, ledger)
            }
            fn name(&self) -> &str {
                "Inf Model"
            }
        }

        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(InfModel));
        let config = SolverConfiguration::new(1.0, 5).without_finite_check();

        let trace = solver.solve(&scenario, &config).unwrap();
        assert!(trace.final_field().as_vector()[0].is_infinite());
    }

    // ====== Edge cases ======

    #[test]
    fn test_euler_single_step() {
        let solver = EulerSolver::new();
        let scenario = scenario_for(Box::new(ConstantGrowth {
            nz: 3,
            growth_rate: 5.0,
        }));

        let config = SolverConfiguration::new(1.0, 1);
        let trace = solver.solve(&scenario, &config).unwrap();

        assert_eq!(trace.len(), 1);
        assert!((trace.final_field().as_vector()[0] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_euler_is_deterministic() {
        let solver = EulerSolver::new();
        let config = SolverConfiguration::new(0.05, 200);

        let run = || {
            let scenario = scenario_for(Box::new(ExponentialDecay {
                nz: 4,
                decay_rate: 0.3,
            }));
            solver.solve(&scenario, &config).unwrap()
        };

        let a = run();
        let b = run();
        assert_eq!(a.final_field().as_vector(), b.final_field().as_vector());
    }
}
