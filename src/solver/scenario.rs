//! Simulation scenario definition
//!
//! A scenario combines a transport model with its forcing and (optionally)
//! a non-default initial field.

use crate::error::{EdnaError, EdnaResult};
use crate::forcing::Forcing;
use crate::physics::{ConcentrationField, TransportModel};

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Transport model (equations)
/// - Forcing (source and predator densities over time)
/// - Initial field (defaults to the model's)
///
/// # Design
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust,ignore
/// let scenario = Scenario::new(Box::new(model), forcing);
///
/// // Solve with different methods
/// let euler_trace = EulerSolver::new().solve(&scenario, &config)?;
/// let rk4_trace = Rk4Solver::new().solve(&scenario, &config)?;
/// ```
pub struct Scenario {
    /// Transport model (equations)
    pub model: Box<dyn TransportModel>,

    /// Source and predator forcing
    pub forcing: Forcing,

    /// Override for the model's default (zero) initial field
    initial: Option<ConcentrationField>,
}

impl Scenario {
    /// Create a scenario starting from the model's default initial field
    pub fn new(model: Box<dyn TransportModel>, forcing: Forcing) -> Self {
        Self {
            model,
            forcing,
            initial: None,
        }
    }

    /// Replace the initial field
    pub fn with_initial_field(mut self, field: ConcentrationField) -> Self {
        self.initial = Some(field);
        self
    }

    /// Initial field the solver starts from
    pub fn initial_field(&self) -> ConcentrationField {
        match &self.initial {
            Some(field) => field.clone(),
            None => self.model.initial_field(),
        }
    }

    /// Get model name
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Check model, forcing, and initial field against each other
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::DimensionMismatch`] when forcing frames or the
    /// initial field do not span the model's grid, and
    /// [`EdnaError::Configuration`] when the model needs predators but the
    /// forcing has none.
    pub fn validate(&self) -> EdnaResult<()> {
        self.model.validate()?;

        let nz = self.model.points();

        if self.forcing.source().cells() != nz {
            return Err(EdnaError::dimension(
                "source forcing frame",
                nz,
                self.forcing.source().cells(),
            ));
        }

        match self.forcing.predators() {
            Some(predators) if predators.cells() != nz => {
                return Err(EdnaError::dimension(
                    "predator forcing frame",
                    nz,
                    predators.cells(),
                ));
            }
            None if self.model.requires_predators() => {
                return Err(EdnaError::config(format!(
                    "model '{}' requires a predator forcing pattern",
                    self.model.name()
                )));
            }
            _ => {}
        }

        if let Some(field) = &self.initial {
            if field.points() != nz {
                return Err(EdnaError::dimension(
                    "initial field",
                    2 * nz,
                    2 * field.points(),
                ));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("model", &self.model_name())
            .field("points", &self.model.points())
            .field("forcing period", &self.forcing.source().period())
            .field("has predators", &self.forcing.predators().is_some())
            .field("custom initial field", &self.initial.is_some())
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
