//! Transport model trait
//!
//! This module defines the core API for transport models:
//! - `TransportModel`: trait for all depth-resolved eDNA models

use crate::digestion::StomachLedger;
use crate::error::EdnaResult;
use crate::forcing::StepForcing;
use crate::physics::ConcentrationField;

// =================================================================================================
// Transport Model Trait
// =================================================================================================

/// Trait for depth-resolved transport models
///
/// # Responsibility
/// Computes the rate of change of the concentration field at a given state.
/// Does NOT integrate it (that's the Solver's job).
///
/// The model provides the "physics" (equations), the Solver provides
/// the "numerics" (method to solve them).
///
/// # Digestion Ledger
///
/// Models with predators carry a [`StomachLedger`] alongside the field: a
/// circular buffer of past consumption that drives delayed release. The
/// ledger moves by value through `derivative` so each evaluation works on an
/// explicit snapshot; the solver decides which evolved snapshot to commit
/// after its sub-stages. Models without predators return the ledger
/// unchanged (it stays `None`).
///
/// # Mandatory Point
/// All new transport models MUST implement this trait.
pub trait TransportModel: Send + Sync {
    /// Number of depth cells
    ///
    /// Used by the solver to allocate vectors. The field it integrates has
    /// `2 * points()` entries (two size fractions).
    fn points(&self) -> usize;

    /// Rate of change of the field under the given forcing
    ///
    /// # Arguments
    /// * `field` - Current concentration field
    /// * `forcing` - Source and predator densities resolved for this step
    /// * `ledger` - Digestion snapshot to evolve, for predator models
    ///
    /// # Returns
    /// The time derivative of the field (per second), together with the
    /// evolved ledger snapshot.
    ///
    /// # Note
    /// This method encapsulates ALL the physics:
    /// - Advection, diffusion, decay, aggregation breakdown
    /// - Shedding source terms
    /// - Predator consumption and delayed release
    /// - Spatial derivatives (finite differences)
    fn derivative(
        &self,
        field: &ConcentrationField,
        forcing: &StepForcing<'_>,
        ledger: Option<StomachLedger>,
    ) -> (ConcentrationField, Option<StomachLedger>);

    /// Initial concentration field for this model
    fn initial_field(&self) -> ConcentrationField {
        ConcentrationField::zeros(self.points())
    }

    /// Initial digestion ledger, for models that track one
    fn initial_ledger(&self) -> Option<StomachLedger> {
        None
    }

    /// Whether the forcing must provide a predator distribution
    fn requires_predators(&self) -> bool {
        false
    }

    /// Check internal consistency of the model's parameters
    fn validate(&self) -> EdnaResult<()> {
        Ok(())
    }

    /// Name of the model (used for display and logging)
    fn name(&self) -> &str;

    /// Description of the model (optional)
    fn description(&self) -> Option<&String> {
        None
    }
}
