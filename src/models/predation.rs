//! Transport-reaction model with predator grazing and delayed release
//!
//! Extends [`TransportReaction`](crate::models::TransportReaction) with a
//! predation pathway: predators co-located with prey ingest eDNA, hold it
//! through a digestion delay, and release it (attenuated by digestive
//! decay) wherever the predators are at release time. The gut content
//! lives in a [`StomachLedger`] that the solver threads through its
//! integration stages.
//!
//! Grazing is bookkeeping only: intake is written into the ledger without
//! a matching sink in the water column, so the release pathway acts as a
//! net eDNA source at predator depths.
//!
//! # Per-Step Sequence
//!
//! For one evaluation at step `t`:
//!
//! 1. Grazing intake: `eaten = ε · (prey ∘ predators) ∘ C` per fraction
//! 2. Record: `eaten · dt` overwrites the ledger slot `t mod delay`
//! 3. Release: the aged slots contribute mass distributed over the
//!    predator profile, each attenuated by its release factor
//! 4. The transport-reaction terms are added on top, plus the released
//!    mass (per step, so divided by dt); intake appears in the ledger
//!    only

use crate::digestion::{ReleaseFactorTable, StomachLedger};
use crate::error::{EdnaError, EdnaResult};
use crate::forcing::StepForcing;
use crate::grid::DepthGrid;
use crate::models::TransportReaction;
use crate::physics::{ConcentrationField, TransportModel};
use nalgebra::DVector;

/// Digestion timing for the predation model
///
/// All durations are in solver steps; the model needs the solver's `dt` to
/// translate digestive decay (per hour) into per-step release factors, so
/// the same `dt` must be passed to the solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct DigestionParameters {
    /// Gut residence time before release begins \[steps\]
    pub digestion_steps: usize,
    /// Length of the release window \[steps\]
    pub release_steps: usize,
    /// Digestive decay rate \[1/h\]
    pub decay_rate: f64,
    /// Solver time step \[s\]
    pub dt: f64,
}

/// Transport-reaction model with predators
#[derive(Clone, Debug)]
pub struct PredationTransport {
    /// Shared transport-reaction terms
    base: TransportReaction,
    /// Consumption efficiency ε \[1/s per prey·predator density\]
    efficiency: f64,
    /// Gut residence time \[steps\]
    digestion_steps: usize,
    /// Precomputed release window
    factors: ReleaseFactorTable,
    /// Solver time step \[s\]
    dt: f64,
    /// Depth cells
    nz: usize,
}

impl PredationTransport {
    /// Create a predation model on top of an existing transport model
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] when the release window is
    /// longer than the digestion delay (the circular ledger cannot hold
    /// material that long; the run fails at setup rather than silently
    /// shortening the window), when the delay is zero, or on a negative
    /// efficiency.
    pub fn new(
        grid: &DepthGrid,
        base: TransportReaction,
        efficiency: f64,
        digestion: DigestionParameters,
    ) -> EdnaResult<Self> {
        if efficiency < 0.0 || !efficiency.is_finite() {
            return Err(EdnaError::config(format!(
                "consumption efficiency must be non-negative, got {}",
                efficiency
            )));
        }
        if digestion.digestion_steps == 0 {
            return Err(EdnaError::config(
                "digestion delay must span at least one step",
            ));
        }
        if digestion.release_steps > digestion.digestion_steps {
            return Err(EdnaError::config(format!(
                "release window of {} steps exceeds the digestion delay of {} steps",
                digestion.release_steps, digestion.digestion_steps
            )));
        }

        let factors = ReleaseFactorTable::precompute(
            digestion.dt,
            digestion.decay_rate,
            digestion.release_steps,
        )?;

        Ok(Self {
            base,
            efficiency,
            digestion_steps: digestion.digestion_steps,
            factors,
            dt: digestion.dt,
            nz: grid.cells(),
        })
    }

    /// Release factor window
    pub fn release_factors(&self) -> &ReleaseFactorTable {
        &self.factors
    }
}

impl TransportModel for PredationTransport {
    fn points(&self) -> usize {
        self.nz
    }

    fn derivative(
        &self,
        field: &ConcentrationField,
        forcing: &StepForcing<'_>,
        ledger: Option<StomachLedger>,
    ) -> (ConcentrationField, Option<StomachLedger>) {
        let predators = forcing
            .predators
            .expect("Predator distribution is required");
        let mut ledger = ledger.expect("Stomach ledger is required");

        let c_large = field.large().clone_owned();
        let c_small = field.small().clone_owned();

        // Grazing intake: ε · (prey ∘ predators) ∘ C, per fraction. Feeds
        // the gut ledger only; the ambient field keeps its mass.
        let grazing: DVector<f64> =
            forcing.source.component_mul(predators) * self.efficiency;
        let consumed_large = grazing.component_mul(&c_large);
        let consumed_small = grazing.component_mul(&c_small);

        // Record this step's intake, then scan the aged slots
        ledger.record(
            forcing.step,
            &consumed_large * self.dt,
            &consumed_small * self.dt,
        );
        let (released_large, released_small) =
            ledger.release(forcing.step, predators, &self.factors);

        let (mut rate_large, mut rate_small) =
            self.base.reaction_rates(&c_large, &c_small, forcing.source);

        // Released amounts are per step; convert back to a rate
        rate_large += released_large / self.dt;
        rate_small += released_small / self.dt;

        (
            ConcentrationField::from_halves(&rate_large, &rate_small),
            Some(ledger),
        )
    }

    fn initial_ledger(&self) -> Option<StomachLedger> {
        // Constructor enforced digestion_steps >= 1
        Some(
            StomachLedger::new(self.digestion_steps, self.nz)
                .expect("digestion delay validated at construction"),
        )
    }

    fn requires_predators(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "Two-fraction transport-reaction with predation"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
