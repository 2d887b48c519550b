//! Two-fraction eDNA transport-reaction model
//!
//! The water column carries eDNA in two size fractions: a large
//! particle-bound fraction that sinks relative to the water, and a small
//! dissolved fraction that does not. Both fractions advect, diffuse, and
//! decay; the large fraction additionally breaks down into the small one,
//! and organisms at depth shed fresh material into both.
//!
//! # Equations
//!
//! ```text
//! ∂C_L/∂t = −(w_v − w_s)·∂C_L/∂z + ∂/∂z(κ_z·∂C_L/∂z) − (k + δ)·C_L + S(z,t)·σ_L
//! ∂C_S/∂t = −w_v·∂C_S/∂z      + ∂/∂z(κ_z·∂C_S/∂z) − k·C_S + δ·C_L + S(z,t)·σ_S
//! ```
//!
//! with `w_v` the vertical water velocity, `w_s` the sinking speed of the
//! large fraction, `κ_z` the eddy diffusivity, `k` the decay rate, `δ` the
//! breakdown rate, `S` the shedding organism distribution, and `σ_L`, `σ_S`
//! the per-fraction shedding rates.
//!
//! # Example
//!
//! ```rust
//! use edna_rs::grid::DepthGrid;
//! use edna_rs::models::TransportReaction;
//!
//! let grid = DepthGrid::new(300.0, 2.0).unwrap();
//! let model = TransportReaction::new(
//!     &grid,
//!     grid.uniform_profile(1e-4),   // diffusivity
//!     grid.uniform_profile(0.0),    // water velocity
//!     grid.uniform_profile(1e-5),   // decay rate
//!     1e-4,                         // sinking speed
//!     1e-6,                         // breakdown rate
//!     1.0,                          // large-fraction shedding
//!     0.1,                          // small-fraction shedding
//! ).unwrap();
//! ```

use crate::digestion::StomachLedger;
use crate::error::{EdnaError, EdnaResult};
use crate::forcing::StepForcing;
use crate::grid::DepthGrid;
use crate::physics::{gradient, ConcentrationField, TransportModel};
use nalgebra::DVector;

/// Two-fraction transport-reaction model without predators
#[derive(Clone, Debug)]
pub struct TransportReaction {
    // ==================== Depth Profiles ====================
    /// Eddy diffusivity κ_z \[m²/s\]
    kz: DVector<f64>,
    /// Vertical water velocity w_v \[m/s\], positive downward
    wv: DVector<f64>,
    /// Decay rate k \[1/s\]
    decay: DVector<f64>,

    // ==================== Scalar Parameters ====================
    /// Sinking speed of the large fraction w_s \[m/s\]
    sinking: f64,
    /// Breakdown rate large → small δ \[1/s\]
    breakdown: f64,
    /// Shedding rate into the large fraction σ_L \[conc/s per organism\]
    shed_large: f64,
    /// Shedding rate into the small fraction σ_S \[conc/s per organism\]
    shed_small: f64,

    // ==================== Grid ====================
    /// Number of depth cells
    nz: usize,
    /// Depth resolution \[m\]
    dz: f64,
}

impl TransportReaction {
    /// Create a new model on the given grid
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::DimensionMismatch`] when a profile does not
    /// span the grid, and [`EdnaError::Configuration`] on negative rate
    /// parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        grid: &DepthGrid,
        kz: DVector<f64>,
        wv: DVector<f64>,
        decay: DVector<f64>,
        sinking: f64,
        breakdown: f64,
        shed_large: f64,
        shed_small: f64,
    ) -> EdnaResult<Self> {
        let nz = grid.cells();

        if kz.len() != nz {
            return Err(EdnaError::dimension("diffusivity profile", nz, kz.len()));
        }
        if wv.len() != nz {
            return Err(EdnaError::dimension("advection profile", nz, wv.len()));
        }
        if decay.len() != nz {
            return Err(EdnaError::dimension("decay profile", nz, decay.len()));
        }
        if breakdown < 0.0 || !breakdown.is_finite() {
            return Err(EdnaError::config(format!(
                "breakdown rate must be non-negative, got {}",
                breakdown
            )));
        }
        if shed_large < 0.0 || shed_small < 0.0 {
            return Err(EdnaError::config(
                "shedding rates must be non-negative",
            ));
        }

        Ok(Self {
            kz,
            wv,
            decay,
            sinking,
            breakdown,
            shed_large,
            shed_small,
            nz,
            dz: grid.dz(),
        })
    }

    /// Breakdown rate δ \[1/s\]
    pub fn breakdown(&self) -> f64 {
        self.breakdown
    }

    /// Transport-reaction rate terms shared with the predation variant
    ///
    /// Returns (dC_L/dt, dC_S/dt) before any predation terms.
    pub(crate) fn reaction_rates(
        &self,
        c_large: &DVector<f64>,
        c_small: &DVector<f64>,
        source: &DVector<f64>,
    ) -> (DVector<f64>, DVector<f64>) {
        // Advective fluxes: the large fraction sinks relative to the water
        let grad_large = gradient(c_large, self.dz);
        let grad_small = gradient(c_small, self.dz);

        // Diffusive fluxes: ∇(κ_z ∇C)
        let diff_large = gradient(&self.kz.component_mul(&grad_large), self.dz);
        let diff_small = gradient(&self.kz.component_mul(&grad_small), self.dz);

        let mut rate_large = DVector::zeros(self.nz);
        let mut rate_small = DVector::zeros(self.nz);

        for n in 0..self.nz {
            rate_large[n] = -(self.wv[n] - self.sinking) * grad_large[n]
                + diff_large[n]
                - (self.decay[n] + self.breakdown) * c_large[n]
                + source[n] * self.shed_large;

            rate_small[n] = -self.wv[n] * grad_small[n] + diff_small[n]
                - self.decay[n] * c_small[n]
                + self.breakdown * c_large[n]
                + source[n] * self.shed_small;
        }

        (rate_large, rate_small)
    }
}

impl TransportModel for TransportReaction {
    fn points(&self) -> usize {
        self.nz
    }

    fn derivative(
        &self,
        field: &ConcentrationField,
        forcing: &StepForcing<'_>,
        ledger: Option<StomachLedger>,
    ) -> (ConcentrationField, Option<StomachLedger>) {
        assert_eq!(
            field.points(),
            self.nz,
            "Field size {} vs grid discretization {}",
            field.points(),
            self.nz
        );

        let c_large = field.large().clone_owned();
        let c_small = field.small().clone_owned();

        let (rate_large, rate_small) =
            self.reaction_rates(&c_large, &c_small, forcing.source);

        (
            ConcentrationField::from_halves(&rate_large, &rate_small),
            ledger,
        )
    }

    fn name(&self) -> &str {
        "Two-fraction transport-reaction"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forcing::{Forcing, ForcingPattern};

    fn test_grid() -> DepthGrid {
        DepthGrid::new(100.0, 2.0).unwrap()
    }

    fn decay_only_model(grid: &DepthGrid, k: f64) -> TransportReaction {
        TransportReaction::new(
            grid,
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            grid.uniform_profile(k),
            0.0,
            0.0,
            0.0,
            0.0,
        )
        .unwrap()
    }

    fn zero_forcing(nz: usize) -> Forcing {
        Forcing::source_only(ForcingPattern::zero(nz, 1).unwrap())
    }

    #[test]
    fn test_rejects_short_profile() {
        let grid = test_grid();
        let result = TransportReaction::new(
            &grid,
            DVector::zeros(10), // wrong length
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            0.0,
            0.0,
            0.0,
            0.0,
        );
        assert!(matches!(
            result,
            Err(EdnaError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_rates() {
        let grid = test_grid();
        assert!(TransportReaction::new(
            &grid,
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            0.0,
            -1e-6,
            0.0,
            0.0,
        )
        .is_err());
    }

    #[test]
    fn test_pure_decay_rate() {
        let grid = test_grid();
        let k = 1e-4;
        let model = decay_only_model(&grid, k);
        let forcing = zero_forcing(grid.cells());

        let field = ConcentrationField::from_halves(
            &grid.uniform_profile(2.0),
            &grid.uniform_profile(1.0),
        );

        let (rate, _) = model.derivative(&field, &forcing.at(0), None);

        // Uniform field: no transport, only decay
        for n in 0..grid.cells() {
            assert!((rate.large()[n] - (-k * 2.0)).abs() < 1e-15);
            assert!((rate.small()[n] - (-k * 1.0)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_breakdown_moves_mass_between_fractions() {
        let grid = test_grid();
        let delta = 1e-5;
        let model = TransportReaction::new(
            &grid,
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            0.0,
            delta,
            0.0,
            0.0,
        )
        .unwrap();
        let forcing = zero_forcing(grid.cells());

        let field = ConcentrationField::from_halves(
            &grid.uniform_profile(3.0),
            &grid.uniform_profile(0.0),
        );

        let (rate, _) = model.derivative(&field, &forcing.at(0), None);

        // Loss from large equals gain in small: Σ(dC_L + dC_S) = 0
        let balance = rate.total_large() + rate.total_small();
        assert!(balance.abs() < 1e-12, "breakdown not conservative: {}", balance);
        assert!(rate.large()[0] < 0.0);
        assert!(rate.small()[0] > 0.0);
    }

    #[test]
    fn test_shedding_adds_where_source_is() {
        let grid = test_grid();
        let nz = grid.cells();
        let model = TransportReaction::new(
            &grid,
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            0.0,
            0.0,
            2.0,
            0.5,
        )
        .unwrap();

        // Source only in cell 10
        let mut frame = DVector::zeros(nz);
        frame[10] = 1.0;
        let forcing =
            Forcing::source_only(ForcingPattern::new(vec![frame]).unwrap());

        let field = ConcentrationField::zeros(nz);
        let (rate, _) = model.derivative(&field, &forcing.at(0), None);

        assert_eq!(rate.large()[10], 2.0);
        assert_eq!(rate.small()[10], 0.5);
        assert_eq!(rate.large()[11], 0.0);
    }

    #[test]
    fn test_sinking_advects_large_fraction_only() {
        let grid = test_grid();
        let nz = grid.cells();
        let model = TransportReaction::new(
            &grid,
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            grid.uniform_profile(0.0),
            1e-3,
            0.0,
            0.0,
            0.0,
        )
        .unwrap();
        let forcing = zero_forcing(nz);

        // Linear profile in both fractions
        let profile = DVector::from_fn(nz, |i, _| i as f64);
        let field = ConcentrationField::from_halves(&profile, &profile);

        let (rate, _) = model.derivative(&field, &forcing.at(0), None);

        // w_v = 0, w_s > 0: large fraction sees −(−w_s)·∂C/∂z = +w_s/dz·dz
        let slope = 1.0 / grid.dz();
        assert!((rate.large()[5] - 1e-3 * slope).abs() < 1e-12);
        assert_eq!(rate.small()[5], 0.0);
    }

    #[test]
    fn test_ledger_passes_through_unchanged() {
        let grid = test_grid();
        let model = decay_only_model(&grid, 1e-4);
        let forcing = zero_forcing(grid.cells());
        let field = ConcentrationField::zeros(grid.cells());

        let ledger = StomachLedger::new(3, grid.cells()).unwrap();
        let (_, out) = model.derivative(&field, &forcing.at(0), Some(ledger.clone()));
        assert_eq!(out, Some(ledger));
    }
}
