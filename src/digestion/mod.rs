//! Predator digestion ledger and delayed-release factors
//!
//! When predators consume eDNA-laden prey, the material does not vanish: it
//! sits in the gut for a digestion delay and is then released back into the
//! water column over a release window, attenuated by digestive decay.
//!
//! # Core Concepts
//!
//! - **Stomach Ledger**: a circular buffer with one slot per time step of
//!   the digestion delay. Each slot stores the depth-resolved consumption
//!   recorded at that step; a slot is overwritten exactly when its contents
//!   have aged one full digestion delay.
//! - **Release Factor Table**: precomputed exponential-decay fractions, one
//!   per step of the release window. Factor `i` applies to material that
//!   has been digesting for `delay + i` steps.
//!
//! # Evaluation Order
//!
//! Within one model evaluation the order is fixed: current consumption is
//! recorded into its slot FIRST, then release scans the window. Because
//! the buffer length equals the digestion delay, offset 0 of the scan
//! addresses the slot recorded this very step; the fixed ordering makes
//! that deterministic rather than dependent on call order.

use crate::error::{EdnaError, EdnaResult};
use nalgebra::DVector;

/// Fragments whose column totals both fall below this are skipped by the
/// release scan (and their slots left untouched).
const RELEASE_EPSILON: f64 = 1e-15;

// =================================================================================================
// Release Factor Table
// =================================================================================================

/// Precomputed per-step release fractions
///
/// Factor `i` is the fraction of a slot's remaining content released when
/// that slot is `i` steps into the release window:
///
/// ```text
/// f[i] = r · exp(−r · (i+1) · dt / 3600)
/// ```
///
/// with `r` the digestive decay rate \[1/h\] and `dt` the time step \[s\].
#[derive(Debug, Clone)]
pub struct ReleaseFactorTable {
    factors: Vec<f64>,
}

impl ReleaseFactorTable {
    /// Precompute the table for a release window of `release_steps` steps
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] on a zero-length window or a
    /// non-positive decay rate or time step.
    pub fn precompute(dt: f64, decay_rate: f64, release_steps: usize) -> EdnaResult<Self> {
        if release_steps == 0 {
            return Err(EdnaError::config(
                "release window must span at least one step",
            ));
        }
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(EdnaError::config(format!(
                "time step must be positive and finite, got {}",
                dt
            )));
        }
        if !(decay_rate > 0.0 && decay_rate.is_finite()) {
            return Err(EdnaError::config(format!(
                "digestive decay rate must be positive and finite, got {}",
                decay_rate
            )));
        }

        let factors = (0..release_steps)
            .map(|i| decay_rate * (-decay_rate * (i as f64 + 1.0) * dt / 3600.0).exp())
            .collect();

        Ok(Self { factors })
    }

    /// Number of steps in the release window
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True for an empty table (never produced by `precompute`)
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Factors in window order
    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    /// Total fraction of a slot released over the full window,
    /// `1 − Π(1 − f[i])`
    ///
    /// Useful for mass-balance checks.
    pub fn cumulative_fraction(&self) -> f64 {
        1.0 - self.factors.iter().map(|f| 1.0 - f).product::<f64>()
    }
}

// =================================================================================================
// Stomach Ledger
// =================================================================================================

/// Circular buffer of depth-resolved consumption, one slot per step of the
/// digestion delay
///
/// The ledger is a value type: it moves through the integrator stages as an
/// explicit snapshot, and the solver commits whichever snapshot its scheme
/// designates.
#[derive(Debug, Clone, PartialEq)]
pub struct StomachLedger {
    large: Vec<DVector<f64>>,
    small: Vec<DVector<f64>>,
    digestion_steps: usize,
}

impl StomachLedger {
    /// Empty ledger for a digestion delay of `digestion_steps` steps over
    /// `nz` depth cells
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] on a zero-step delay; the
    /// circular indexing needs at least one slot.
    pub fn new(digestion_steps: usize, nz: usize) -> EdnaResult<Self> {
        if digestion_steps == 0 {
            return Err(EdnaError::config(
                "digestion delay must span at least one step",
            ));
        }
        Ok(Self {
            large: vec![DVector::zeros(nz); digestion_steps],
            small: vec![DVector::zeros(nz); digestion_steps],
            digestion_steps,
        })
    }

    /// Number of slots (= digestion delay in steps)
    pub fn digestion_steps(&self) -> usize {
        self.digestion_steps
    }

    /// Number of depth cells per slot
    pub fn points(&self) -> usize {
        self.large[0].len()
    }

    /// Record this step's consumption, overwriting the slot that has aged
    /// one full digestion delay
    pub fn record(&mut self, step: usize, consumed_large: DVector<f64>, consumed_small: DVector<f64>) {
        let slot = step % self.digestion_steps;
        self.large[slot] = consumed_large;
        self.small[slot] = consumed_small;
    }

    /// Release aged material back into the column
    ///
    /// Scans one slot per release-window offset: offset `i` addresses the
    /// slot recorded `digestion_steps + i` steps ago. Each scanned slot
    /// contributes `f[i] · Σslot` distributed over `predator_dist`, and is
    /// attenuated by `1 − f[i]`. Slots whose large AND small totals are
    /// both below the release threshold are skipped untouched.
    ///
    /// Returns the depth-resolved (large, small) release rates.
    pub fn release(
        &mut self,
        step: usize,
        predator_dist: &DVector<f64>,
        factors: &ReleaseFactorTable,
    ) -> (DVector<f64>, DVector<f64>) {
        let nz = self.points();
        let len = self.digestion_steps as i64;

        let mut released_large = DVector::zeros(nz);
        let mut released_small = DVector::zeros(nz);

        for (i, &factor) in factors.factors().iter().enumerate() {
            let slot = (step as i64 - len - i as i64).rem_euclid(len) as usize;

            let sum_large: f64 = self.large[slot].sum();
            let sum_small: f64 = self.small[slot].sum();
            if sum_large < RELEASE_EPSILON && sum_small < RELEASE_EPSILON {
                continue;
            }

            released_large += predator_dist * (factor * sum_large);
            released_small += predator_dist * (factor * sum_small);

            self.large[slot] *= 1.0 - factor;
            self.small[slot] *= 1.0 - factor;
        }

        (released_large, released_small)
    }

    /// Total material currently held across all slots (large, small)
    pub fn total_mass(&self) -> (f64, f64) {
        let large = self.large.iter().map(|s| s.sum()).sum();
        let small = self.small.iter().map(|s| s.sum()).sum();
        (large, small)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(nz: usize, value: f64) -> DVector<f64> {
        DVector::from_element(nz, value)
    }

    #[test]
    fn test_factor_table_values() {
        let table = ReleaseFactorTable::precompute(600.0, 0.3, 3).unwrap();
        assert_eq!(table.len(), 3);

        // f[i] = 0.3 · exp(−0.3 · (i+1) · 600/3600)
        for (i, &f) in table.factors().iter().enumerate() {
            let expected = 0.3 * (-0.3 * (i as f64 + 1.0) / 6.0).exp();
            assert!((f - expected).abs() < 1e-15);
        }

        // Factors decay monotonically across the window
        assert!(table.factors()[0] > table.factors()[1]);
        assert!(table.factors()[1] > table.factors()[2]);
    }

    #[test]
    fn test_factor_table_rejects_degenerate_setup() {
        assert!(ReleaseFactorTable::precompute(600.0, 0.3, 0).is_err());
        assert!(ReleaseFactorTable::precompute(0.0, 0.3, 3).is_err());
        assert!(ReleaseFactorTable::precompute(600.0, -1.0, 3).is_err());
    }

    #[test]
    fn test_ledger_rejects_zero_delay() {
        assert!(StomachLedger::new(0, 10).is_err());
    }

    #[test]
    fn test_record_overwrites_aged_slot() {
        let mut ledger = StomachLedger::new(3, 2).unwrap();

        ledger.record(0, uniform(2, 1.0), uniform(2, 0.0));
        ledger.record(3, uniform(2, 5.0), uniform(2, 0.0));

        // Step 3 lands in slot 0, replacing step 0's content
        let (total_large, _) = ledger.total_mass();
        assert!((total_large - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_release_skips_empty_slots() {
        let mut ledger = StomachLedger::new(4, 3).unwrap();
        let factors = ReleaseFactorTable::precompute(600.0, 0.3, 2).unwrap();
        let predators = uniform(3, 1.0 / 3.0);

        let (rl, rs) = ledger.release(10, &predators, &factors);
        assert!(rl.iter().all(|&x| x == 0.0));
        assert!(rs.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_release_targets_aged_slot_and_attenuates() {
        let digestion_steps = 5;
        let mut ledger = StomachLedger::new(digestion_steps, 2).unwrap();
        let factors = ReleaseFactorTable::precompute(600.0, 0.3, 1).unwrap();
        let f = factors.factors()[0];
        let predators = uniform(2, 0.5);

        // Consume 4 units (2 per cell) at step 2
        ledger.record(2, uniform(2, 2.0), uniform(2, 0.0));

        // One digestion delay later the slot comes due: step 7 scans
        // (7 − 5 − 0) mod 5 = slot 2
        let (released, _) = ledger.release(7, &predators, &factors);
        let released_total: f64 = released.sum();
        assert!((released_total - f * 4.0).abs() < 1e-12);

        // Slot keeps the complement
        let (remaining, _) = ledger.total_mass();
        assert!((remaining - 4.0 * (1.0 - f)).abs() < 1e-12);
    }

    #[test]
    fn test_release_distributes_over_predators() {
        let mut ledger = StomachLedger::new(2, 4).unwrap();
        let factors = ReleaseFactorTable::precompute(600.0, 0.3, 1).unwrap();
        let f = factors.factors()[0];

        ledger.record(0, uniform(4, 1.0), uniform(4, 0.0));

        // Predators concentrated in cell 1
        let mut predators = DVector::zeros(4);
        predators[1] = 1.0;

        let (released, _) = ledger.release(2, &predators, &factors);
        assert!((released[1] - f * 4.0).abs() < 1e-12);
        assert_eq!(released[0], 0.0);
        assert_eq!(released[3], 0.0);
    }

    #[test]
    fn test_record_precedes_release_scan() {
        // Offset 0 addresses slot (t − ds) mod ds = t mod ds — the slot
        // record() just overwrote. With the fixed record-then-release
        // order, the scan therefore sees THIS step's consumption, not the
        // material the overwrite destroyed.
        let mut ledger = StomachLedger::new(3, 1).unwrap();
        let factors = ReleaseFactorTable::precompute(600.0, 0.3, 1).unwrap();
        let predators = uniform(1, 1.0);

        for step in 0..3 {
            ledger.record(step, uniform(1, 1.0), uniform(1, 0.0));
            ledger.release(step, &predators, &factors);
        }

        // Step 3 overwrites slot 0 with 2.0; the same-step scan hits
        // slot (3 − 3 − 0) mod 3 = 0 and must see the fresh value
        ledger.record(3, uniform(1, 2.0), uniform(1, 0.0));
        let (released, _) = ledger.release(3, &predators, &factors);

        let f = factors.factors()[0];
        assert!((released[0] - f * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_pulse_round_trip() {
        // One pulse of consumption, no further intake. Over the full scan
        // window the slot is hit once per offset, so the cumulative release
        // is m·(1 − Π(1 − f_i)) and the complement stays in the ledger.
        let digestion_steps = 4;
        let window = 3;
        let mut ledger = StomachLedger::new(digestion_steps, 1).unwrap();
        let factors = ReleaseFactorTable::precompute(600.0, 0.3, window).unwrap();
        let predators = uniform(1, 1.0);

        let consumed = 2.5;
        ledger.record(0, uniform(1, consumed), uniform(1, 0.0));

        // Slot 0 comes due at steps 4, 5, 6 (offsets 0, 1, 2)
        let mut cumulative = 0.0;
        for step in digestion_steps..digestion_steps + window {
            let (released, _) = ledger.release(step, &predators, &factors);
            cumulative += released[0];
        }

        let retained: f64 = factors.factors().iter().map(|f| 1.0 - f).product();
        assert!((cumulative - consumed * (1.0 - retained)).abs() < 1e-12);

        let (remaining, _) = ledger.total_mass();
        assert!((remaining - consumed * retained).abs() < 1e-12);

        // Past the window the slot is out of scan range
        let (late, _) = ledger.release(digestion_steps + window, &predators, &factors);
        assert_eq!(late[0], 0.0);
    }

    #[test]
    fn test_multi_offset_scan_wraps() {
        let mut ledger = StomachLedger::new(4, 1).unwrap();
        let factors = ReleaseFactorTable::precompute(600.0, 0.3, 3).unwrap();
        let predators = uniform(1, 1.0);

        ledger.record(0, uniform(1, 1.0), uniform(1, 0.0));
        ledger.record(1, uniform(1, 1.0), uniform(1, 0.0));
        ledger.record(2, uniform(1, 1.0), uniform(1, 0.0));

        // Step 6 scans slots (6−4−i) mod 4 = 2, 1, 0
        let (released, _) = ledger.release(6, &predators, &factors);
        let expected: f64 = factors.factors().iter().sum();
        assert!((released[0] - expected).abs() < 1e-12);
    }
}
