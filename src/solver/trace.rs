//! Simulation trace: the stored trajectory of a run
//!
//! The trace holds one concentration field per completed step. The initial
//! field is NOT stored: row `i` is the state after step `i + 1`, at time
//! `(i + 1) · dt`. This keeps the trace shape equal to the configured step
//! count regardless of the scheme.

use crate::physics::ConcentrationField;
use ndarray::Array2;
use std::collections::HashMap;

/// Stored trajectory of a simulation run
///
/// # Examples
///
/// ```rust,ignore
/// let trace = solver.solve(&scenario, &config)?;
///
/// println!("{} steps, final time {} s", trace.len(), trace.times().last().unwrap());
/// let final_field = trace.final_field();
/// let matrix = trace.to_matrix();   // (steps × 2·nz) for analysis
/// ```
#[derive(Debug, Clone)]
pub struct SimulationTrace {
    dt: f64,
    fields: Vec<ConcentrationField>,

    /// Diagnostic metadata (solver name, step counts, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationTrace {
    /// Empty trace with preallocated capacity
    pub fn with_capacity(dt: f64, steps: usize) -> Self {
        Self {
            dt,
            fields: Vec::with_capacity(steps),
            metadata: HashMap::new(),
        }
    }

    /// Append the field after a completed step
    pub fn push(&mut self, field: ConcentrationField) {
        self.fields.push(field);
    }

    /// Number of stored steps
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no steps were stored
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Time step \[s\]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Field after step `i + 1`
    pub fn at(&self, i: usize) -> &ConcentrationField {
        &self.fields[i]
    }

    /// Field after the last step
    ///
    /// # Panics
    ///
    /// Panics on an empty trace; solvers always store at least one step.
    pub fn final_field(&self) -> &ConcentrationField {
        self.fields.last().expect("trace holds at least one step")
    }

    /// Time points, one per stored step
    ///
    /// Computed directly as `(i + 1) · dt` from the index rather than by
    /// accumulation, so the last entry equals the total simulated time to
    /// machine precision.
    pub fn times(&self) -> Vec<f64> {
        (0..self.fields.len())
            .map(|i| (i as f64 + 1.0) * self.dt)
            .collect()
    }

    /// Dense (steps × 2·nz) matrix view of the trajectory
    ///
    /// Row `i` is the stacked field after step `i + 1`; columns `0..nz`
    /// are the large fraction, `nz..2·nz` the small one.
    pub fn to_matrix(&self) -> Array2<f64> {
        if self.fields.is_empty() {
            return Array2::zeros((0, 0));
        }
        let cols = self.fields[0].as_vector().len();
        let mut matrix = Array2::zeros((self.fields.len(), cols));
        for (i, field) in self.fields.iter().enumerate() {
            for (j, &value) in field.as_vector().iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Look up a metadata entry
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_field(nz: usize, value: f64) -> ConcentrationField {
        let mut field = ConcentrationField::zeros(nz);
        field.apply(|_| value);
        field
    }

    #[test]
    fn test_trace_shape_and_times() {
        let mut trace = SimulationTrace::with_capacity(600.0, 3);
        for step in 0..3 {
            trace.push(uniform_field(5, step as f64));
        }

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.times(), vec![600.0, 1200.0, 1800.0]);
        assert_eq!(trace.final_field().as_vector()[0], 2.0);
    }

    #[test]
    fn test_times_are_computed_not_accumulated() {
        // 0.1 is not exactly representable; direct (i+1)·dt keeps the last
        // time exact to machine epsilon where accumulation would drift
        let mut trace = SimulationTrace::with_capacity(0.1, 1000);
        for _ in 0..1000 {
            trace.push(uniform_field(2, 0.0));
        }

        let last = *trace.times().last().unwrap();
        assert!((last - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_matrix_layout() {
        let mut trace = SimulationTrace::with_capacity(1.0, 2);
        trace.push(ConcentrationField::from_halves(
            &nalgebra::DVector::from_vec(vec![1.0, 2.0]),
            &nalgebra::DVector::from_vec(vec![3.0, 4.0]),
        ));

        let matrix = trace.to_matrix();
        assert_eq!(matrix.shape(), &[1, 4]);
        assert_eq!(matrix[[0, 1]], 2.0);
        assert_eq!(matrix[[0, 2]], 3.0);
    }

    #[test]
    fn test_metadata_round_trip() {
        let mut trace = SimulationTrace::with_capacity(1.0, 0);
        trace.add_metadata("solver", "Forward Euler");
        assert_eq!(trace.get_metadata("solver"), Some("Forward Euler"));
        assert_eq!(trace.get_metadata("missing"), None);
    }
}
