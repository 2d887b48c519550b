//! Concentration field container
//!
//! The state of a simulation is a single vector holding the two eDNA size
//! fractions stacked end to end: the first `nz` entries are the large
//! (particle-bound) fraction, the last `nz` the small (dissolved) fraction.
//! Keeping both halves in one contiguous vector lets the integrators treat
//! the whole state with plain vector arithmetic while the models address
//! each fraction through views.
//!
//! # Memory Layout
//!
//! ```text
//! data = [ C_L[0] … C_L[nz-1] | C_S[0] … C_S[nz-1] ]
//! ```
//!
//! # Example
//!
//! ```rust
//! use edna_rs::physics::ConcentrationField;
//! use nalgebra::DVector;
//!
//! let large = DVector::from_element(100, 1.0);
//! let small = DVector::zeros(100);
//! let field = ConcentrationField::from_halves(&large, &small);
//!
//! assert_eq!(field.points(), 100);
//! assert_eq!(field.total_large(), 100.0);
//! assert_eq!(field.total_small(), 0.0);
//! ```

use crate::error::{EdnaError, EdnaResult};
use nalgebra::{DVector, DVectorView};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Stacked two-fraction concentration state
///
/// Immutable length: `data.len() == 2 * nz` always holds after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationField {
    data: DVector<f64>,
    nz: usize,
}

impl ConcentrationField {
    // ======================================= constructors =======================================

    /// All-zero field over `nz` depth cells
    pub fn zeros(nz: usize) -> Self {
        Self {
            data: DVector::zeros(2 * nz),
            nz,
        }
    }

    /// Wrap an existing stacked vector
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::DimensionMismatch`] when the vector has odd
    /// length; the two halves must be the same size.
    pub fn from_vector(data: DVector<f64>) -> EdnaResult<Self> {
        if data.len() % 2 != 0 {
            return Err(EdnaError::dimension(
                "concentration field",
                data.len() + 1,
                data.len(),
            ));
        }
        let nz = data.len() / 2;
        Ok(Self { data, nz })
    }

    /// Build from separate fraction profiles
    ///
    /// # Panics
    ///
    /// Panics when the halves differ in length. This is a programming
    /// error, not a configuration error: callers assemble both halves on
    /// the same grid.
    pub fn from_halves(large: &DVector<f64>, small: &DVector<f64>) -> Self {
        assert_eq!(
            large.len(),
            small.len(),
            "fraction profiles must share the grid"
        );
        let nz = large.len();
        let mut data = DVector::zeros(2 * nz);
        data.rows_mut(0, nz).copy_from(large);
        data.rows_mut(nz, nz).copy_from(small);
        Self { data, nz }
    }

    // ========================================== Queries ==========================================

    /// Number of depth cells per fraction
    pub fn points(&self) -> usize {
        self.nz
    }

    /// Large (particle-bound) fraction view
    pub fn large(&self) -> DVectorView<'_, f64> {
        self.data.rows(0, self.nz)
    }

    /// Small (dissolved) fraction view
    pub fn small(&self) -> DVectorView<'_, f64> {
        self.data.rows(self.nz, self.nz)
    }

    /// Sum of the large fraction over the column
    pub fn total_large(&self) -> f64 {
        self.large().sum()
    }

    /// Sum of the small fraction over the column
    pub fn total_small(&self) -> f64 {
        self.small().sum()
    }

    /// Full stacked vector
    pub fn as_vector(&self) -> &DVector<f64> {
        &self.data
    }

    /// True when any entry is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|x| !x.is_finite())
    }

    // ====================================== Apply functions ======================================

    /// Apply a function to every entry in place
    ///
    /// Switches to parallel iteration above the solver's crossover
    /// threshold when compiled with the `parallel` feature.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        if self.data.len() > crate::solver::parallel_threshold() {
            #[cfg(feature = "parallel")]
            self.data
                .as_mut_slice()
                .par_iter_mut()
                .for_each(|x| *x = f(*x));
            #[cfg(not(feature = "parallel"))]
            self.data.iter_mut().for_each(|x| *x = f(*x));
        } else {
            self.data.iter_mut().for_each(|x| *x = f(*x));
        }
    }
}

// ================================== Simple arithmetic functions ==================================

impl std::ops::Add for ConcentrationField {
    type Output = ConcentrationField;
    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(self.nz, rhs.nz, "field grids must match");
        ConcentrationField {
            data: self.data + rhs.data,
            nz: self.nz,
        }
    }
}

impl std::ops::Add<&ConcentrationField> for ConcentrationField {
    type Output = ConcentrationField;
    fn add(self, rhs: &Self) -> Self::Output {
        assert_eq!(self.nz, rhs.nz, "field grids must match");
        ConcentrationField {
            data: self.data + &rhs.data,
            nz: self.nz,
        }
    }
}

impl std::ops::Mul<f64> for ConcentrationField {
    type Output = ConcentrationField;
    fn mul(self, scalar: f64) -> Self::Output {
        ConcentrationField {
            data: self.data * scalar,
            nz: self.nz,
        }
    }
}

impl std::ops::Mul<ConcentrationField> for f64 {
    type Output = ConcentrationField;
    fn mul(self, rhs: ConcentrationField) -> Self::Output {
        rhs * self
    }
}

impl std::fmt::Display for ConcentrationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConcentrationField [{} cells, ΣC_L = {:.3e}, ΣC_S = {:.3e}]",
            self.nz,
            self.total_large(),
            self.total_small()
        )
    }
}

// ==================== Tests ====================
