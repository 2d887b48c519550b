//! Physics layer: state container, differencing, and the model trait
//!
//! This module provides the building blocks transport models are made of.
//! A transport model encapsulates the physics equations of a water column
//! (advection, diffusion, decay, breakdown, predation).
//!
//! # Core Concepts
//!
//! - **Transport Model**: Computes the rate of change at a given state
//! - **Concentration Field**: Two stacked size fractions over the depth grid
//! - **Gradient**: Central/one-sided finite differencing on that grid
//!
//! # Architecture
//!
//! Transport models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to solve them (numerics)
//!
//! This separation allows:
//! - Same model with different solvers (Euler, Runge-Kutta)
//! - Same solver with different models (pure transport, predation)
//!
//! # Example
//!
//! ```rust
//! use edna_rs::physics::{ConcentrationField, gradient};
//! use nalgebra::DVector;
//!
//! let field = ConcentrationField::zeros(100);
//! assert_eq!(field.as_vector().len(), 200);
//!
//! let profile = DVector::from_fn(100, |i, _| i as f64);
//! let slope = gradient(&profile, 1.0);
//! assert!((slope[50] - 1.0).abs() < 1e-12);
//! ```

// module declaration
pub mod field;
pub mod gradient;
pub mod traits;

// re-export commonly used types for convenience
pub use field::ConcentrationField;
pub use gradient::gradient;
pub use traits::TransportModel;
