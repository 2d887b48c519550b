//! Numerical methods for time integration
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Architecture
//!
//! The separation between abstract solver interface (`solver::traits`) and concrete
//! implementations (`solver::methods`) follows the Open-Closed Principle:
//! - **Open** for extension: Add new methods without modifying existing code
//! - **Closed** for modification: The `Solver` trait is stable and never changes
//!
//! # Available Methods
//!
//! - **[`EulerSolver`]**: Forward Euler method
//!   - Order: First-order O(dt)
//!   - Cost: 1 model evaluation per step
//!   - Use: Quick exploratory runs, matching legacy results
//!
//! - **[`Rk4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴) for the concentration field
//!   - Cost: 4 model evaluations per step
//!   - Use: Production simulations
//!
//! # Digestion Ledger Threading
//!
//! Predation models carry a stomach ledger alongside the field. Both
//! schemes move it through their stage evaluations as an explicit value and
//! commit the snapshot their scheme designates — see each solver's
//! documentation for the exact wiring.
//!
//! # Design Philosophy
//!
//! Each solver is:
//! - **Self-contained**: No shared mutable state
//! - **Stateless**: Can be reused for multiple simulations

pub mod euler;
pub mod rk4;

// Re-exports for convenience
pub use euler::EulerSolver;
pub use rk4::Rk4Solver;
