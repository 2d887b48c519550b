//! edna-rs: eDNA Vertical Transport Simulation Framework
//!
//! A framework for simulating the vertical fate of environmental DNA in the
//! water column: advection, turbulent diffusion, decay, particle breakdown,
//! organism shedding, and predator-mediated redistribution through digestion.
//! Built with Rust for performance and safety.
//!
//! # Architecture
//!
//! edna-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Transport models define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Extensibility and Type Safety**
//!    - Trait-based design for easy extension
//!    - Two-fraction concentration fields with dimension checks
//!    - Stable API (v0.1.0+)
//!
//! # Quick Start
//!
//! ```rust
//! use edna_rs::grid::DepthGrid;
//! use edna_rs::forcing::{Forcing, ForcingPattern};
//! use edna_rs::models::TransportReaction;
//! use edna_rs::solver::{EulerSolver, Scenario, Solver, SolverConfiguration};
//!
//! # fn main() -> edna_rs::error::EdnaResult<()> {
//! // 1. Discretize the water column
//! let grid = DepthGrid::new(200.0, 2.0)?;
//!
//! // 2. Define the transport model (WHAT to solve)
//! let model = TransportReaction::new(
//!     &grid,
//!     grid.uniform_profile(1e-4),   // diffusivity [m²/s]
//!     grid.uniform_profile(0.0),    // vertical velocity [m/s]
//!     grid.uniform_profile(1e-5),   // decay rate [1/s]
//!     1e-4,                         // sinking speed of the large fraction [m/s]
//!     1e-6,                         // breakdown rate [1/s]
//!     1.0,                          // shedding split, large fraction
//!     0.1,                          // shedding split, small fraction
//! )?;
//!
//! // 3. Define the forcing (organisms shedding at the surface)
//! let forcing = Forcing::source_only(ForcingPattern::constant(grid.cells(), 144, 1.0)?);
//! let scenario = Scenario::new(Box::new(model), forcing);
//!
//! // 4. Configure and run the solver (HOW to solve)
//! let config = SolverConfiguration::new(600.0, 144); // 10-minute steps, one day
//! let trace = EulerSolver::new().solve(&scenario, &config)?;
//!
//! println!("Simulation completed: {} steps", trace.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`grid`]: Depth discretization and environmental profiles
//! - [`forcing`]: Time-varying source and predator distributions
//! - [`physics`]: Concentration fields, gradients, and the model trait
//! - [`models`]: Transport-reaction equations, with and without predation
//! - [`digestion`]: Stomach ledger for delayed predator release
//! - [`solver`]: Numerical time integrators
//! - [`output`]: CSV export of profiles and time series
//! - [`error`]: Crate-wide error type

// Core modules
pub mod digestion;
pub mod error;
pub mod forcing;
pub mod grid;
pub mod models;
pub mod output;
pub mod physics;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use edna_rs::prelude::*;
    //! ```
    pub use crate::error::{EdnaError, EdnaResult};
    pub use crate::forcing::{Forcing, ForcingPattern};
    pub use crate::grid::{DepthGrid, Season};
    pub use crate::models::{DigestionParameters, PredationTransport, TransportReaction};
    pub use crate::physics::{ConcentrationField, TransportModel};
    pub use crate::solver::{
        EulerSolver, IntegrationMethod, Rk4Solver, Scenario, SimulationTrace, Solver,
        SolverConfiguration,
    };
}
