//! Transport models for eDNA simulation
//!
//! All models implement the [`TransportModel`](crate::physics::TransportModel) trait.
//! The solver calls `derivative` at each time step — models are responsible
//! for the physics (transport, decay, predation), the solver for the time
//! integration.
//!
//! # Available Models
//!
//! ## [`TransportReaction`] — two-fraction transport
//!
//! Large and small eDNA fractions advecting, diffusing, decaying, and
//! breaking down through the water column, fed by shedding organisms. Use
//! this model to study vertical signal spread without trophic transfer.
//!
//! ## [`PredationTransport`] — with predator consumption
//!
//! Adds a predation pathway on top of the transport terms: predators
//! co-located with prey ingest ambient eDNA, digest it for a configurable
//! delay, and release it at their own depth. Requires a predator forcing
//! pattern and carries a digestion ledger through the solver.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod predation;
pub mod transport;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use predation::{DigestionParameters, PredationTransport};
pub use transport::TransportReaction;
