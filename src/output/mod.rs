//! Output module for simulation results
//!
//! This module provides tools to export simulation results for external
//! analysis:
//! - **Depth profiles**: Both size fractions against depth at one instant
//! - **Time series**: Concentrations at a chosen depth cell over a run
//! - **Totals**: Depth-integrated mass of both fractions over a run
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use edna_rs::output::{export_depth_profile_csv, CsvConfig, CsvMetadata};
//!
//! let trace = solver.solve(&scenario, &config)?;
//!
//! let csv = CsvConfig::default().with_metadata(CsvMetadata::from_trace(&trace));
//! export_depth_profile_csv(&grid, trace.final_field(), "profile.csv", Some(&csv))?;
//! ```
//!
//! # Design Philosophy
//!
//! Export works from the crate's own types (`DepthGrid`, `ConcentrationField`,
//! `SimulationTrace`) so that column layout and dimension checks stay
//! consistent with the solver output. Plotting is left to external tools; the
//! CSV files are the interchange format.

pub mod csv;

// Re-export commonly used items for convenience
pub use csv::{
    export_depth_profile_csv,
    export_time_series_csv,
    export_totals_csv,
    CsvConfig,
    CsvMetadata,
};
