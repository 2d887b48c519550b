//! Common utilities for integration tests

#![allow(dead_code)]

use edna_rs::forcing::{Forcing, ForcingPattern};
use edna_rs::grid::DepthGrid;
use edna_rs::models::TransportReaction;
use edna_rs::physics::ConcentrationField;
use nalgebra::DVector;

/// Transport model with every term switched off except first-order decay
pub fn decay_only_model(grid: &DepthGrid, decay_rate: f64) -> TransportReaction {
    TransportReaction::new(
        grid,
        grid.uniform_profile(0.0),
        grid.uniform_profile(0.0),
        grid.uniform_profile(decay_rate),
        0.0,
        0.0,
        0.0,
        0.0,
    )
    .unwrap()
}

/// Forcing with a zero source and no predators
pub fn zero_forcing(nz: usize) -> Forcing {
    Forcing::source_only(ForcingPattern::zero(nz, 1).unwrap())
}

/// Field with the same value in every cell of both fractions
pub fn uniform_field(nz: usize, value: f64) -> ConcentrationField {
    ConcentrationField::from_halves(
        &DVector::from_element(nz, value),
        &DVector::from_element(nz, value),
    )
}

/// Concentration-weighted mean depth index of a profile
pub fn center_of_mass(profile: &DVector<f64>) -> f64 {
    let total: f64 = profile.sum();
    assert!(total > 0.0, "empty profile has no center of mass");
    profile
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c)
        .sum::<f64>()
        / total
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
