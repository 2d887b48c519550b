//! Depth grid and water-column profiles
//!
//! The grid is a uniform 1D discretization of the water column from the
//! surface (z = 0) downward. All depth profiles (diffusivity, advection,
//! decay) are arrays aligned to this grid, owned by the caller and
//! read-only to the solver.
//!
//! # Profile Builders
//!
//! Besides the grid itself, this module provides the standard oceanographic
//! profiles the models are usually run with:
//!
//! - [`diffusivity_profile`]: tanh transition from surface to deep
//!   diffusivity across a seasonal mixed-layer depth
//! - [`advection_profile`]: piecewise-linear vertical velocity, peaking at
//!   200 m and vanishing below 400 m
//! - [`decay_rate_from_temperature`]: linear temperature dependence of the
//!   eDNA decay rate

use crate::error::{EdnaError, EdnaResult};
use nalgebra::DVector;

// =================================================================================================
// Depth Grid
// =================================================================================================

/// Uniform depth grid for the water column
///
/// Depth values run from 0 to `z_max` inclusive in steps of `dz`, so a
/// column of 1500 m at 0.5 m resolution has 3001 cells.
#[derive(Debug, Clone)]
pub struct DepthGrid {
    z: DVector<f64>,
    dz: f64,
}

impl DepthGrid {
    /// Create a grid spanning `[0, z_max]` with resolution `dz`
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] when `dz` or `z_max` is not
    /// positive, or when the resulting grid has fewer than 2 cells (the
    /// finite-difference gradient needs at least two points).
    pub fn new(z_max: f64, dz: f64) -> EdnaResult<Self> {
        if !(dz > 0.0 && dz.is_finite()) {
            return Err(EdnaError::config(format!(
                "depth resolution must be positive and finite, got {}",
                dz
            )));
        }
        if !(z_max > 0.0 && z_max.is_finite()) {
            return Err(EdnaError::config(format!(
                "maximum depth must be positive and finite, got {}",
                z_max
            )));
        }

        let cells = (z_max / dz).floor() as usize + 1;
        if cells < 2 {
            return Err(EdnaError::config(format!(
                "grid needs at least 2 cells, got {} (z_max = {}, dz = {})",
                cells, z_max, dz
            )));
        }

        let z = DVector::from_fn(cells, |i, _| i as f64 * dz);
        Ok(Self { z, dz })
    }

    /// Number of depth cells
    pub fn cells(&self) -> usize {
        self.z.len()
    }

    /// Depth resolution \[m\]
    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Depth values \[m\], ascending from the surface
    pub fn z(&self) -> &DVector<f64> {
        &self.z
    }

    /// Deepest grid point \[m\]
    pub fn z_max(&self) -> f64 {
        self.z[self.z.len() - 1]
    }

    /// Uniform profile aligned to this grid
    pub fn uniform_profile(&self, value: f64) -> DVector<f64> {
        DVector::from_element(self.cells(), value)
    }
}

// =================================================================================================
// Seasons
// =================================================================================================

/// Season selector for the mixed-layer depth
///
/// The mixed layer deepens from summer stratification (30 m) to winter
/// convection (140 m).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Mixed-layer depth \[m\] for this season
    pub fn mixed_layer_depth(&self) -> f64 {
        match self {
            Season::Summer => 30.0,
            Season::Spring => 70.0,
            Season::Fall => 90.0,
            Season::Winter => 140.0,
        }
    }
}

// =================================================================================================
// Profile Builders
// =================================================================================================

/// Surface diffusivity \[m²/s\]
const KAPPA_SURFACE: f64 = 1e-3;

/// Deep-water diffusivity \[m²/s\]
const KAPPA_DEEP: f64 = 1e-5;

/// Vertical diffusivity profile with a seasonal mixed layer
///
/// Transitions smoothly (tanh) from `KAPPA_SURFACE` above the mixed-layer
/// depth to `KAPPA_DEEP` below it. `l_scale` controls the sharpness of the
/// transition in meters.
///
/// ```text
/// κ(z) = κ_deep + (κ_surf − κ_deep) · ½ · (1 − tanh((z − z_ml) / L))
/// ```
pub fn diffusivity_profile(grid: &DepthGrid, season: Season, l_scale: f64) -> DVector<f64> {
    let ml_depth = season.mixed_layer_depth();
    grid.z().map(|z| {
        KAPPA_DEEP + (KAPPA_SURFACE - KAPPA_DEEP) * 0.5 * (1.0 - ((z - ml_depth) / l_scale).tanh())
    })
}

/// Direction of vertical advection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvectionDirection {
    /// Upwelling (positive velocities)
    Up,
    /// Downwelling (negative velocities)
    Down,
}

/// Piecewise-linear vertical advection profile
///
/// Velocity grows linearly from 0 at the surface to `w_max` at 200 m,
/// shrinks back to 0 at 400 m, and is zero below. For
/// [`AdvectionDirection::Down`] the magnitude is negated.
pub fn advection_profile(
    grid: &DepthGrid,
    w_max: f64,
    direction: AdvectionDirection,
) -> DVector<f64> {
    let w_max = if w_max > 0.0 && direction == AdvectionDirection::Down {
        -w_max
    } else {
        w_max
    };

    grid.z().map(|z| {
        if (0.0..=200.0).contains(&z) {
            w_max / 200.0 * z
        } else if (200.0..=400.0).contains(&z) {
            w_max - (z - 200.0) * w_max / 200.0
        } else {
            0.0
        }
    })
}

/// Temperature-dependent eDNA decay rate \[1/h\]
///
/// Linear fit: `k(T) = 0.05 + 0.0014·T` with temperature in °C.
pub fn decay_rate_from_temperature(temperature: f64) -> f64 {
    0.05 + 0.0014 * temperature
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = DepthGrid::new(1500.0, 0.5).unwrap();
        assert_eq!(grid.cells(), 3001);
        assert_eq!(grid.dz(), 0.5);
        assert_eq!(grid.z()[0], 0.0);
        assert!((grid.z_max() - 1500.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_spacing_is_uniform() {
        let grid = DepthGrid::new(10.0, 0.5).unwrap();
        for i in 1..grid.cells() {
            let spacing = grid.z()[i] - grid.z()[i - 1];
            assert!((spacing - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_grid_rejects_bad_resolution() {
        assert!(DepthGrid::new(100.0, 0.0).is_err());
        assert!(DepthGrid::new(100.0, -1.0).is_err());
        assert!(DepthGrid::new(-10.0, 0.5).is_err());
    }

    #[test]
    fn test_tiny_grid_allowed() {
        // Nz = 3 is the smallest grid the boundary differencing must survive
        let grid = DepthGrid::new(1.0, 0.5).unwrap();
        assert_eq!(grid.cells(), 3);
    }

    #[test]
    fn test_diffusivity_mixed_layer_transition() {
        let grid = DepthGrid::new(500.0, 1.0).unwrap();
        let kappa = diffusivity_profile(&grid, Season::Summer, 2.0);

        // Well above the 30 m summer mixed layer: surface value
        assert!((kappa[0] - KAPPA_SURFACE).abs() < 1e-5);
        // Well below: deep value
        assert!((kappa[400] - KAPPA_DEEP).abs() < 1e-6);
        // Monotone decrease through the transition
        assert!(kappa[20] > kappa[40]);
    }

    #[test]
    fn test_seasonal_mixed_layer_depths() {
        assert_eq!(Season::Summer.mixed_layer_depth(), 30.0);
        assert_eq!(Season::Winter.mixed_layer_depth(), 140.0);
    }

    #[test]
    fn test_advection_profile_shape() {
        let grid = DepthGrid::new(600.0, 1.0).unwrap();
        let w = advection_profile(&grid, 1e-4, AdvectionDirection::Down);

        // Downwelling: negative in the active band
        assert_eq!(w[0], 0.0);
        assert!((w[200] - (-1e-4)).abs() < 1e-12);
        assert!((w[300] - (-0.5e-4)).abs() < 1e-12);
        assert_eq!(w[500], 0.0);
    }

    #[test]
    fn test_advection_profile_upwelling() {
        let grid = DepthGrid::new(600.0, 1.0).unwrap();
        let w = advection_profile(&grid, 1e-4, AdvectionDirection::Up);
        assert!((w[200] - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn test_decay_rate_from_temperature() {
        assert!((decay_rate_from_temperature(0.0) - 0.05).abs() < 1e-12);
        assert!((decay_rate_from_temperature(10.0) - 0.064).abs() < 1e-12);
    }
}
