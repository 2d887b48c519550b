//! Finite-difference spatial derivatives on the depth grid
//!
//! Second-order central differences in the interior, first-order one-sided
//! differences at the surface and bottom. The one-sided stencils let the
//! transport terms run on grids as small as two cells, with the boundary
//! cells acting as open (zero-curvature) edges.

use nalgebra::DVector;

/// First derivative of a profile with respect to depth
///
/// Matches the standard central/one-sided scheme:
///
/// ```text
/// f'[0]    = (f[1] − f[0]) / dz
/// f'[i]    = (f[i+1] − f[i−1]) / (2·dz)     0 < i < n−1
/// f'[n−1]  = (f[n−1] − f[n−2]) / dz
/// ```
///
/// # Panics
///
/// Panics on fewer than 2 points; the grid constructor guarantees at least
/// two cells.
pub fn gradient(values: &DVector<f64>, dz: f64) -> DVector<f64> {
    let n = values.len();
    assert!(n >= 2, "gradient needs at least 2 points");

    let mut result = DVector::zeros(n);

    result[0] = (values[1] - values[0]) / dz;
    for i in 1..n - 1 {
        result[i] = (values[i + 1] - values[i - 1]) / (2.0 * dz);
    }
    result[n - 1] = (values[n - 1] - values[n - 2]) / dz;

    result
}
