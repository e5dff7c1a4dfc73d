// Coordinate transformations for the three-phase reference
// Stationary αβ frame to balanced uvw phases

use libm::{cos, sin};

/// Inverse Clarke transformation (αβ → abc/uvw)
///
/// Transforms from the stationary αβ frame to three-phase values
///
/// # Arguments
/// * `alpha` - Alpha-axis component
/// * `beta` - Beta-axis component
///
/// # Returns
/// Tuple of (u, v, w)
pub fn inverse_clarke(alpha: f64, beta: f64) -> (f64, f64, f64) {
    const SQRT3_DIV_2: f64 = 0.866_025_403_784_438_6; // sqrt(3) / 2
    const ONE_DIV_2: f64 = 0.5;

    let u = alpha;
    let v = -ONE_DIV_2 * alpha + SQRT3_DIV_2 * beta;
    let w = -ONE_DIV_2 * alpha - SQRT3_DIV_2 * beta;

    (u, v, w)
}

/// Balanced unit-amplitude phases at electrical angle `theta`
///
/// Returns (sin θ, sin(θ − 2π/3), sin(θ + 2π/3)). The stationary vector is
/// (sin θ, −cos θ) so that phase u is the sine reference itself.
#[inline]
pub fn three_phase(theta: f64) -> (f64, f64, f64) {
    inverse_clarke(sin(theta), -cos(theta))
}
