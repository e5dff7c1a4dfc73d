// Fundamental component of the clipped reference
//
// Quarter-wave symmetry: the balanced waveform is odd and symmetric about
// π/2, so the fundamental sine coefficient of min(1, a·wave), normalized to
// the six-step (square wave) fundamental 4/π, reduces to
// ∫₀^{π/2} sin t · min(1, a·wave(t)) dt.

use core::f64::consts::FRAC_PI_2;

use libm::sin;
use tracing::trace;

use super::Injection;
use crate::config::QuadratureSettings;
use crate::error::ModulationError;
use crate::numeric::{integrate, Quadrature};

/// Fundamental amplitude produced by modulation index `a` after clipping.
pub fn fundamental(
    a: f64,
    injection: Injection,
    settings: &QuadratureSettings,
) -> Result<f64, ModulationError> {
    let q = fundamental_estimate(a, injection, settings)?;
    trace!(
        "fundamental(a = {}) = {} ± {:e} over {} intervals",
        a,
        q.value,
        q.abs_error,
        q.intervals
    );
    Ok(q.value)
}

/// Fundamental with the quadrature's absolute error estimate.
pub fn fundamental_estimate(
    a: f64,
    injection: Injection,
    settings: &QuadratureSettings,
) -> Result<Quadrature, ModulationError> {
    let integrand = |t: f64| sin(t) * (a * injection.sample(t)).min(1.0);

    integrate(integrand, 0.0, FRAC_PI_2, settings).map_err(|failure| {
        ModulationError::IntegrationFailure {
            a,
            abs_error: failure.abs_error,
            tolerance: failure.tolerance,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_4, FRAC_PI_6};

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn svm(a: f64) -> f64 {
        fundamental(a, Injection::SpaceVector, &QuadratureSettings::default()).unwrap()
    }

    #[test]
    fn test_unclipped_matches_linear_gain() {
        // No clipping below 1/max: fundamental is a·π/4 for every injection
        for injection in [Injection::Plain, Injection::SpaceVector] {
            let s = fundamental(0.8, injection, &QuadratureSettings::default()).unwrap();
            assert!(approx_eq(s, 0.8 * FRAC_PI_4), "{:?}: {}", injection, s);
        }
    }

    #[test]
    fn test_plain_clipped_closed_form() {
        // Plain sine clipped at t0 = asin(1/a):
        // a/2 (t0 - sin t0 cos t0) + cos t0
        let a: f64 = 2.0;
        let t0 = (1.0 / a).asin();
        let exact = a / 2.0 * (t0 - t0.sin() * t0.cos()) + t0.cos();
        let s = fundamental(a, Injection::Plain, &QuadratureSettings::default()).unwrap();
        assert!(approx_eq(s, exact));
    }

    #[test]
    fn test_space_vector_deep_clipping_closed_form() {
        // For a > 4/3 the SVM reference is 1.5a·sin t up to t0 = asin(2/(3a)),
        // then clipped: 1 - ∫₀^t0 sin t (1 - 1.5a sin t) dt
        let a: f64 = 4.0;
        let t0 = (2.0 / (3.0 * a)).asin();
        let missing = (1.0 - t0.cos()) - 1.5 * a * (t0 / 2.0 - (2.0 * t0).sin() / 4.0);
        assert!(t0 < FRAC_PI_6);
        assert!(approx_eq(svm(a), 1.0 - missing));
    }

    #[test]
    fn test_error_estimate_within_tolerance() {
        let settings = QuadratureSettings::default();
        for a in [1.2, 2.0, 8.0] {
            let q = fundamental_estimate(a, Injection::SpaceVector, &settings).unwrap();
            let tolerance = settings.eps_abs.max(settings.eps_rel * q.value.abs());
            assert!(q.abs_error <= tolerance, "a = {}: {:e}", a, q.abs_error);
            assert!(q.intervals >= 1);
            assert_eq!(q.value, svm(a));
        }
    }

    #[test]
    fn test_increasing_towards_one() {
        let mut last = 0.0;
        for k in 0..40 {
            let a = 1.2 + k as f64 * 0.5;
            let s = svm(a);
            assert!(s > last);
            assert!(s < 1.0);
            last = s;
        }
    }

    #[test]
    fn test_integration_failure_is_reported() {
        let settings = QuadratureSettings {
            eps_abs: 1e-15,
            eps_rel: 1e-15,
            limit: 2,
        };
        let err = fundamental(3.0, Injection::SpaceVector, &settings).unwrap_err();
        assert!(matches!(err, ModulationError::IntegrationFailure { a, .. } if a == 3.0));
    }
}
