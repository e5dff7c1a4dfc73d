// Per-phase reference waveform with zero-sequence injection
//
// The injected term z is added to phase u. Injection of a zero-sequence
// component leaves the line-to-line voltage untouched while lowering the
// peak of the phase reference, which moves the clipping boundary.

use libm::sin;

use super::transforms::three_phase;

/// Third-harmonic injection ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThirdHarmonicRatio {
    /// sin(3θ)/6, the ratio that minimizes the peak
    #[default]
    Sixth,
    /// sin(3θ)/4
    Quarter,
}

impl ThirdHarmonicRatio {
    pub const fn value(self) -> f64 {
        match self {
            Self::Sixth => 1.0 / 6.0,
            Self::Quarter => 1.0 / 4.0,
        }
    }
}

/// Harmonic injection strategy for the reference waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Injection {
    /// Plain sinusoidal PWM
    Plain,
    /// Third-harmonic injection (THI)
    ThirdHarmonic(ThirdHarmonicRatio),
    /// Min/max injection, equivalent to space vector PWM
    #[default]
    SpaceVector,
}

impl Injection {
    /// Reference value of phase u at electrical angle `theta`.
    ///
    /// No wraparound is applied; periodicity comes from the trig functions.
    pub fn sample(self, theta: f64) -> f64 {
        let (u, v, w) = three_phase(theta);

        let z = match self {
            Self::Plain => 0.0,
            Self::ThirdHarmonic(ratio) => sin(3.0 * theta) * ratio.value(),
            Self::SpaceVector => {
                let max = u.max(v).max(w);
                let min = u.min(v).min(w);
                -(max + min) * 0.5
            }
        };

        u + z
    }

    /// Waveform selector understood by the drive firmware
    /// (0: sine, 1: THI, 2: SVM).
    pub const fn sig_mode(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::ThirdHarmonic(_) => 1,
            Self::SpaceVector => 2,
        }
    }

    /// Short label used in logs and file names
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plain => "sine",
            Self::ThirdHarmonic(ThirdHarmonicRatio::Sixth) => "thi-1/6",
            Self::ThirdHarmonic(ThirdHarmonicRatio::Quarter) => "thi-1/4",
            Self::SpaceVector => "svm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6, TAU};
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    const ALL: [Injection; 4] = [
        Injection::Plain,
        Injection::ThirdHarmonic(ThirdHarmonicRatio::Sixth),
        Injection::ThirdHarmonic(ThirdHarmonicRatio::Quarter),
        Injection::SpaceVector,
    ];

    #[test]
    fn test_plain_is_sine() {
        for k in 0..32 {
            let t = k as f64 * 0.2;
            assert!(approx_eq(Injection::Plain.sample(t), t.sin()));
        }
    }

    #[test]
    fn test_third_harmonic_ratios() {
        let t = 0.4;
        let sixth = Injection::ThirdHarmonic(ThirdHarmonicRatio::Sixth).sample(t);
        let quarter = Injection::ThirdHarmonic(ThirdHarmonicRatio::Quarter).sample(t);
        assert!(approx_eq(sixth, t.sin() + (3.0 * t).sin() / 6.0));
        assert!(approx_eq(quarter, t.sin() + (3.0 * t).sin() / 4.0));
    }

    #[test]
    fn test_space_vector_known_points() {
        let svm = Injection::SpaceVector;
        // 1.5 sin θ below π/6, sqrt(3)/2 peak at π/3, 3/4 at π/2
        assert!(approx_eq(svm.sample(0.0), 0.0));
        assert!(approx_eq(svm.sample(0.1), 1.5 * 0.1f64.sin()));
        assert!(approx_eq(svm.sample(FRAC_PI_6), 0.75));
        assert!(approx_eq(svm.sample(FRAC_PI_3), 3f64.sqrt() / 2.0));
        assert!(approx_eq(svm.sample(FRAC_PI_2), 0.75));
    }

    #[test]
    fn test_half_wave_antisymmetry() {
        for injection in ALL {
            for k in 0..50 {
                let t = k as f64 * 0.13;
                let a = injection.sample(t);
                let b = injection.sample(t + core::f64::consts::PI);
                assert!(approx_eq(a, -b), "{:?} at {}", injection, t);
            }
        }
    }

    #[test]
    fn test_sig_mode() {
        assert_eq!(Injection::Plain.sig_mode(), 0);
        assert_eq!(Injection::ThirdHarmonic(ThirdHarmonicRatio::Quarter).sig_mode(), 1);
        assert_eq!(Injection::SpaceVector.sig_mode(), 2);
    }

    proptest! {
        #[test]
        fn test_periodicity(t in -200.0f64..200.0, idx in 0usize..4) {
            let injection = ALL[idx];
            let a = injection.sample(t);
            let b = injection.sample(t + TAU);
            prop_assert!((a - b).abs() < 1e-9, "{:?}: {} vs {}", injection, a, b);
        }

        #[test]
        fn test_space_vector_bounded(t in -50.0f64..50.0) {
            let value = Injection::SpaceVector.sample(t);
            prop_assert!(value.abs() <= 3f64.sqrt() / 2.0 + 1e-12);
        }
    }
}
