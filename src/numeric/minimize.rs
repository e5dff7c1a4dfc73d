// Bounded scalar minimization (Brent's method)
//
// Golden-section search with parabolic interpolation steps on a closed
// interval. The search stops once the bracket around the best point is
// within `xatol` (plus a relative term), or fails when the iteration
// budget runs out.

use crate::config::MinimizerSettings;

const GOLDEN_MEAN: f64 = 0.381_966_011_250_105_1; // (3 - sqrt(5)) / 2
const SQRT_EPS: f64 = 1.490_116_119_384_765_6e-8; // sqrt(f64::EPSILON)

/// Location and value of the minimum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub fx: f64,
    pub evaluations: usize,
}

/// The bracket did not shrink to tolerance within the budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeFailure {
    pub best: Minimum,
}

#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Minimize `f` over `[lo, hi]`.
pub fn minimize_bounded<F: Fn(f64) -> f64>(
    f: F,
    lo: f64,
    hi: f64,
    settings: &MinimizerSettings,
) -> Result<Minimum, MinimizeFailure> {
    let (mut a, mut b) = (lo, hi);

    let mut fulc = a + GOLDEN_MEAN * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat: f64 = 0.0;
    let mut e: f64 = 0.0;

    let mut fx = f(xf);
    let mut evaluations = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;

    let mut xm = 0.5 * (a + b);
    let mut tol1 = SQRT_EPS * xf.abs() + settings.xatol / 3.0;
    let mut tol2 = 2.0 * tol1;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        if evaluations >= settings.max_iterations || !fx.is_finite() {
            return Err(MinimizeFailure {
                best: Minimum {
                    x: xf,
                    fx,
                    evaluations,
                },
            });
        }

        let mut golden = true;

        if e.abs() > tol1 {
            // Parabola through the three best points
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    let si = sign(xm - xf) + if xm == xf { 1.0 } else { 0.0 };
                    rat = tol1 * si;
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = GOLDEN_MEAN * e;
        }

        let si = sign(rat) + if rat == 0.0 { 1.0 } else { 0.0 };
        let x = xf + si * rat.abs().max(tol1);
        let fu = f(x);
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = SQRT_EPS * xf.abs() + settings.xatol / 3.0;
        tol2 = 2.0 * tol1;
    }

    Ok(Minimum {
        x: xf,
        fx,
        evaluations,
    })
}
