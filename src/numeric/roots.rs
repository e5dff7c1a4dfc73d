// Scalar root finding (secant method)
//
// Derivative-free: the first secant is built from the initial guess and a
// point a small relative distance away, like a forward-difference Newton
// step. A step that would cross the domain bound is pulled back halfway
// toward it; only repeated pull-backs abandon the attempt. Every outcome is
// returned as a value; nothing here panics on a bad guess.

use crate::config::SolverSettings;

/// Result of one root-finding attempt from one starting point.
#[derive(Debug, Clone, PartialEq)]
pub enum RootOutcome<E> {
    Converged { root: f64, evaluations: usize },
    Failed(RootFailure<E>),
}

/// Why an attempt did not converge.
#[derive(Debug, Clone, PartialEq)]
pub enum RootFailure<E> {
    /// The function itself reported an error at `x`
    Evaluation { x: f64, error: E },
    /// Steps kept leaving the admissible domain `x >= lower_bound`
    OutOfDomain { x: f64 },
    /// Two consecutive residuals were equal (or non-finite) away from a root
    Stalled { x: f64 },
    /// Evaluation budget used up before the step size met tolerance
    BudgetExhausted { x: f64 },
}

impl<E> RootOutcome<E> {
    pub fn root(&self) -> Option<f64> {
        match self {
            Self::Converged { root, .. } => Some(*root),
            Self::Failed(_) => None,
        }
    }
}

/// Find a root of `f` starting from `x0`, keeping every iterate at or above
/// `lower_bound`.
pub fn secant<F, E>(mut f: F, x0: f64, lower_bound: f64, settings: &SolverSettings) -> RootOutcome<E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    if !x0.is_finite() || x0 < lower_bound {
        return RootOutcome::Failed(RootFailure::OutOfDomain { x: x0 });
    }

    let mut eval = |x: f64| f(x).map_err(|error| RootFailure::Evaluation { x, error });

    let mut p0 = x0;
    let mut p1 = x0 * (1.0 + 1e-4) + if x0 >= 0.0 { 1e-4 } else { -1e-4 };

    let mut q0 = match eval(p0) {
        Ok(q) => q,
        Err(failure) => return RootOutcome::Failed(failure),
    };
    if q0 == 0.0 {
        return RootOutcome::Converged {
            root: p0,
            evaluations: 1,
        };
    }
    let mut q1 = match eval(p1) {
        Ok(q) => q,
        Err(failure) => return RootOutcome::Failed(failure),
    };
    let mut evaluations = 2;
    let mut damped = 0;

    loop {
        if q1 == 0.0 {
            return RootOutcome::Converged {
                root: p1,
                evaluations,
            };
        }
        if q1 == q0 || !q0.is_finite() || !q1.is_finite() {
            return RootOutcome::Failed(RootFailure::Stalled { x: p1 });
        }

        let mut p = p1 - q1 * (p1 - p0) / (q1 - q0);

        if !p.is_finite() {
            return RootOutcome::Failed(RootFailure::Stalled { x: p1 });
        }
        if p < lower_bound {
            damped += 1;
            if damped > settings.max_damped_steps {
                return RootOutcome::Failed(RootFailure::OutOfDomain { x: p });
            }
            p = 0.5 * (p1 + lower_bound);
        } else {
            damped = 0;
        }
        // A pulled-back step says nothing about convergence
        if damped == 0 && (p - p1).abs() <= settings.xtol * (p.abs() + settings.xtol) {
            return RootOutcome::Converged {
                root: p,
                evaluations,
            };
        }
        if evaluations >= settings.max_evaluations {
            return RootOutcome::Failed(RootFailure::BudgetExhausted { x: p });
        }

        p0 = p1;
        q0 = q1;
        p1 = p;
        q1 = match eval(p1) {
            Ok(q) => q,
            Err(failure) => return RootOutcome::Failed(failure),
        };
        evaluations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn ok(f: impl Fn(f64) -> f64) -> impl FnMut(f64) -> Result<f64, Infallible> {
        move |x| Ok(f(x))
    }

    #[test]
    fn test_linear_function_converges() {
        let outcome = secant(ok(|x| 0.5 - x * 0.25), 3.0, 0.0, &SolverSettings::default());
        let root = outcome.root().unwrap();
        assert!((root - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_square_root_of_two() {
        let outcome = secant(ok(|x| x * x - 2.0), 1.0, 0.0, &SolverSettings::default());
        let root = outcome.root().unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_single_overshoot_is_damped() {
        // Slope collapses past x = 1: the first secant spans the kink and
        // overshoots below zero, the pulled-back iterate lands on the steep side
        let g = |x: f64| if x <= 1.0 { x } else { 1.0 + 0.01 * (x - 1.0) };
        let outcome = secant(ok(move |x| 0.01 - g(x)), 1.0, 0.0, &SolverSettings::default());
        let root = outcome.root().unwrap();
        assert!((root - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_overshoot_fails() {
        // Very flat far from the root: every step overshoots past zero
        let outcome = secant(ok(|x| 1.0 / x - 0.5), 1000.0, 0.0, &SolverSettings::default());
        assert!(matches!(
            outcome,
            RootOutcome::Failed(RootFailure::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_constant_function_stalls() {
        let outcome = secant(ok(|_| 1.0), 1.0, 0.0, &SolverSettings::default());
        assert!(matches!(
            outcome,
            RootOutcome::Failed(RootFailure::Stalled { .. })
        ));
    }

    #[test]
    fn test_evaluation_error_is_reported() {
        let outcome = secant(
            |x: f64| if x > 1.5 { Err("boom") } else { Ok(x - 2.0) },
            1.0,
            0.0,
            &SolverSettings::default(),
        );
        assert!(matches!(
            outcome,
            RootOutcome::Failed(RootFailure::Evaluation { error: "boom", .. })
        ));
    }

    #[test]
    fn test_budget_exhausted() {
        let settings = SolverSettings {
            xtol: 1e-14,
            max_evaluations: 3,
            ..SolverSettings::default()
        };
        let outcome = secant(ok(|x| x * x * x - 10.0), 1.0, 0.0, &settings);
        assert!(matches!(
            outcome,
            RootOutcome::Failed(RootFailure::BudgetExhausted { .. })
        ));
    }
}
