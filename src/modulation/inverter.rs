// Modulation inverter: target fundamental M → modulation index A
//
// The residual switches between two models depending on whether the scaled
// reference can clip at all. The root of the residual in `a` is searched
// from a priority-ordered list of starting points; the first converged
// attempt wins.

use core::f64::consts::FRAC_PI_4;

use tracing::trace;

use super::fundamental::fundamental;
use super::Injection;
use crate::config::{QuadratureSettings, SolverSettings};
use crate::error::ModulationError;
use crate::numeric::{secant, RootOutcome};

/// Operating region of a modulation index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// `a * max_wave_val <= 1`: no sample reaches the clip level
    Linear,
    /// Part of the quarter period is clipped
    Overmodulation,
}

impl Region {
    pub fn of(a: f64, max_wave_val: f64) -> Self {
        if a * max_wave_val <= 1.0 {
            Self::Linear
        } else {
            Self::Overmodulation
        }
    }
}

/// Read-only inputs shared by every solve of one table run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverter {
    pub injection: Injection,
    pub max_wave_val: f64,
    pub quadrature: QuadratureSettings,
    pub solver: SolverSettings,
}

impl Inverter {
    pub fn new(
        injection: Injection,
        max_wave_val: f64,
        quadrature: QuadratureSettings,
        solver: SolverSettings,
    ) -> Self {
        Self {
            injection,
            max_wave_val,
            quadrature,
            solver,
        }
    }

    /// Fundamental reached by modulation index `a`.
    pub fn fundamental_at(&self, a: f64) -> Result<f64, ModulationError> {
        match Region::of(a, self.max_wave_val) {
            Region::Linear => Ok(a * FRAC_PI_4),
            Region::Overmodulation => fundamental(a, self.injection, &self.quadrature),
        }
    }

    /// `target_m - fundamental(a)`; the linear region never touches the quadrature.
    pub fn residual(&self, a: f64, target_m: f64) -> Result<f64, ModulationError> {
        Ok(target_m - self.fundamental_at(a)?)
    }

    /// Modulation index producing `target_m`.
    ///
    /// Guesses are tried in order; a guess whose attempt fails for any reason
    /// (integration error, repeated steps below zero, stall, budget) is skipped.
    pub fn solve_for_m(&self, target_m: f64, initial_guesses: &[f64]) -> Result<f64, ModulationError> {
        for &guess in initial_guesses {
            match secant(|a| self.residual(a, target_m), guess, 0.0, &self.solver) {
                RootOutcome::Converged { root, evaluations } => {
                    trace!(
                        "m = {:.3}: converged to a = {} from {} ({} evaluations)",
                        target_m,
                        root,
                        guess,
                        evaluations
                    );
                    return Ok(root);
                }
                RootOutcome::Failed(reason) => {
                    trace!("m = {:.3}: guess {} failed: {:?}", target_m, guess, reason);
                }
            }
        }

        Err(ModulationError::SolutionNotFound { m: target_m })
    }
}

/// `target_m - fundamental(a)` for a standalone evaluation.
pub fn residual(
    a: f64,
    target_m: f64,
    max_wave_val: f64,
    injection: Injection,
    quadrature: &QuadratureSettings,
) -> Result<f64, ModulationError> {
    Inverter::new(injection, max_wave_val, *quadrature, SolverSettings::default()).residual(a, target_m)
}

/// Modulation index producing `target_m`, trying `initial_guesses` in order.
pub fn solve_for_m(
    target_m: f64,
    initial_guesses: &[f64],
    max_wave_val: f64,
    injection: Injection,
    quadrature: &QuadratureSettings,
    solver: &SolverSettings,
) -> Result<f64, ModulationError> {
    Inverter::new(injection, max_wave_val, *quadrature, *solver).solve_for_m(target_m, initial_guesses)
}
