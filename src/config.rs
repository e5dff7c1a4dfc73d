//! Configuration module
//!
//! Solver, quadrature and grid settings for the correction table run.
//! Every value defaults to the constants in `params`.

pub mod params;

use crate::error::ModulationError;
use crate::modulation::Injection;

/// Bounded maximization settings for the saturation boundary search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizerSettings {
    /// Absolute tolerance on the abscissa
    pub xatol: f64,
    /// Iteration budget before the search is declared failed
    pub max_iterations: usize,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        Self {
            xatol: params::minimizer::DEFAULT_XATOL,
            max_iterations: params::minimizer::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Adaptive quadrature settings for the fundamental integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureSettings {
    pub eps_abs: f64,
    pub eps_rel: f64,
    /// Maximum number of subintervals
    pub limit: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            eps_abs: params::quadrature::DEFAULT_EPS_ABS,
            eps_rel: params::quadrature::DEFAULT_EPS_REL,
            limit: params::quadrature::DEFAULT_LIMIT,
        }
    }
}

/// Per-guess root finder settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Relative tolerance between consecutive iterates
    pub xtol: f64,
    /// Residual evaluations allowed for a single initial guess
    pub max_evaluations: usize,
    /// Consecutive steps pulled back from below the domain bound before
    /// the attempt is abandoned
    pub max_damped_steps: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            xtol: params::solver::DEFAULT_XTOL,
            max_evaluations: params::solver::DEFAULT_MAX_EVALUATIONS,
            max_damped_steps: params::solver::DEFAULT_MAX_DAMPED_STEPS,
        }
    }
}

/// Everything a table run needs besides the grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub injection: Injection,
    pub minimizer: MinimizerSettings,
    pub quadrature: QuadratureSettings,
    pub solver: SolverSettings,
    /// Solve grid points concurrently (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            injection: Injection::default(),
            minimizer: MinimizerSettings::default(),
            quadrature: QuadratureSettings::default(),
            solver: SolverSettings::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl TableConfig {
    pub fn new(injection: Injection) -> Self {
        Self {
            injection,
            ..Self::default()
        }
    }
}

/// Inclusive arithmetic range `start, start + step, ..., stop`.
///
/// Values are computed as `start + i * step` so long grids do not drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl StepRange {
    pub const fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Default target fundamental grid (0.001..=0.999).
    pub const fn default_m_grid() -> Self {
        Self::new(
            params::grid::DEFAULT_M_START,
            params::grid::DEFAULT_M_STOP,
            params::grid::DEFAULT_M_STEP,
        )
    }

    /// Default initial guess sweep (1.0..=50.0).
    pub const fn default_guesses() -> Self {
        Self::new(
            params::grid::DEFAULT_GUESS_START,
            params::grid::DEFAULT_GUESS_STOP,
            params::grid::DEFAULT_GUESS_STEP,
        )
    }

    /// Number of points, including `stop` when it lies on the grid.
    pub fn len(&self) -> Result<usize, ModulationError> {
        let valid = self.start.is_finite()
            && self.stop.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.stop >= self.start;
        if !valid {
            return Err(ModulationError::InvalidGrid {
                start: self.start,
                stop: self.stop,
                step: self.step,
            });
        }
        // 1e-9 absorbs representation error of decimal steps (0.999 / 0.001)
        let span = (self.stop - self.start) / self.step;
        if !span.is_finite() || span >= params::grid::MAX_POINTS as f64 {
            return Err(ModulationError::InvalidGrid {
                start: self.start,
                stop: self.stop,
                step: self.step,
            });
        }
        Ok((span + 1e-9).floor() as usize + 1)
    }

    pub fn values(&self) -> Result<Vec<f64>, ModulationError> {
        let n = self.len()?;
        Ok((0..n).map(|i| self.start + i as f64 * self.step).collect())
    }
}
