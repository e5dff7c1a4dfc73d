//! Error types for the correction table pipeline.

use thiserror::Error;

/// Errors raised while inverting the modulation curve.
///
/// Only `BoundaryNotFound` and `InvalidGrid` abort a run. The other two are
/// local to one evaluation or one grid point and are absorbed by the solver
/// and the table builder respectively.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModulationError {
    /// The quarter-period maximization of the waveform did not converge.
    #[error("saturation boundary not found after {iterations} iterations: {reason}")]
    BoundaryNotFound { iterations: usize, reason: String },

    /// Adaptive quadrature could not meet its tolerance for this modulation index.
    #[error("fundamental integral at a = {a} did not converge (estimated error {abs_error:e}, tolerance {tolerance:e})")]
    IntegrationFailure {
        a: f64,
        abs_error: f64,
        tolerance: f64,
    },

    /// No initial guess converged for the target fundamental.
    #[error("solution not found for m = {m:.3}")]
    SolutionNotFound { m: f64 },

    /// A step range cannot produce a grid.
    #[error("invalid grid {start}..={stop} step {step}")]
    InvalidGrid { start: f64, stop: f64, step: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_not_found_message() {
        let err = ModulationError::SolutionNotFound { m: 0.95 };
        assert_eq!(err.to_string(), "solution not found for m = 0.950");
    }

    #[test]
    fn test_boundary_message_carries_reason() {
        let err = ModulationError::BoundaryNotFound {
            iterations: 500,
            reason: "iteration budget exhausted".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("budget"));
    }
}
