//! Saturation boundary of the reference waveform.
//!
//! The maximum of the waveform over a quarter period fixes the modulation
//! index at which clipping starts: `a * max_wave_val <= 1` is the linear
//! region.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use tracing::debug;

use super::Injection;
use crate::config::MinimizerSettings;
use crate::error::ModulationError;
use crate::numeric::minimize_bounded;

/// Peak of the waveform over `[0, π/2]`.
pub fn compute_boundary(
    injection: Injection,
    settings: &MinimizerSettings,
) -> Result<f64, ModulationError> {
    let min = minimize_bounded(|t| -injection.sample(t), 0.0, FRAC_PI_2, settings).map_err(
        |failure| ModulationError::BoundaryNotFound {
            iterations: failure.best.evaluations,
            reason: format!(
                "bracket did not shrink to {:e} (best t = {}, value = {})",
                settings.xatol, failure.best.x, -failure.best.fx
            ),
        },
    )?;

    let max_wave_val = -min.fx;
    if !max_wave_val.is_finite() || max_wave_val <= 0.0 {
        return Err(ModulationError::BoundaryNotFound {
            iterations: min.evaluations,
            reason: format!("waveform peak {} is not a positive finite value", max_wave_val),
        });
    }

    debug!(
        "{} boundary: max {} at t = {} ({} evaluations)",
        injection.label(),
        max_wave_val,
        min.x,
        min.evaluations
    );
    Ok(max_wave_val)
}

/// Point where the linear region ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPoint {
    pub max_wave_val: f64,
    /// Largest modulation index without clipping
    pub a_boundary: f64,
    /// Fundamental reached at `a_boundary`
    pub m_boundary: f64,
}

impl BoundaryPoint {
    pub fn new(max_wave_val: f64) -> Self {
        let a_boundary = 1.0 / max_wave_val;
        Self {
            max_wave_val,
            a_boundary,
            m_boundary: a_boundary * FRAC_PI_4,
        }
    }
}
