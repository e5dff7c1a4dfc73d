//! 過変調リニアリティ補正テーブル
//!
//! Builds the M → code table stored in drive firmware. Each target M is
//! solved independently; points without a solution are dropped and counted,
//! points that land in the linear region are filtered out, and the rest are
//! linearized with a cube root and scaled to 8 bits.

use core::f64::consts::FRAC_PI_4;

use tracing::{info, warn};

use super::boundary::{compute_boundary, BoundaryPoint};
use super::inverter::Inverter;
use super::Injection;
use crate::config::params::quantize::CODE_FULL_SCALE;
use crate::config::TableConfig;
use crate::error::ModulationError;

/// 4/π: ratio A/M everywhere in the linear region
pub const LINEAR_COEFFICIENT: f64 = 1.0 / FRAC_PI_4;

/// One retained table entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionRow {
    /// Target fundamental
    pub m: f64,
    /// Solved modulation index
    pub a: f64,
    /// cbrt(a/m − 4/π) before scaling
    pub correction: f64,
    /// Quantized correction, 255 at the largest correction
    pub code: u8,
}

/// Correction table for one injection strategy
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionTable {
    pub injection: Injection,
    pub boundary: BoundaryPoint,
    /// Rows ordered by ascending M
    pub rows: Vec<CorrectionRow>,
    /// Largest retained correction; code 255 decodes to this value
    pub scale: f64,
    /// Grid points with no converged solution
    pub unsolved: Vec<f64>,
    /// Solved points discarded for lying in the linear region
    pub linear_filtered: usize,
}

/// 補正係数の変換（8bitに格納するため三乗根で線形化）
pub fn linearize(a: f64, m: f64) -> f64 {
    (a / m - LINEAR_COEFFICIENT).cbrt()
}

/// Inverse of `linearize` followed by scaling
fn delinearize(code: u8, scale: f64) -> f64 {
    let c = scale * f64::from(code) / CODE_FULL_SCALE;
    c * c * c
}

/// Scale corrections so the largest maps to 255.
pub fn quantize(corrections: &[f64]) -> (f64, Vec<u8>) {
    let scale = corrections.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(scale > 0.0) {
        return (0.0, vec![0; corrections.len()]);
    }
    let codes = corrections
        .iter()
        .map(|&c| (c * CODE_FULL_SCALE / scale).round().clamp(0.0, CODE_FULL_SCALE) as u8)
        .collect();
    (scale, codes)
}

fn solve_sequential(
    inverter: &Inverter,
    m_grid: &[f64],
    initial_guesses: &[f64],
) -> Vec<Result<f64, ModulationError>> {
    m_grid
        .iter()
        .map(|&m| inverter.solve_for_m(m, initial_guesses))
        .collect()
}

#[cfg(feature = "parallel")]
fn solve_grid(
    inverter: &Inverter,
    m_grid: &[f64],
    initial_guesses: &[f64],
    parallel: bool,
) -> Vec<Result<f64, ModulationError>> {
    use rayon::prelude::*;

    if !parallel {
        return solve_sequential(inverter, m_grid, initial_guesses);
    }
    // collect() on an indexed parallel iterator keeps grid order
    m_grid
        .par_iter()
        .map(|&m| inverter.solve_for_m(m, initial_guesses))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn solve_grid(
    inverter: &Inverter,
    m_grid: &[f64],
    initial_guesses: &[f64],
    _parallel: bool,
) -> Vec<Result<f64, ModulationError>> {
    solve_sequential(inverter, m_grid, initial_guesses)
}

/// Compute the correction table over `m_grid`.
///
/// Fails only when the saturation boundary cannot be found. Unsolved grid
/// points are logged and listed in `CorrectionTable::unsolved`.
pub fn build_correction_table(
    m_grid: &[f64],
    initial_guesses: &[f64],
    config: &TableConfig,
) -> Result<CorrectionTable, ModulationError> {
    let injection = config.injection;
    let max_wave_val = compute_boundary(injection, &config.minimizer)?;
    let boundary = BoundaryPoint::new(max_wave_val);
    info!(
        "{}: max_wave_val = {:.6}, linear region ends at A = {:.4}, M = {:.4}",
        injection.label(),
        boundary.max_wave_val,
        boundary.a_boundary,
        boundary.m_boundary
    );

    let inverter = Inverter::new(injection, max_wave_val, config.quadrature, config.solver);

    let mut solved: Vec<(f64, f64)> = Vec::with_capacity(m_grid.len());
    let mut unsolved = Vec::new();
    let results = solve_grid(&inverter, m_grid, initial_guesses, config.parallel);
    for (&m, result) in m_grid.iter().zip(results) {
        match result {
            Ok(a) => solved.push((m, a)),
            Err(e) => {
                warn!("Error for m = {:.3}: {}", m, e);
                unsolved.push(m);
            }
        }
    }

    // 線形領域に落ちた解は補正不要なので除外
    let solved_count = solved.len();
    solved.retain(|&(_, a)| a > boundary.a_boundary);
    let linear_filtered = solved_count - solved.len();
    solved.sort_by(|x, y| x.0.total_cmp(&y.0));

    let corrections: Vec<f64> = solved.iter().map(|&(m, a)| linearize(a, m)).collect();
    let (scale, codes) = quantize(&corrections);

    let rows: Vec<CorrectionRow> = solved
        .iter()
        .zip(corrections.iter().zip(codes))
        .map(|(&(m, a), (&correction, code))| CorrectionRow {
            m,
            a,
            correction,
            code,
        })
        .collect();

    info!(
        "{} grid points: {} retained, {} in linear region, {} unsolved, scale = {}",
        m_grid.len(),
        rows.len(),
        linear_filtered,
        unsolved.len(),
        scale
    );

    Ok(CorrectionTable {
        injection,
        boundary,
        rows,
        scale,
        unsolved,
        linear_filtered,
    })
}

impl CorrectionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Quantized codes in ascending M order
    pub fn codes(&self) -> Vec<u8> {
        self.rows.iter().map(|row| row.code).collect()
    }

    /// First M that uses the table; below it the linear coefficient applies
    pub fn m_start(&self) -> Option<f64> {
        self.rows.first().map(|row| row.m)
    }

    /// A/M ratio the firmware applies for target `m`.
    ///
    /// Uses the last row at or below `m`, clamped to the final row above
    /// the grid.
    pub fn voltage_coefficient(&self, m: f64) -> f64 {
        let Some(first) = self.rows.first() else {
            return LINEAR_COEFFICIENT;
        };
        if m < first.m {
            return LINEAR_COEFFICIENT;
        }
        let idx = self.rows.partition_point(|row| row.m <= m).saturating_sub(1);
        LINEAR_COEFFICIENT + delinearize(self.rows[idx].code, self.scale)
    }

    /// Modulation index for target `m`, with `m` clamped to [0, 1].
    pub fn modulation_index(&self, m: f64) -> f64 {
        let m = m.clamp(0.0, 1.0);
        m * self.voltage_coefficient(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepRange;
    use proptest::prelude::*;

    fn svm_table(m_start: f64, m_stop: f64) -> CorrectionTable {
        let m_grid = StepRange::new(m_start, m_stop, 0.001).values().unwrap();
        let guesses = StepRange::new(1.0, 5.0, 0.01).values().unwrap();
        build_correction_table(&m_grid, &guesses, &TableConfig::new(Injection::SpaceVector)).unwrap()
    }

    #[test]
    fn test_linearize_zero_at_linear_ratio() {
        assert!(linearize(LINEAR_COEFFICIENT * 0.5, 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_quantize_full_scale() {
        let (scale, codes) = quantize(&[0.1, 0.5, 1.0, 2.0]);
        assert_eq!(scale, 2.0);
        assert_eq!(codes, vec![13, 64, 128, 255]);
    }

    #[test]
    fn test_quantize_empty() {
        let (scale, codes) = quantize(&[]);
        assert_eq!(scale, 0.0);
        assert!(codes.is_empty());
    }

    #[test]
    fn test_linear_grid_is_filtered() {
        // Every root below M ≈ 0.9069 is in the linear region for SVM
        let table = svm_table(0.880, 0.900);
        assert!(table.is_empty());
        assert_eq!(table.linear_filtered, 21);
        assert!(table.unsolved.is_empty());
        assert_eq!(table.voltage_coefficient(0.89), LINEAR_COEFFICIENT);
    }

    #[test]
    fn test_overmodulation_table() {
        let table = svm_table(0.900, 0.960);
        assert!(table.unsolved.is_empty());
        assert_eq!(table.m_start().map(|m| (m * 1000.0).round()), Some(907.0));
        assert_eq!(table.rows.last().map(|row| row.code), Some(255));

        for pair in table.rows.windows(2) {
            assert!(pair[0].m < pair[1].m);
            assert!(pair[0].a <= pair[1].a);
            assert!(pair[0].code <= pair[1].code);
        }
        let max = table.rows.iter().map(|row| row.code).max();
        assert_eq!(max, Some(255));
    }

    #[test]
    fn test_decoded_coefficient_tracks_solution() {
        let table = svm_table(0.907, 0.950);
        for row in &table.rows {
            let exact = row.a / row.m;
            let decoded = table.voltage_coefficient(row.m);
            // One code step of the cubed scale bounds the round-trip error
            let step = 3.0 * table.scale.powi(3) / CODE_FULL_SCALE;
            assert!((decoded - exact).abs() <= step, "m = {}: {} vs {}", row.m, decoded, exact);
        }
        assert_eq!(table.voltage_coefficient(0.5), LINEAR_COEFFICIENT);
        let last = table.rows.last().unwrap();
        assert_eq!(table.voltage_coefficient(0.999), table.voltage_coefficient(last.m));
        assert!((table.modulation_index(0.5) - 0.5 * LINEAR_COEFFICIENT).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_across_dropped_point() {
        // 0.920 was dropped: targets in its slot use the row below
        let row = |m: f64, code: u8| CorrectionRow {
            m,
            a: m * LINEAR_COEFFICIENT,
            correction: 0.0,
            code,
        };
        let table = CorrectionTable {
            injection: Injection::SpaceVector,
            boundary: BoundaryPoint::new(3f64.sqrt() / 2.0),
            rows: vec![row(0.910, 10), row(0.930, 200), row(0.940, 255)],
            scale: 1.0,
            unsolved: vec![0.920],
            linear_filtered: 0,
        };
        let coefficient = |code| LINEAR_COEFFICIENT + delinearize(code, 1.0);

        assert_eq!(table.voltage_coefficient(0.9099), LINEAR_COEFFICIENT);
        assert_eq!(table.voltage_coefficient(0.910), coefficient(10));
        assert_eq!(table.voltage_coefficient(0.925), coefficient(10));
        assert_eq!(table.voltage_coefficient(0.930), coefficient(200));
        assert_eq!(table.voltage_coefficient(0.999), coefficient(255));
    }

    proptest! {
        #[test]
        fn test_quantize_bounds(corrections in prop::collection::vec(0.0f64..10.0, 1..64)) {
            let (scale, codes) = quantize(&corrections);
            prop_assert_eq!(codes.len(), corrections.len());
            if scale > 0.0 {
                let argmax = corrections
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i)
                    .unwrap();
                prop_assert_eq!(codes[argmax], 255);
            }
        }
    }
}
