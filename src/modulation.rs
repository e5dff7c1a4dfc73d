// Overmodulation model
// Injected reference waveform, clipping boundary and the M → A inversion

pub mod boundary;
pub mod fundamental;
pub mod inverter;
pub mod lut;
pub mod table;
pub mod transforms;
pub mod waveform;

// Re-export main types for easier access
pub use boundary::{compute_boundary, BoundaryPoint};
pub use fundamental::{fundamental, fundamental_estimate};
pub use inverter::{residual, solve_for_m, Inverter, Region};
pub use lut::reference_lut;
pub use table::{build_correction_table, CorrectionRow, CorrectionTable, LINEAR_COEFFICIENT};
pub use waveform::{Injection, ThirdHarmonicRatio};
