//! Overmodulation linearity correction tables for three-phase PWM drives.
//!
//! Beyond the linear region the fundamental output of a clipped reference
//! no longer grows in proportion to the modulation index A. This crate
//! solves, for each target fundamental M, the index A that produces it and
//! packs the correction `A/M − 4/π` into an 8-bit table for the firmware.

pub mod config;
pub mod error;
pub mod modulation;
pub mod numeric;
pub mod output;

pub use config::{StepRange, TableConfig};
pub use error::ModulationError;
pub use modulation::{build_correction_table, compute_boundary, CorrectionTable, Injection};
