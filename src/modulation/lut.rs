// Reference waveform table for the firmware PWM generator
//
// One electrical period sampled at `len` points and scaled to int16.

use core::f64::consts::TAU;

use super::Injection;

/// Sample `injection` over one period. Values truncate toward zero.
pub fn reference_lut(injection: Injection, len: usize, amplitude: f64) -> Vec<i16> {
    (0..len)
        .map(|k| {
            let theta = k as f64 / len as f64 * TAU;
            (injection.sample(theta) * amplitude).trunc() as i16
        })
        .collect()
}
