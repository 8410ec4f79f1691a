// Frequency-domain summaries over channel buffer snapshots
//
// Both estimators are pure functions over an owned snapshot; nothing here
// caches derived values or touches sync state.

pub mod bands;
pub mod periodogram;

pub use bands::{band_powers, Band, BandPowers};
pub use periodogram::{power_spectrum, Spectrum, DEFAULT_SAMPLE_RATE};

/// Drop non-finite entries ahead of estimation
pub fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}
