//! Windowed periodogram estimation
//!
//! A deliberately simplified estimator: segments of `fs` samples at 50%
//! overlap are mean-removed, Hann-windowed, and each bin's power is taken
//! from a single-frequency correlation pair rather than a full transform.
//! The output is a power-vs-bin summary, not a calibrated spectral
//! density. Downstream consumers depend on these exact numbers; do not
//! replace this with a real FFT/Welch estimator.

use serde::Serialize;
use std::f64::consts::PI;

/// Sampling rate of the deployed sensors, in Hz
pub const DEFAULT_SAMPLE_RATE: usize = 100;

/// Power-vs-frequency-bin estimate. `frequencies` and `power_db` are
/// aligned index-to-index and always `fs` entries long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub power_db: Vec<f64>,
}

impl Spectrum {
    /// False when every bin is `-inf`, i.e. the input was shorter than
    /// one window and there is no usable spectrum yet.
    pub fn has_signal(&self) -> bool {
        self.power_db.iter().any(|p| p.is_finite())
    }
}

/// Estimate the power spectrum of `signal` sampled at `fs` Hz.
///
/// Inputs shorter than one window produce an all-zero accumulator and
/// therefore `10*log10(0) = -inf` in every bin; callers treat that as
/// "no data yet" rather than a numeric error. Callers are expected to
/// filter non-finite values out of `signal` first.
pub fn power_spectrum(signal: &[f64], fs: usize) -> Spectrum {
    let window = fs;
    if window == 0 {
        return Spectrum {
            frequencies: vec![],
            power_db: vec![],
        };
    }

    let overlap = fs / 2;
    let step = window - overlap;
    let n = signal.len();

    let mut psd = vec![0.0f64; window];
    let mut start = 0usize;
    while start + window <= n {
        let segment = &signal[start..start + window];
        let mean = segment.iter().sum::<f64>() / window as f64;

        for (idx, &sample) in segment.iter().enumerate() {
            let hann = 0.5 - 0.5 * (2.0 * PI * idx as f64 / (window as f64 - 1.0)).cos();
            let windowed = (sample - mean) * hann;

            let phase = 2.0 * PI * idx as f64 / window as f64;
            let re = windowed * phase.cos();
            let im = windowed * phase.sin();
            psd[idx] += re * re + im * im;
        }

        start += step;
    }

    // n/window is computed in floating point and clamped at 1 so short
    // inputs are not amplified.
    let norm = (n as f64 / window as f64).max(1.0);
    let power_db = psd.iter().map(|&p| 10.0 * (p / norm).log10()).collect();
    let frequencies = (0..window).map(|k| k as f64).collect();

    Spectrum {
        frequencies,
        power_db,
    }
}
