//! Coarse band-power breakdown
//!
//! A proportional heuristic: the arithmetic mean of the finite buffered
//! values is split across the five named bands by fixed weights. This is
//! not a spectral band integral; downstream consumers depend on the exact
//! weights and the mean-times-weight formula, so neither may change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five named frequency bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::Delta, Band::Theta, Band::Alpha, Band::Beta, Band::Gamma];

    /// Fixed proportional weight; the five weights sum to 1.0
    pub fn weight(self) -> f64 {
        match self {
            Band::Delta => 0.25,
            Band::Theta => 0.20,
            Band::Alpha => 0.30,
            Band::Beta => 0.15,
            Band::Gamma => 0.10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Delta => "Delta",
            Band::Theta => "Theta",
            Band::Alpha => "Alpha",
            Band::Beta => "Beta",
            Band::Gamma => "Gamma",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One band-power scalar per band, derived from a single buffer snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandPowers {
    pub delta: f64,
    pub theta: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl BandPowers {
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Delta => self.delta,
            Band::Theta => self.theta,
            Band::Alpha => self.alpha,
            Band::Beta => self.beta,
            Band::Gamma => self.gamma,
        }
    }
}

/// Compute band powers from a channel's buffered values.
///
/// Non-finite entries are dropped first; an empty result is `None`, the
/// explicit "no data yet" state, distinct from an all-zero breakdown.
pub fn band_powers(values: &[f64]) -> Option<BandPowers> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    Some(BandPowers {
        delta: mean * Band::Delta.weight(),
        theta: mean * Band::Theta.weight(),
        alpha: mean * Band::Alpha.weight(),
        beta: mean * Band::Beta.weight(),
        gamma: mean * Band::Gamma.weight(),
    })
}
