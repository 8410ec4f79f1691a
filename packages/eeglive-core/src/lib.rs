// eeglive-core: incremental sync and spectral summaries for live EEG
// sample streams
//
// The crate pairs a cursor-based sync client over an append-only,
// multi-channel sample log with a windowed periodogram estimator and a
// coarse band-power breakdown computed from bounded in-memory windows of
// the synced samples. A two-state mode controller switches the read path
// between the live session and a pre-recorded static dataset.

pub mod config;
pub mod controller;
pub mod dataset;
pub mod spectral;
pub mod sync;

pub use config::SyncConfig;
pub use controller::{Mode, ModeController};
pub use dataset::StaticDataset;
pub use spectral::{band_powers, power_spectrum, Band, BandPowers, Spectrum, DEFAULT_SAMPLE_RATE};
pub use sync::{
    Channel, ChannelBuffer, HttpRangeQuery, LivePage, LiveSyncClient, RangeQuery, Sample,
    SessionState, SyncError, SyncResult, SyncStats,
};
