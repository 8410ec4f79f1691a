// Incremental sync against the append-only sample log
//
// Architecture:
// - `types`: data model, error taxonomy, session status
// - `query`: trait seam over the range query service + HTTP implementation
// - `buffer`: bounded per-channel sample window
// - `client`: session lifecycle and the timer-driven polling loop

pub mod buffer;
pub mod client;
pub mod query;
pub mod types;

pub use buffer::{ChannelBuffer, DEFAULT_BUFFER_CAPACITY};
pub use client::LiveSyncClient;
pub use query::{HttpRangeQuery, LivePage, RangeQuery};
pub use types::{Channel, Sample, SessionState, SyncError, SyncResult, SyncStats};
