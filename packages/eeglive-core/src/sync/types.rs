// Common types for the live sync module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while syncing against the sample log
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network-level failure reaching the range query service. Retryable.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success response status from the range query service. Retryable.
    #[error("server error: {0}")]
    Server(String),

    /// Response shape invalid (undecodable body, ids out of order,
    /// `last_id` inconsistent with the returned points).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// `start()` called while a session is already running
    #[error("session already active")]
    SessionAlreadyActive,

    /// `poll_once()` called with no active session
    #[error("no active session")]
    NoActiveSession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Static dataset parse failure
    #[error("parse error: {0}")]
    Parse(String),
}

/// A named, independently-ordered sample stream (one sensor lead).
///
/// Each channel has its own id space and cursor; ids are never compared
/// across channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    A3,
    A4,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::A3, Channel::A4];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::A3 => "A3",
            Channel::A4 => "A4",
        }
    }

    /// Column header carrying this channel's values in the static dataset
    pub fn column_name(&self) -> String {
        format!("EEG Signal {} (uV)", self.as_str())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A3" => Ok(Channel::A3),
            "A4" => Ok(Channel::A4),
            other => Err(SyncError::Parse(format!("unknown channel: {}", other))),
        }
    }
}

/// One scalar sensor reading, immutable once written to the log.
///
/// `id` is channel-scoped, monotonically increasing, and may have gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: i64,
    pub ts: String,
    pub value: f64,
}

/// Current state of a sync session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum SessionState {
    /// No session has been started
    Idle,

    /// Session created, no poll completed yet
    Starting,

    /// Session is polling and the most recent tick fully succeeded
    Streaming { started_at: f64 },

    /// The most recent tick had at least one failed channel. The session
    /// keeps polling; errors here are retryable, not fatal.
    Error { message: String },

    /// Session was stopped
    Stopped,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Counters describing a sync session
#[derive(Debug, Clone, Serialize, Default)]
pub struct SyncStats {
    pub polls_completed: u64,
    pub samples_ingested: u64,
    /// Total samples currently buffered across all channels
    pub buffered: usize,
    /// Most recent per-poll failure, if any
    pub last_error: Option<String>,
}
