// Live sync client - keeps per-channel buffers consistent with the
// sample log's tail
//
// The client manages:
// - Session lifecycle (start resets cursors/buffers, stop is idempotent)
// - A timer-driven polling task with graceful cancellation
// - Cursor-based pagination against the range query service
// - Per-channel failure isolation and status reporting

use crate::config::SyncConfig;
use crate::sync::buffer::ChannelBuffer;
use crate::sync::query::{LivePage, RangeQuery};
use crate::sync::types::{Channel, Sample, SessionState, SyncError, SyncResult, SyncStats};
use futures_util::future;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Per-channel state owned exclusively by one session
struct ChannelState {
    /// Highest sample id already appended to the buffer. Advances only
    /// past ids that were actually appended, so a retried poll can never
    /// re-ingest a sample.
    cursor: i64,
    buffer: ChannelBuffer,
}

/// One run of the live sync, from `start()` to `stop()`.
///
/// A fresh session is allocated on every start; in-flight responses from
/// a stopped session are gated on the cancellation token and can never
/// reach a newer session's state.
struct SyncSession {
    id: String,
    channels: Vec<Channel>,
    states: HashMap<Channel, RwLock<ChannelState>>,
    state: RwLock<SessionState>,
    started_at: f64,
    polls_completed: AtomicU64,
    samples_ingested: AtomicU64,
    last_error: RwLock<Option<String>>,
    cancel: CancellationToken,
}

impl SyncSession {
    fn new(channels: &[Channel], buffer_capacity: usize) -> Self {
        let states = channels
            .iter()
            .map(|&channel| {
                (
                    channel,
                    RwLock::new(ChannelState {
                        cursor: 0,
                        buffer: ChannelBuffer::new(buffer_capacity),
                    }),
                )
            })
            .collect();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channels: channels.to_vec(),
            states,
            state: RwLock::new(SessionState::Starting),
            started_at: chrono::Utc::now().timestamp() as f64,
            polls_completed: AtomicU64::new(0),
            samples_ingested: AtomicU64::new(0),
            last_error: RwLock::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// Merge one validated page into a channel's buffer and cursor.
    ///
    /// On any validation failure nothing is mutated; the poll is simply
    /// retried from the same cursor on the next tick.
    fn apply_page(&self, channel: Channel, page: LivePage) -> SyncResult<()> {
        if page.points.is_empty() {
            // Nothing new; cursor unchanged, not an error
            return Ok(());
        }

        let mut state = self
            .states
            .get(&channel)
            .ok_or_else(|| SyncError::Protocol(format!("untracked channel {}", channel)))?
            .write();

        let mut prev = state.cursor;
        for point in &page.points {
            if point.id <= prev {
                return Err(SyncError::Protocol(format!(
                    "ids not strictly ascending past cursor {}: saw {} after {}",
                    state.cursor, point.id, prev
                )));
            }
            prev = point.id;
        }

        let declared = page
            .last_id
            .ok_or_else(|| SyncError::Protocol("non-empty page without last_id".into()))?;
        if declared != prev {
            return Err(SyncError::Protocol(format!(
                "last_id {} does not match final returned id {}",
                declared, prev
            )));
        }

        let count = page.points.len();
        state.buffer.append(page.points);
        state.cursor = declared;
        drop(state);

        self.samples_ingested
            .fetch_add(count as u64, Ordering::Relaxed);
        log::debug!(
            "session {}: channel {} +{} samples, cursor={}",
            self.id,
            channel,
            count,
            declared
        );
        Ok(())
    }

    fn record_error(&self, message: String) {
        *self.state.write() = SessionState::Error {
            message: message.clone(),
        };
        *self.last_error.write() = Some(message);
    }

    fn mark_streaming(&self) {
        let mut state = self.state.write();
        if !matches!(*state, SessionState::Streaming { .. }) {
            *state = SessionState::Streaming {
                started_at: self.started_at,
            };
        }
    }
}

/// Cursor-based sync client over the range query service.
///
/// Owns at most one session at a time; all reads of channel data go
/// through owned snapshots of the session's buffers.
pub struct LiveSyncClient {
    query: Arc<dyn RangeQuery>,
    config: SyncConfig,
    session: RwLock<Option<Arc<SyncSession>>>,
}

impl LiveSyncClient {
    pub fn new(query: Arc<dyn RangeQuery>, config: SyncConfig) -> Self {
        Self {
            query,
            config,
            session: RwLock::new(None),
        }
    }

    /// Begin a session: cursors reset to 0, buffers empty. Fails with
    /// `SessionAlreadyActive` if called without an intervening `stop`.
    fn begin_session(&self, channels: &[Channel]) -> SyncResult<Arc<SyncSession>> {
        let mut slot = self.session.write();
        if slot.is_some() {
            return Err(SyncError::SessionAlreadyActive);
        }

        let session = Arc::new(SyncSession::new(channels, self.config.buffer_capacity));
        log::info!(
            "session {}: starting live sync for channels {:?}",
            session.id,
            channels
        );
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Start a session and its polling task.
    ///
    /// One tick polls every tracked channel concurrently, so tick latency
    /// is bounded by the slowest single round trip.
    pub async fn start(&self, channels: &[Channel]) -> SyncResult<()> {
        let session = self.begin_session(channels)?;

        let query = Arc::clone(&self.query);
        let page_limit = self.config.page_limit;
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        tokio::spawn(async move {
            // First poll fires one full interval after start, matching a
            // plain repeating timer
            let mut tick = interval_at(Instant::now() + poll_interval, poll_interval);
            loop {
                tokio::select! {
                    biased;

                    _ = session.cancel.cancelled() => {
                        log::info!("session {}: poll task cancelled", session.id);
                        break;
                    }

                    _ = tick.tick() => {
                        poll_session(&query, &session, page_limit).await;
                    }
                }
            }
        });

        Ok(())
    }

    /// Halt polling. Idempotent; a no-op when no session is active.
    pub fn stop(&self) {
        let session = self.session.write().take();
        if let Some(session) = session {
            session.cancel.cancel();
            *session.state.write() = SessionState::Stopped;
            log::info!("session {}: stopped", session.id);
        }
    }

    /// Poll every tracked channel once, outside the timer cadence.
    pub async fn poll_once(&self) -> SyncResult<()> {
        let session = self
            .session
            .read()
            .as_ref()
            .cloned()
            .ok_or(SyncError::NoActiveSession)?;
        poll_session(&self.query, &session, self.config.page_limit).await;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.session.read().is_some()
    }

    /// Current session state; `Idle` when no session exists
    pub fn state(&self) -> SessionState {
        self.session
            .read()
            .as_ref()
            .map(|s| s.state.read().clone())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> SyncStats {
        match self.session.read().as_ref() {
            Some(session) => SyncStats {
                polls_completed: session.polls_completed.load(Ordering::Relaxed),
                samples_ingested: session.samples_ingested.load(Ordering::Relaxed),
                buffered: session
                    .states
                    .values()
                    .map(|state| state.read().buffer.len())
                    .sum(),
                last_error: session.last_error.read().clone(),
            },
            None => SyncStats::default(),
        }
    }

    /// Last consumed id for a channel; `None` when the channel is not
    /// tracked by the active session
    pub fn cursor(&self, channel: Channel) -> Option<i64> {
        let slot = self.session.read();
        let session = slot.as_ref()?;
        session
            .states
            .get(&channel)
            .map(|state| state.read().cursor)
    }

    /// Owned copy of a channel's buffered samples, oldest first
    pub fn snapshot(&self, channel: Channel) -> Vec<Sample> {
        let slot = self.session.read();
        slot.as_ref()
            .and_then(|session| session.states.get(&channel))
            .map(|state| state.read().buffer.snapshot())
            .unwrap_or_default()
    }

    /// Owned copy of a channel's buffered values, oldest first
    pub fn values(&self, channel: Channel) -> Vec<f64> {
        let slot = self.session.read();
        slot.as_ref()
            .and_then(|session| session.states.get(&channel))
            .map(|state| state.read().buffer.values())
            .unwrap_or_default()
    }
}

impl Drop for LiveSyncClient {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut() {
            session.cancel.cancel();
        }
    }
}

/// One poll of every tracked channel. Failures are isolated per channel
/// and recorded as status; the session keeps running.
async fn poll_session(query: &Arc<dyn RangeQuery>, session: &Arc<SyncSession>, limit: usize) {
    let fetches = session.channels.iter().map(|&channel| {
        let since_id = session
            .states
            .get(&channel)
            .map(|state| state.read().cursor)
            .unwrap_or(0);
        async move { (channel, query.fetch(channel, since_id, limit).await) }
    });

    let results = future::join_all(fetches).await;

    // A response that lands after stop() must not touch session state
    if session.cancel.is_cancelled() {
        return;
    }

    let mut tick_error: Option<String> = None;
    for (channel, result) in results {
        let outcome = result.and_then(|page| session.apply_page(channel, page));
        if let Err(e) = outcome {
            log::warn!("session {}: channel {} poll failed: {}", session.id, channel, e);
            tick_error = Some(format!("channel {}: {}", channel, e));
        }
    }

    session.polls_completed.fetch_add(1, Ordering::Relaxed);
    match tick_error {
        Some(message) => session.record_error(message),
        None => session.mark_streaming(),
    }
}
