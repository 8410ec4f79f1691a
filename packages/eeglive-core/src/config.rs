// Sync client configuration

use crate::sync::buffer::DEFAULT_BUFFER_CAPACITY;

/// Polling cadence in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;
/// Maximum samples requested per range query
pub const DEFAULT_PAGE_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    pub page_limit: usize,
    pub buffer_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            page_limit: DEFAULT_PAGE_LIMIT,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl SyncConfig {
    /// Defaults overridden by `EEGLIVE_POLL_INTERVAL_MS`,
    /// `EEGLIVE_PAGE_LIMIT` and `EEGLIVE_BUFFER_CAPACITY` where set
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval_ms: env_or("EEGLIVE_POLL_INTERVAL_MS", defaults.poll_interval_ms),
            page_limit: env_or("EEGLIVE_PAGE_LIMIT", defaults.page_limit),
            buffer_capacity: env_or("EEGLIVE_BUFFER_CAPACITY", defaults.buffer_capacity),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.poll_interval_ms, 300);
        assert_eq!(config.page_limit, 200);
        assert_eq!(config.buffer_capacity, 600);
    }
}
