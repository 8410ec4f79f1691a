// Mode controller - selects between static replay and live sync
//
// Two states, one transition trigger. Switching into Live stops any
// prior session and starts a fresh one (which resets every cursor and
// buffer); switching into Static stops the session and downstream reads
// fall back to the loaded pre-recorded dataset. Re-entering the current
// mode is a no-op.

use crate::dataset::StaticDataset;
use crate::spectral::{self, band_powers, power_spectrum, BandPowers, Spectrum, DEFAULT_SAMPLE_RATE};
use crate::sync::client::LiveSyncClient;
use crate::sync::types::{Channel, SyncResult};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Static,
    Live,
}

pub struct ModeController {
    client: Arc<LiveSyncClient>,
    channels: Vec<Channel>,
    mode: RwLock<Mode>,
    dataset: RwLock<Option<Arc<StaticDataset>>>,
}

impl ModeController {
    /// Starts in Static mode with no dataset loaded
    pub fn new(client: Arc<LiveSyncClient>, channels: Vec<Channel>) -> Self {
        Self {
            client,
            channels,
            mode: RwLock::new(Mode::Static),
            dataset: RwLock::new(None),
        }
    }

    pub fn mode(&self) -> Mode {
        *self.mode.read()
    }

    /// Install the pre-recorded dataset served while in Static mode
    pub fn set_static_dataset(&self, dataset: StaticDataset) {
        *self.dataset.write() = Some(Arc::new(dataset));
    }

    /// Transition to `mode`. Re-entering the same mode is a no-op.
    pub async fn set_mode(&self, mode: Mode) -> SyncResult<()> {
        if *self.mode.read() == mode {
            return Ok(());
        }

        match mode {
            Mode::Live => {
                // Stop any prior session before starting fresh; start()
                // resets cursors/buffers and reports Starting status.
                self.client.stop();
                self.client.start(&self.channels).await?;
                log::info!("mode switched to Live");
            }
            Mode::Static => {
                self.client.stop();
                log::info!("mode switched to Static");
            }
        }

        *self.mode.write() = mode;
        Ok(())
    }

    /// Current values for a channel from whichever source the mode
    /// selects: the live buffer snapshot, or the static dataset column.
    pub fn values(&self, channel: Channel) -> Vec<f64> {
        match self.mode() {
            Mode::Live => self.client.values(channel),
            Mode::Static => self
                .dataset
                .read()
                .as_ref()
                .map(|dataset| dataset.values(channel).to_vec())
                .unwrap_or_default(),
        }
    }

    /// Power spectrum over the current source's values
    pub fn spectrum(&self, channel: Channel) -> Spectrum {
        let values = spectral::finite(&self.values(channel));
        power_spectrum(&values, DEFAULT_SAMPLE_RATE)
    }

    /// Band powers over the current source's values; `None` while no
    /// usable data exists yet
    pub fn band_powers(&self, channel: Channel) -> Option<BandPowers> {
        band_powers(&self.values(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::sync::query::{LivePage, RangeQuery};
    use crate::sync::types::{SessionState, SyncResult};
    use async_trait::async_trait;

    /// Range query that always answers one fixed page, then empties
    struct FixedQuery;

    #[async_trait]
    impl RangeQuery for FixedQuery {
        async fn fetch(
            &self,
            _channel: Channel,
            since_id: i64,
            _limit: usize,
        ) -> SyncResult<LivePage> {
            if since_id > 0 {
                return Ok(LivePage {
                    points: vec![],
                    last_id: None,
                });
            }
            Ok(LivePage {
                points: vec![crate::sync::types::Sample {
                    id: 1,
                    ts: "t1".into(),
                    value: 0.5,
                }],
                last_id: Some(1),
            })
        }
    }

    fn controller() -> ModeController {
        let client = Arc::new(LiveSyncClient::new(Arc::new(FixedQuery), SyncConfig::default()));
        ModeController::new(client, vec![Channel::A3])
    }

    fn small_dataset() -> StaticDataset {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"UTC Timestamp,EEG Signal A3 (uV),EEG Signal A4 (uV)\nt0,10.5,0.0\nt1,11.2,0.0\nt2,10.8,0.0\n",
        )
        .unwrap();
        StaticDataset::load(file.path()).unwrap()
    }

    #[tokio::test]
    async fn reentering_current_mode_is_a_noop() {
        let controller = controller();
        assert_eq!(controller.mode(), Mode::Static);

        controller.set_mode(Mode::Static).await.unwrap();
        assert_eq!(controller.mode(), Mode::Static);
    }

    #[tokio::test]
    async fn live_then_static_stops_the_session() {
        let controller = controller();

        controller.set_mode(Mode::Live).await.unwrap();
        assert_eq!(controller.mode(), Mode::Live);
        assert!(matches!(
            controller.client.state(),
            SessionState::Starting | SessionState::Streaming { .. }
        ));

        controller.set_mode(Mode::Static).await.unwrap();
        assert_eq!(controller.mode(), Mode::Static);
        assert!(!controller.client.is_running());
    }

    #[tokio::test]
    async fn relive_starts_from_a_clean_session() {
        let controller = controller();

        controller.set_mode(Mode::Live).await.unwrap();
        controller.client.poll_once().await.unwrap();
        controller.set_mode(Mode::Static).await.unwrap();

        controller.set_mode(Mode::Live).await.unwrap();
        assert_eq!(controller.client.cursor(Channel::A3), Some(0));
        assert!(controller.client.snapshot(Channel::A3).is_empty());
        controller.client.stop();
    }

    #[tokio::test]
    async fn static_values_come_from_the_dataset() {
        let controller = controller();
        controller.set_static_dataset(small_dataset());

        assert_eq!(controller.values(Channel::A3), vec![10.5, 11.2, 10.8]);

        let powers = controller.band_powers(Channel::A3).unwrap();
        assert!((powers.alpha - 3.25).abs() < 1e-4);

        // Shorter than one window: valid "no usable spectrum" state
        assert!(!controller.spectrum(Channel::A3).has_signal());
    }

    #[tokio::test]
    async fn static_mode_without_dataset_reports_no_data() {
        let controller = controller();
        assert!(controller.values(Channel::A3).is_empty());
        assert!(controller.band_powers(Channel::A3).is_none());
    }
}
