// Live monitor binary: syncs channels from the sample log backend and
// logs spectrum/band summaries once a second until interrupted.

use anyhow::{Context, Result};
use eeglive_core::{
    Channel, HttpRangeQuery, LiveSyncClient, Mode, ModeController, RangeQuery, SyncConfig,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let base_url =
        std::env::var("EEGLIVE_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let config = SyncConfig::from_env();

    log::info!("connecting to sample log at {}", base_url);

    let query: Arc<dyn RangeQuery> =
        Arc::new(HttpRangeQuery::new(&base_url).context("failed to build range query client")?);
    let client = Arc::new(LiveSyncClient::new(query, config));
    let controller = ModeController::new(Arc::clone(&client), Channel::ALL.to_vec());

    controller
        .set_mode(Mode::Live)
        .await
        .context("failed to start live session")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupt received, shutting down");
                break;
            }
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                report(&controller, &client);
            }
        }
    }

    controller.set_mode(Mode::Static).await?;
    Ok(())
}

fn report(controller: &ModeController, client: &LiveSyncClient) {
    for channel in Channel::ALL {
        match controller.band_powers(channel) {
            Some(powers) => {
                let spectrum = controller.spectrum(channel);
                let peak_db = spectrum
                    .power_db
                    .iter()
                    .copied()
                    .filter(|p| p.is_finite())
                    .fold(f64::NEG_INFINITY, f64::max);
                log::info!(
                    "channel {}: alpha={:.3} beta={:.3} delta={:.3} theta={:.3} gamma={:.3} peak={:.1} dB",
                    channel,
                    powers.alpha,
                    powers.beta,
                    powers.delta,
                    powers.theta,
                    powers.gamma,
                    peak_db,
                );
            }
            None => log::info!("channel {}: waiting for data", channel),
        }
    }

    match serde_json::to_string(&client.stats()) {
        Ok(stats) => log::debug!("sync stats: {}", stats),
        Err(e) => log::warn!("failed to encode stats: {}", e),
    }
}
