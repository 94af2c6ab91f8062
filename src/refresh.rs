// refresh.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{cache::ControllerCache, config::RefreshSettings};

/// Start the periodic refresh job. It runs until `cancel` fires.
pub fn spawn(
    cache: Arc<ControllerCache>,
    settings: &RefreshSettings,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let period = Duration::from_secs(settings.interval_secs);
    tokio::spawn(refresh_task(cache, period, settings.full_rebuild, cancel))
}

async fn refresh_task(
    cache: Arc<ControllerCache>,
    period: Duration,
    full_rebuild: bool,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // startup already ran the first rebuild
    info!(?period, full_rebuild, "refresh task started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("refresh tick");
                cache.tick(full_rebuild).await;
            }
        }
    }

    info!("refresh task stopped");
}
