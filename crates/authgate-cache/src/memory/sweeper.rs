//! Background purge of expired in-memory entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use super::store::MemoryCacheProvider;

/// Periodically removes expired entries from a [`MemoryCacheProvider`].
#[derive(Debug)]
pub struct ExpirySweeper {
    provider: MemoryCacheProvider,
    interval: Duration,
}

impl ExpirySweeper {
    /// Create a sweeper that runs every `interval`.
    pub fn new(provider: MemoryCacheProvider, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// Run until the cancel signal is received.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.provider.purge_expired();
                }
            }
        }

        tracing::info!("Expiry sweeper stopped");
    }
}
