use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::data::wallet::WalletProvider;
use crate::data::Bridge;

/// Background loop refreshing the wave count (and optionally the wave log)
/// for as long as the UI is mounted.
///
/// Each tick's reads run inline, so a slow network delays the next tick
/// instead of stacking up overlapping reads; ticks missed meanwhile are
/// skipped.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn start<W: WalletProvider>(
        bridge: Arc<Bridge<W>>,
        period: Duration,
        include_waves: bool,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                bridge.poll_once(include_waves).await;
            }
        });
        debug!(?period, include_waves, "Poll loop started");
        Self { handle }
    }

    /// Cancel the loop and wait until it has actually stopped. Once this
    /// returns, no tick can publish anything.
    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
        debug!("Poll loop stopped");
    }
}
