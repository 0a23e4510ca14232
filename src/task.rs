//! Periodic peer discovery loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::instrument::WithSubscriber;
use tracing::{debug, warn};

use crate::discovery::PeerDiscovery;

/// Lower bound for the poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Re-resolve peers every `poll_interval` and publish the results.
///
/// The first resolution runs immediately. Failures are logged and the loop
/// carries on; the receiver keeps the last successful peer list. The task
/// exits once every receiver has been dropped.
pub fn spawn_discovery_task(
    discovery: PeerDiscovery,
    poll_interval: Duration,
) -> (JoinHandle<()>, watch::Receiver<Vec<String>>) {
    let (tx, rx) = watch::channel(Vec::new());
    let logger = discovery.logger().clone();
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);

    let handle = tokio::spawn(
        async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = tx.closed() => {
                        debug!("peer list receivers dropped, stopping discovery");
                        return;
                    }
                }

                match discovery.discover_peers().await {
                    Ok(peers) => {
                        tx.send_if_modified(|current| {
                            if *current == peers {
                                return false;
                            }
                            debug!(peers = ?peers, "discovered peers changed");
                            *current = peers;
                            true
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "Peer discovery failed");
                    }
                }
            }
        }
        .with_subscriber(logger),
    );

    (handle, rx)
}
