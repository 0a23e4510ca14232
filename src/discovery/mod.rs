//! Pluggable peer discovery strategies.
//!
//! - **Static**: Uses a fixed list of join addresses from configuration.
//! - **DNS**: Resolves a discovery directive (A/AAAA or SRV) on every call.
//!
//! [`new_peer_discovery`] validates [`Options`] once at startup and picks a
//! strategy. The returned [`PeerDiscovery`] resolves live each time
//! [`discover_peers`](PeerDiscovery::discover_peers) is called.

mod directive;
mod dns;
mod static_list;

pub use directive::{Directive, Provider};
pub use dns::DnsDiscovery;
pub use static_list::{split_host_port, StaticList};

use std::sync::Arc;

use opentelemetry::global::BoxedTracer;
use opentelemetry::trace::{Span as _, Status, Tracer as _};
use opentelemetry::KeyValue;
use tracing::info;
use tracing::instrument::WithSubscriber;

use crate::config::Options;
use crate::error::{ConfigError, ResolutionError};

/// Peer discovery strategy.
#[derive(Debug, Clone)]
pub enum Strategy {
    Static(StaticList),
    Dns(DnsDiscovery),
}

impl Strategy {
    /// Short label used in logs and span attributes.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Static(_) => "static",
            Strategy::Dns(_) => "dns",
        }
    }

    async fn discover(&self) -> Result<Vec<String>, ResolutionError> {
        match self {
            Strategy::Static(d) => d.discover().await,
            Strategy::Dns(d) => d.discover().await,
        }
    }
}

/// A validated discovery strategy together with its logger and tracer.
///
/// Cloning is cheap and clones share nothing mutable, so a handle can be
/// called from several tasks at once.
#[derive(Clone)]
pub struct PeerDiscovery {
    strategy: Strategy,
    logger: tracing::Dispatch,
    tracer: Arc<BoxedTracer>,
}

impl std::fmt::Debug for PeerDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerDiscovery")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl PeerDiscovery {
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub(crate) fn logger(&self) -> &tracing::Dispatch {
        &self.logger
    }

    /// Discover current cluster peers as `host:port` strings.
    ///
    /// Every call resolves from scratch. A call either returns the full list
    /// or fails; there is no retry here.
    pub async fn discover_peers(&self) -> Result<Vec<String>, ResolutionError> {
        let mut span = self.tracer.start("cluster.discover_peers");
        span.set_attribute(KeyValue::new("discovery.strategy", self.strategy.name()));

        let result = self
            .strategy
            .discover()
            .with_subscriber(self.logger.clone())
            .await;

        match &result {
            Ok(peers) => {
                span.set_attribute(KeyValue::new("discovery.peer_count", peers.len() as i64));
            }
            Err(e) => span.set_status(Status::error(e.to_string())),
        }
        span.end();

        result
    }
}

/// Validate `opts` and select a discovery strategy.
///
/// Returns `Ok(None)` when neither join peers nor a discovery directive is
/// set: this node is a seed node and callers should skip discovery.
pub fn new_peer_discovery(opts: Options) -> Result<Option<PeerDiscovery>, ConfigError> {
    let Options {
        join_peers,
        discover_peers,
        default_port,
        logger,
        tracer,
    } = opts;

    let logger = logger.ok_or(ConfigError::MissingLogger)?;
    let tracer = tracer.ok_or(ConfigError::MissingTracer)?;
    if !join_peers.is_empty() && !discover_peers.is_empty() {
        return Err(ConfigError::ConflictingModes {
            join_peers,
            discover_peers,
        });
    }

    let strategy = tracing::dispatcher::with_default(&logger, || {
        if !join_peers.is_empty() {
            info!(peers = ?join_peers, default_port, "static peer discovery initialized");
            Ok(Some(Strategy::Static(StaticList::new(join_peers, default_port))))
        } else if !discover_peers.is_empty() {
            DnsDiscovery::new(&discover_peers, default_port).map(|d| Some(Strategy::Dns(d)))
        } else {
            info!("no join peers or discovery directive configured, running as a seed node");
            Ok(None)
        }
    })?;

    Ok(strategy.map(|strategy| PeerDiscovery {
        strategy,
        logger,
        tracer,
    }))
}
