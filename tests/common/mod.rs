//! Shared test helpers for discovery integration tests.
//!
//! Provides capability fixtures (logger and tracer) and an `Options` builder
//! with both filled in.

// Each test binary compiles this module independently and only uses a subset
// of exports, so unused items are expected.
#![allow(dead_code)]

use std::sync::Arc;

use cluster_discovery::Options;
use opentelemetry::global::BoxedTracer;

/// A logger that writes through the libtest capture.
pub fn test_logger() -> tracing::Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::Dispatch::new(subscriber)
}

/// A tracer backed by the global provider, which is a no-op unless one is
/// installed.
pub fn test_tracer() -> Arc<BoxedTracer> {
    Arc::new(opentelemetry::global::tracer("cluster-discovery-tests"))
}

/// Options with both capabilities set and the given join peers.
pub fn static_options(join_peers: &[&str], default_port: u16) -> Options {
    Options {
        join_peers: join_peers.iter().map(|p| p.to_string()).collect(),
        default_port,
        logger: Some(test_logger()),
        tracer: Some(test_tracer()),
        ..Options::default()
    }
}

/// Options with both capabilities set and the given discovery directive.
pub fn dynamic_options(directive: &str, default_port: u16) -> Options {
    Options {
        discover_peers: directive.to_string(),
        default_port,
        logger: Some(test_logger()),
        tracer: Some(test_tracer()),
        ..Options::default()
    }
}

/// Build a static discovery handle and resolve once.
pub async fn resolve_static(
    join_peers: &[&str],
    default_port: u16,
) -> Result<Vec<String>, cluster_discovery::ResolutionError> {
    let disc = cluster_discovery::new_peer_discovery(static_options(join_peers, default_port))
        .unwrap()
        .expect("static peers should select a strategy");
    disc.discover_peers().await
}
