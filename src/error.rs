//! Error types for discovery construction and resolution.

use thiserror::Error;

/// Invalid or contradictory configuration, detected when building a
/// [`PeerDiscovery`](crate::PeerDiscovery).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("logger is required, got nil")]
    MissingLogger,
    #[error("tracer is required, got nil")]
    MissingTracer,
    #[error(
        "at most one of join peers and discover peers may be set, \
         got join peers {join_peers:?} and discover peers {discover_peers:?}"
    )]
    ConflictingModes {
        join_peers: Vec<String>,
        discover_peers: String,
    },
    #[error("invalid discovery directive {directive:?}: {reason}")]
    InvalidDirective { directive: String, reason: String },
    #[error("failed to initialize DNS resolver: {0}")]
    Backend(#[source] hickory_resolver::ResolveError),
}

impl ConfigError {
    pub(crate) fn directive(directive: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidDirective {
            directive: directive.to_string(),
            reason: reason.into(),
        }
    }
}

/// A lookup failed while resolving peers. Returned from
/// [`PeerDiscovery::discover_peers`](crate::PeerDiscovery::discover_peers).
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("lookup {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("lookup {name}: {source}")]
    Dns {
        name: String,
        #[source]
        source: hickory_resolver::ResolveError,
    },
    #[error("lookup {name}: no records found")]
    NoRecords { name: String },
}
