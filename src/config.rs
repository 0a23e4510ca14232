use std::sync::Arc;

use opentelemetry::global::BoxedTracer;
use serde::Deserialize;

/// Port used for peers that don't name one explicitly.
pub const DEFAULT_CLUSTER_PORT: u16 = 12345;

/// Construction input for [`new_peer_discovery`](crate::new_peer_discovery).
///
/// At most one of `join_peers` and `discover_peers` may be set. Setting
/// neither is valid and means this node is a seed node.
#[derive(Clone, Default)]
pub struct Options {
    /// Static peers: `host`, `host:port`, or a literal IP.
    pub join_peers: Vec<String>,
    /// Discovery directive, e.g. `provider=dns name=agents.svc`. Empty means unused.
    pub discover_peers: String,
    /// Port appended to peers that omit one.
    pub default_port: u16,
    /// Receives log events emitted during discovery. Required.
    pub logger: Option<tracing::Dispatch>,
    /// Used to emit spans. Required.
    pub tracer: Option<Arc<BoxedTracer>>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("join_peers", &self.join_peers)
            .field("discover_peers", &self.discover_peers)
            .field("default_port", &self.default_port)
            .field("logger", &self.logger.is_some())
            .field("tracer", &self.tracer.is_some())
            .finish()
    }
}

/// User-facing discovery settings.
///
/// The consumer loads this however they want (TOML, flags, env); it carries
/// no capabilities. Attach them with [`into_options`](Self::into_options).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Static peer addresses.
    pub join_peers: Vec<String>,
    /// Discovery directive for dynamic lookup.
    pub discover_peers: String,
    /// Port for peers given without one.
    pub default_port: u16,
    /// How often the discovery task re-resolves peers (seconds).
    pub poll_interval_secs: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            join_peers: Vec::new(),
            discover_peers: String::new(),
            default_port: DEFAULT_CLUSTER_PORT,
            poll_interval_secs: 5,
        }
    }
}

impl DiscoverySettings {
    /// Split a comma-separated address list (the command-line flag form).
    ///
    /// Surrounding whitespace is trimmed and empty items are dropped, so
    /// `""` yields no peers.
    pub fn parse_join_addresses(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }

    /// Attach the logger and tracer capabilities.
    pub fn into_options(self, logger: tracing::Dispatch, tracer: Arc<BoxedTracer>) -> Options {
        Options {
            join_peers: self.join_peers,
            discover_peers: self.discover_peers,
            default_port: self.default_port,
            logger: Some(logger),
            tracer: Some(tracer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = DiscoverySettings::default();
        assert!(settings.join_peers.is_empty());
        assert!(settings.discover_peers.is_empty());
        assert_eq!(settings.default_port, 12345);
        assert_eq!(settings.poll_interval().as_secs(), 5);
    }

    #[test]
    fn test_parse_join_addresses() {
        assert_eq!(
            DiscoverySettings::parse_join_addresses(" a:1, b ,,10.0.0.1 "),
            vec!["a:1", "b", "10.0.0.1"]
        );
        assert!(DiscoverySettings::parse_join_addresses("").is_empty());
        assert!(DiscoverySettings::parse_join_addresses(" , ").is_empty());
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: DiscoverySettings =
            serde_json::from_str(r#"{"join_peers": ["node-2:7946"], "default_port": 7946}"#)
                .unwrap();
        assert_eq!(settings.join_peers, vec!["node-2:7946"]);
        assert_eq!(settings.default_port, 7946);
        assert_eq!(settings.poll_interval_secs, 5);
        assert!(settings.discover_peers.is_empty());
    }

    #[test]
    fn test_into_options_sets_capabilities() {
        let options = DiscoverySettings::default().into_options(
            tracing::Dispatch::none(),
            Arc::new(opentelemetry::global::tracer("test")),
        );
        assert!(options.logger.is_some());
        assert!(options.tracer.is_some());
        assert_eq!(options.default_port, 12345);
    }
}
