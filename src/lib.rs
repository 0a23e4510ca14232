//! cluster-discovery — decide which peers a clustered agent should dial.
//!
//! Turns discovery settings into a concrete list of `host:port` join targets
//! for a gossip membership layer, either from a static list of addresses or
//! from a DNS discovery directive.
//!
//! # Quick start
//!
//! 1. Build [`Options`] (or deserialize [`DiscoverySettings`] and call
//!    [`into_options`](DiscoverySettings::into_options)).
//! 2. Call [`new_peer_discovery`]. `None` means this node is a seed node.
//! 3. Call [`discover_peers`](PeerDiscovery::discover_peers) whenever a fresh
//!    peer list is needed, or let [`spawn_discovery_task`] poll for you.

pub mod config;
pub mod discovery;
pub mod error;

mod task;

pub use config::{DiscoverySettings, Options, DEFAULT_CLUSTER_PORT};
pub use discovery::{new_peer_discovery, PeerDiscovery, Strategy};
pub use error::{ConfigError, ResolutionError};
pub use task::spawn_discovery_task;
