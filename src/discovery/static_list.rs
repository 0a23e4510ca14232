//! Static peer list discovery.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tracing::debug;

use crate::error::ResolutionError;

/// Static peer list discovery.
///
/// Entries that already carry a port are passed through untouched, without a
/// DNS lookup. Bare hosts and IPs get the default port and are resolved, and
/// only the first address of that lookup is kept.
///
/// Only the first entry of the list is ever consulted: if it resolves, the
/// remaining entries are ignored, and if it fails, the call fails.
#[derive(Debug, Clone)]
pub struct StaticList {
    peer_addrs: Arc<[String]>,
    default_port: u16,
}

impl StaticList {
    pub fn new(peer_addrs: Vec<String>, default_port: u16) -> Self {
        Self {
            peer_addrs: peer_addrs.into(),
            default_port,
        }
    }

    /// Configured join addresses, in order.
    pub fn peer_addrs(&self) -> &[String] {
        &self.peer_addrs
    }

    pub(crate) async fn discover(&self) -> Result<Vec<String>, ResolutionError> {
        let Some(addr) = self.peer_addrs.first() else {
            return Ok(Vec::new());
        };
        if self.peer_addrs.len() > 1 {
            debug!(
                addr = %addr,
                ignored = self.peer_addrs.len() - 1,
                "using only the first cluster join address"
            );
        }

        if split_host_port(addr).is_some() {
            debug!(addr = %addr, "found a host:port cluster join address");
            return Ok(vec![addr.clone()]);
        }

        let resolved = resolve_host(addr, self.default_port).await?;
        debug!(addr = %addr, resolved = %resolved, "resolved cluster join address");
        Ok(vec![resolved])
    }
}

/// Split `host:port` or `[host]:port` into its parts.
///
/// Purely lexical: neither part is validated. Returns `None` when there is no
/// port separator, which includes unbracketed IPv6 literals such as `::1`.
pub fn split_host_port(addr: &str) -> Option<(&str, &str)> {
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        let port = after.strip_prefix(':')?;
        if port.contains(':') {
            return None;
        }
        return Some((host, port));
    }

    let (host, port) = addr.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host, port))
}

/// Resolve a bare host to `ip:port`, keeping the first address found.
async fn resolve_host(host: &str, port: u16) -> Result<String, ResolutionError> {
    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = unbracketed.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port).to_string());
    }

    let mut addrs = tokio::net::lookup_host((unbracketed, port))
        .await
        .map_err(|source| ResolutionError::Lookup {
            host: host.to_string(),
            source,
        })?;

    addrs
        .next()
        .map(|addr| addr.to_string())
        .ok_or_else(|| ResolutionError::Lookup {
            host: host.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such host"),
        })
}
