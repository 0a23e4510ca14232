//! DNS-based peer discovery.
//!
//! Resolves a discovery directive against DNS on every call. Answers are not
//! cached by the resolver, so each poll observes the current record set.

use std::net::SocketAddr;
use std::sync::Arc;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::rdata::SRV;
use hickory_resolver::Resolver;
use tracing::{debug, info};

use super::directive::{Directive, Provider};
use crate::error::{ConfigError, ResolutionError};

/// DNS-based peer discovery.
#[derive(Clone)]
pub struct DnsDiscovery {
    directive: Arc<Directive>,
    default_port: u16,
    resolver: Resolver<TokioConnectionProvider>,
}

impl std::fmt::Debug for DnsDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsDiscovery")
            .field("directive", &self.directive)
            .field("default_port", &self.default_port)
            .finish_non_exhaustive()
    }
}

impl DnsDiscovery {
    /// Parse `raw` and build the resolver it needs.
    ///
    /// Uses the system resolver configuration unless the directive names a
    /// `nameserver`.
    pub fn new(raw: &str, default_port: u16) -> Result<Self, ConfigError> {
        let directive: Directive = raw.parse()?;

        let mut builder = match directive.nameserver {
            Some(ns) => {
                let group = NameServerConfigGroup::from_ips_clear(&[ns.ip()], ns.port(), true);
                Resolver::builder_with_config(
                    ResolverConfig::from_parts(None, vec![], group),
                    TokioConnectionProvider::default(),
                )
            }
            None => {
                Resolver::<TokioConnectionProvider>::builder_tokio().map_err(ConfigError::Backend)?
            }
        };

        let opts = builder.options_mut();
        opts.cache_size = 0;
        if let Some(timeout) = directive.timeout {
            opts.timeout = timeout;
            opts.attempts = 1;
        }
        let resolver = builder.build();

        info!(
            provider = %directive.provider,
            name = %directive.name,
            nameserver = ?directive.nameserver,
            "DNS peer discovery initialized"
        );

        Ok(Self {
            directive: Arc::new(directive),
            default_port,
            resolver,
        })
    }

    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    pub(crate) async fn discover(&self) -> Result<Vec<String>, ResolutionError> {
        let peers = match self.directive.provider {
            Provider::Dns => self.lookup_ips().await?,
            Provider::Srv => self.lookup_srv().await?,
        };

        if peers.is_empty() {
            return Err(ResolutionError::NoRecords {
                name: self.directive.name.clone(),
            });
        }

        debug!(
            provider = %self.directive.provider,
            name = %self.directive.name,
            peers = peers.len(),
            "DNS discovery completed"
        );
        Ok(peers)
    }

    async fn lookup_ips(&self) -> Result<Vec<String>, ResolutionError> {
        let name = &self.directive.name;
        let port = self.directive.port.unwrap_or(self.default_port);

        let ips = self
            .resolver
            .lookup_ip(name.as_str())
            .await
            .map_err(|source| ResolutionError::Dns {
                name: name.clone(),
                source,
            })?;

        Ok(ips
            .iter()
            .map(|ip| SocketAddr::new(ip, port).to_string())
            .collect())
    }

    async fn lookup_srv(&self) -> Result<Vec<String>, ResolutionError> {
        let name = &self.directive.name;

        let records = self
            .resolver
            .srv_lookup(name.as_str())
            .await
            .map_err(|source| ResolutionError::Dns {
                name: name.clone(),
                source,
            })?;

        Ok(records.iter().filter_map(srv_peer).collect())
    }
}

/// Render an SRV record as `target:port`.
///
/// A root target (`.`) means the service is not available there, so the
/// record yields no peer.
fn srv_peer(srv: &SRV) -> Option<String> {
    let target = srv.target();
    if target.is_root() {
        debug!(port = srv.port(), "skipping SRV record with root target");
        return None;
    }
    let target = target.to_utf8();
    Some(format!("{}:{}", target.trim_end_matches('.'), srv.port()))
}
