//! Parsing of discovery directives.
//!
//! A directive is a space-separated list of `key=value` pairs with a
//! mandatory `provider` key:
//!
//! ```text
//! provider=dns name=agents.monitoring.svc.cluster.local port=7946
//! provider=srv name=_gossip._tcp.agents.example.com nameserver=10.0.0.2
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

const DNS_PORT: u16 = 53;

/// Lookup mechanism named by the `provider` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// A/AAAA lookup; peers use the directive's `port` or the default port.
    Dns,
    /// SRV lookup; peers use the port carried by each record.
    Srv,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Dns => f.write_str("dns"),
            Provider::Srv => f.write_str("srv"),
        }
    }
}

/// A validated discovery directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub provider: Provider,
    /// Record name to query.
    pub name: String,
    /// Port for discovered IPs (`dns` only).
    pub port: Option<u16>,
    /// Query this server instead of the system resolver configuration.
    pub nameserver: Option<SocketAddr>,
    /// Per-query timeout.
    pub timeout: Option<Duration>,
}

impl FromStr for Directive {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut pairs = BTreeMap::new();
        for token in raw.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                let reason = format!("expected key=value, got {token:?}");
                return Err(ConfigError::directive(raw, reason));
            };
            if key.is_empty() {
                return Err(ConfigError::directive(raw, format!("empty key in {token:?}")));
            }
            if pairs.insert(key, value).is_some() {
                return Err(ConfigError::directive(raw, format!("duplicate key {key:?}")));
            }
        }

        let provider = match pairs.remove("provider") {
            Some("dns") => Provider::Dns,
            Some("srv") => Provider::Srv,
            Some(other) => {
                return Err(ConfigError::directive(raw, format!("unknown provider {other:?}")))
            }
            None => return Err(ConfigError::directive(raw, "missing provider")),
        };

        let name = match pairs.remove("name") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(ConfigError::directive(raw, "missing name")),
        };

        let port = match pairs.remove("port") {
            Some(_) if provider == Provider::Srv => {
                return Err(ConfigError::directive(
                    raw,
                    "port is not supported by the srv provider",
                ))
            }
            Some(port) => match port.parse::<u16>() {
                Ok(port) => Some(port),
                Err(e) => {
                    let reason = format!("invalid port {port:?}: {e}");
                    return Err(ConfigError::directive(raw, reason));
                }
            },
            None => None,
        };

        let nameserver = match pairs.remove("nameserver") {
            Some(ns) => match parse_nameserver(ns) {
                Some(addr) => Some(addr),
                None => {
                    return Err(ConfigError::directive(raw, format!("invalid nameserver {ns:?}")))
                }
            },
            None => None,
        };

        let timeout = match pairs.remove("timeout") {
            Some(secs) => match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::directive(raw, format!("invalid timeout {secs:?}"))),
            },
            None => None,
        };

        if !pairs.is_empty() {
            let keys: Vec<&str> = pairs.keys().copied().collect();
            return Err(ConfigError::directive(raw, format!("unknown keys {keys:?}")));
        }

        Ok(Directive {
            provider,
            name,
            port,
            nameserver,
            timeout,
        })
    }
}

fn parse_nameserver(raw: &str) -> Option<SocketAddr> {
    raw.parse::<SocketAddr>()
        .ok()
        .or_else(|| raw.parse::<IpAddr>().ok().map(|ip| SocketAddr::new(ip, DNS_PORT)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(raw: &str) -> String {
        match raw.parse::<Directive>() {
            Err(ConfigError::InvalidDirective { reason, .. }) => reason,
            other => panic!("expected invalid directive for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_dns_directive() {
        let d: Directive = "provider=dns name=agents.svc port=7946 nameserver=10.0.0.2 timeout=3"
            .parse()
            .unwrap();
        assert_eq!(d.provider, Provider::Dns);
        assert_eq!(d.name, "agents.svc");
        assert_eq!(d.port, Some(7946));
        assert_eq!(d.nameserver, Some("10.0.0.2:53".parse().unwrap()));
        assert_eq!(d.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_parse_srv_directive() {
        let d: Directive = "  provider=srv   name=_gossip._tcp.example.com nameserver=[::1]:5353 "
            .parse()
            .unwrap();
        assert_eq!(d.provider, Provider::Srv);
        assert_eq!(d.name, "_gossip._tcp.example.com");
        assert_eq!(d.port, None);
        assert_eq!(d.nameserver, Some("[::1]:5353".parse().unwrap()));
        assert_eq!(d.timeout, None);
    }

    #[test]
    fn test_malformed_directives() {
        assert!(reason("some.service:something").contains("expected key=value"));
        assert!(reason("=dns").contains("empty key"));
        assert!(reason("provider=dns provider=srv name=a").contains("duplicate key"));
        assert!(reason("name=a").contains("missing provider"));
        assert!(reason("provider=aws name=a").contains("unknown provider"));
        assert!(reason("provider=dns").contains("missing name"));
        assert!(reason("provider=dns name=").contains("missing name"));
        assert!(reason("provider=dns name=a port=99999").contains("invalid port"));
        assert!(reason("provider=srv name=a port=80").contains("not supported"));
        assert!(reason("provider=dns name=a nameserver=dns.local").contains("invalid nameserver"));
        assert!(reason("provider=dns name=a timeout=0").contains("invalid timeout"));
        assert!(reason("provider=dns name=a region=eu tag=x").contains(r#"["region", "tag"]"#));
    }

    #[test]
    fn test_empty_directive_is_missing_provider() {
        assert!(reason("   ").contains("missing provider"));
    }
}
