//! Resolution of the configured master address to something we can dial.

use async_trait::async_trait;
use tracing::warn;

use crate::{SeaweedError, SeaweedResult};

/// Turns a logical address into a concrete `host:port`.
///
/// Called before every request to the master so topology changes are picked
/// up without restarting the process.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, addr: &str) -> SeaweedResult<String>;
}

/// Uses the configured address as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

#[async_trait]
impl AddressResolver for PassthroughResolver {
    async fn resolve(&self, addr: &str) -> SeaweedResult<String> {
        Ok(addr.to_string())
    }
}

/// Resolves `host:port` through the system resolver and returns the first
/// socket address.
#[derive(Debug, Default, Clone, Copy)]
pub struct DnsResolver;

#[async_trait]
impl AddressResolver for DnsResolver {
    async fn resolve(&self, addr: &str) -> SeaweedResult<String> {
        let mut addrs = tokio::net::lookup_host(addr).await.map_err(|e| {
            warn!(addr = addr, error = %e, "error resolving seaweed address");
            SeaweedError::transport(format!("unable to resolve {}", addr), e)
        })?;
        addrs.next().map(|a| a.to_string()).ok_or_else(|| {
            warn!(addr = addr, "seaweed address resolved to no addresses");
            SeaweedError::transport(
                format!("no addresses for {}", addr),
                anyhow::anyhow!("empty dns answer"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_passthrough() {
        let addr = PassthroughResolver.resolve("seaweed-master:9333").await.unwrap();
        assert_eq!(addr, "seaweed-master:9333");
    }

    #[tokio::test]
    async fn test_dns_resolves_ip_literal() {
        let addr = DnsResolver.resolve("127.0.0.1:9333").await.unwrap();
        assert_eq!(addr, "127.0.0.1:9333");
    }

    #[tokio::test]
    async fn test_dns_rejects_missing_port() {
        let err = DnsResolver.resolve("127.0.0.1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
    }
}
