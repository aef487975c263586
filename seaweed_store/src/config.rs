//! Seaweed client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{SeaweedError, SeaweedResult};

/// Configuration for a [`SeaweedClient`](crate::SeaweedClient).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeaweedConfig {
    /// Address of the seaweed master, e.g. `seaweed-master:9333`.
    #[serde(default)]
    pub master_addr: String,

    /// Resolve the master address through DNS before every request.
    #[serde(default)]
    pub resolve_dns: bool,

    /// Timeout applied to every HTTP request made by the default client.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl SeaweedConfig {
    pub fn new(master_addr: &str) -> Self {
        SeaweedConfig {
            master_addr: master_addr.to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> SeaweedResult<()> {
        if self.master_addr.trim().is_empty() {
            return Err(SeaweedError::config("seaweed master address is required"));
        }
        if self.master_addr.contains("://") {
            return Err(SeaweedError::config(format!(
                "seaweed master address must be host:port, got {}",
                self.master_addr
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_missing_master_addr() {
        let err = SeaweedConfig::default().validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = SeaweedConfig::new("   ").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_scheme_rejected() {
        let err = SeaweedConfig::new("http://master:9333").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_valid() {
        let config = SeaweedConfig {
            request_timeout_secs: Some(5),
            ..SeaweedConfig::new("master:9333")
        };
        config.validate().unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }
}
