use std::{fmt::Debug, path::Path};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use seaweed_store::SeaweedConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub seaweed: SeaweedConfig,
    #[serde(default)]
    pub structured_logging: bool,
    /// Replication passed to assign when the command line doesn't set one.
    #[serde(default)]
    pub replication: Option<String>,
    /// TTL passed to assign and upload when the command line doesn't set one.
    #[serde(default)]
    pub ttl: Option<String>,
}

impl Config {
    /// Defaults, then the YAML file, then `WEEDCTL_*` environment variables,
    /// then `seaweed_addr` from the command line.
    pub fn load(path: Option<&Path>, seaweed_addr: Option<&str>) -> Result<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            let config_str = std::fs::read_to_string(path)
                .with_context(|| format!("unable to read config file {}", path.display()))?;
            figment = figment.merge(Yaml::string(&config_str));
        }
        figment = figment.merge(Env::prefixed("WEEDCTL_").split("__"));

        let mut config: Config = figment.extract()?;
        if let Some(addr) = seaweed_addr {
            config.seaweed.master_addr = addr.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.seaweed
            .validate()
            .context("--seaweed-addr or seaweed.master_addr is required")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "seaweed:\n  master_addr: master:9333\n  request_timeout_secs: 10\nstructured_logging: true\nttl: 1d"
        )
        .unwrap();

        let config = Config::load(Some(file.path()), None).unwrap();
        assert_eq!(config.seaweed.master_addr, "master:9333");
        assert_eq!(config.seaweed.request_timeout_secs, Some(10));
        assert!(config.structured_logging);
        assert_eq!(config.ttl.as_deref(), Some("1d"));
        assert_eq!(config.replication, None);
    }

    #[test]
    fn test_flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seaweed:\n  master_addr: master:9333").unwrap();

        let config = Config::load(Some(file.path()), Some("other:9333")).unwrap();
        assert_eq!(config.seaweed.master_addr, "other:9333");
    }

    #[test]
    fn test_missing_master_addr_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "structured_logging: false").unwrap();
        assert!(Config::load(Some(file.path()), None).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(Config::load(Some(&path), Some("master:9333")).is_err());
    }
}
