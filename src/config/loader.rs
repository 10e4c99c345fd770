use crate::config::types::Config;
use anyhow::{Context, Result};
use log::{debug, trace, warn};
use std::path::Path;

impl Config {
    /// Load configuration from a file, writing out the defaults if it does not exist yet
    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());
        let config = if path.exists() {
            let content = tokio::fs::read_to_string(path).await.with_context(|| format!("Failed to read config file {}", path.display()))?;
            let mut cfg = serde_json::from_str::<Config>(&content).with_context(|| format!("Failed to parse config file {}", path.display()))?;
            cfg.path = path.to_owned();
            cfg
        } else {
            warn!("Config file not found, using default config");
            Self::save_default(path).await?;
            let mut cfg = Self::new(path);
            cfg.path = path.to_owned();
            cfg
        };
        trace!("Loaded config: {:#?}", config);
        Ok(config)
    }

    /// Save the current configuration to its file
    pub async fn save(&self) -> Result<()> {
        debug!("Saving config to: {}", self.path.display());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Save a default configuration to the specified path
    pub async fn save_default(path: impl AsRef<Path>) -> Result<()> {
        debug!("Saving default config to: {}", path.as_ref().display());
        let mut config = Self::new(path.as_ref());
        config.path = path.as_ref().to_owned();
        config.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("authpx.json");

        let config = Config::try_load(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.get_path(), path.as_path());
        assert_eq!(config, Config::try_load(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_loads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authpx.json");
        std::fs::write(&path, r#"{"listen": "0.0.0.0:9000", "upstream": "https://backend", "request_timeout_secs": 0}"#).unwrap();

        let config = Config::try_load(&path).await.unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.upstream, "https://backend");
        assert!(config.deadline().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authpx.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::try_load(&path).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
