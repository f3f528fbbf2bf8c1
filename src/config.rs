//! Configuration
//!
//! Endpoints, tile templates and interaction timings. Loaded from YAML,
//! then overridden from the environment (`.env` is honoured).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaprConfig {
    /// Base URL of the tile/bounds/detail API, without trailing slash
    pub api_base_url: String,
    /// Raster basemap tile template
    pub basemap_tiles: String,
    /// Raster label overlay template, painted above the data layer
    pub label_tiles: String,
    pub basemap_attribution: String,
    /// Cooldown of the zoom-driven style throttle
    pub throttle_ms: u64,
    /// Delay before the one-shot "stop comparison" signal clears
    pub comparison_reset_ms: u64,
    pub fit_padding_px: u32,
    pub fit_duration_initial_ms: u64,
    pub fit_duration_recenter_ms: u64,
    pub http_timeout_secs: u64,
    pub server_addr: String,
}

impl Default for MaprConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            basemap_tiles: "https://basemaps.cartocdn.com/light_nolabels/{z}/{x}/{y}.png".to_string(),
            label_tiles: "https://basemaps.cartocdn.com/light_only_labels/{z}/{x}/{y}.png".to_string(),
            basemap_attribution: "© OpenStreetMap contributors © CARTO".to_string(),
            throttle_ms: 100,
            comparison_reset_ms: 100,
            fit_padding_px: 50,
            fit_duration_initial_ms: 2000,
            fit_duration_recenter_ms: 1000,
            http_timeout_secs: 30,
            server_addr: "127.0.0.1:8787".to_string(),
        }
    }
}

impl MaprConfig {
    /// Read a YAML file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: MaprConfig = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// Defaults (or the file named by `MAPR_CONFIG`) with env overrides applied.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var("MAPR_CONFIG") {
            Ok(path) => {
                debug!("Loading config from {}", path);
                Self::load(path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MAPR_API_URL") {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(addr) = lookup("MAPR_SERVER_ADDR") {
            self.server_addr = addr;
        }
        if let Some(ms) = lookup("MAPR_THROTTLE_MS") {
            match ms.parse() {
                Ok(ms) => self.throttle_ms = ms,
                Err(_) => warn!("Ignoring non-numeric MAPR_THROTTLE_MS={}", ms),
            }
        }
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn comparison_reset(&self) -> Duration {
        Duration::from_millis(self.comparison_reset_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url: https://mapr.example/api\nthrottle_ms: 250").unwrap();

        let config = MaprConfig::load(file.path()).unwrap();
        assert_eq!(config.api_base_url, "https://mapr.example/api");
        assert_eq!(config.throttle(), Duration::from_millis(250));
        assert_eq!(config.fit_padding_px, 50);
        assert_eq!(config.fit_duration_initial_ms, 2000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MAPR_API_URL", "https://other.example/api/"),
            ("MAPR_THROTTLE_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = MaprConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://other.example/api");
        assert_eq!(config.throttle_ms, 100);
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "throttle_ms: [1, 2").unwrap();
        let err = MaprConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, crate::error::MaprError::Config(_)));
    }
}
