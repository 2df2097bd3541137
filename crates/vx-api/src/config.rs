//! API server configuration.

use anyhow::Context;
use serde::Deserialize;
use vx_nlu::NluConfig;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Model, threshold and backend settings.
    #[serde(default)]
    pub nlu: NluConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ApiConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }

    /// File config (or defaults) with environment overrides on top.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.overlay(|key| std::env::var(key).ok())
    }

    /// Apply `VX_HOST`, `VX_PORT` and the NLU overrides.
    pub fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(host) = var("VX_HOST") {
            self.host = host;
        }
        if let Some(port) = var("VX_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("invalid VX_PORT {port:?}"))?;
        }
        self.nlu = self.nlu.overlay(var)?;
        Ok(self)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            nlu: NluConfig::default(),
        }
    }
}
