//! CLI configuration, loadable from TOML or environment.

use anyhow::Context;
use serde::Deserialize;
use vx_nlu::NluConfig;

/// Top-level CLI configuration. Shares the `[nlu]` table with the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub nlu: NluConfig,
}

impl CliConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }

    /// File config (or defaults) with `VX_*` environment overrides on top.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.nlu = config.nlu.with_env_overrides()?;
        Ok(config)
    }
}
