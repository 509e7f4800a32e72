use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
    pub advisor_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: std::env::var("LAWSQUAD_MODEL").ok(),
            advisor_timeout_secs: std::env::var("LAWSQUAD_ADVISOR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// File values win; env fills the gaps.
    pub fn merged_over_env(self) -> Self {
        let env = Self::from_env();
        Self {
            gemini_api_key: self.gemini_api_key.or(env.gemini_api_key),
            model: self.model.or(env.model),
            advisor_timeout_secs: self.advisor_timeout_secs.or(env.advisor_timeout_secs),
        }
    }
}
