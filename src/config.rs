use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use anyhow::Result;
use regex::Regex;

/// Environment variable holding the downstream agent service base URL.
pub const AGENT_API_URL_ENV: &str = "ELIZA_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub relay_config: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL of the conversational agent service, e.g. `https://eliza.example`.
    #[serde(default)]
    pub agent_api_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            agent_api_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RelayConfig {
    /// The configured base URL, or `None` when unset or blank.
    pub fn base_url(&self) -> Option<&str> {
        self.agent_api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let raw = fs::read_to_string(path)?;
        let content = substitute_env(&raw, |name| std::env::var(name).ok());
        Self::parse(path, &content)
    }

    /// Parse already-substituted content, choosing the format by extension.
    fn parse(path: &str, content: &str) -> Result<Self> {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(content)?;
            Ok(config)
        }
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(AGENT_API_URL_ENV) {
            self.relay_config.agent_api_url = Some(url);
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.system_config.port = port;
        }
    }
}

/// Replace `${VAR_NAME}` placeholders. Unset variables become empty strings.
pub fn substitute_env<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").unwrap());
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}
