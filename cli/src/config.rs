use std::fs;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use socker_core::Classification;

/// Top-level TOML configuration, matching the source list's construction
/// surface plus per-source vendor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SockerConfig {
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_low_water_fraction")]
    pub low_water_fraction: f64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub sources: Vec<SourceConfig>,
}

fn default_pool_size() -> usize {
    20
}

fn default_low_water_fraction() -> f64 {
    0.3
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One entry per configured `ProxySource`, in fallback order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Oculus {
        tag: String,
        endpoint: String,
        auth_header_value: String,
        order_token: String,
        plan_type: String,
        #[serde(default)]
        country: Option<String>,
        #[serde(default)]
        enable_socks5: bool,
        #[serde(default)]
        white_list_ip: Vec<String>,
        #[serde(default)]
        classification: Option<Classification>,
    },
    ProxyMesh {
        tag: String,
        host: String,
        port: u16,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },
}

impl SockerConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;
        Ok(config)
    }
}
