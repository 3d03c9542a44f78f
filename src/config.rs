//! Top-level application configuration.
//!
//! Configuration is stored in `.rifa/config.yaml` and includes:
//! - Raffle API base URL and request timeout
//! - The acting user for purchases
//! - Grid defaults and purchase behavior

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RifaError};
use crate::grid::zoom::ZoomLevel;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_PROOF_URL: &str = "proof";

/// Keys accepted by `config get` / `config set`
pub const VALID_KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout",
    "user.id",
    "grid.zoom",
    "purchase.proof_url",
    "purchase.revalidate",
];

/// Returns the root rifa directory path.
///
/// Resolution order:
/// 1. `RIFA_ROOT` environment variable (if set)
/// 2. Current working directory + `.rifa`
pub fn rifa_root() -> PathBuf {
    if let Ok(root) = env::var("RIFA_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(".rifa")
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "UserConfig::is_default")]
    pub user: UserConfig,

    #[serde(default, skip_serializing_if = "GridConfig::is_default")]
    pub grid: GridConfig,

    #[serde(default, skip_serializing_if = "PurchaseConfig::is_default")]
    pub purchase: PurchaseConfig,
}

/// Raffle API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl UserConfig {
    pub fn is_default(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    /// Zoom level overriding the per-raffle-type default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,
}

impl GridConfig {
    pub fn is_default(&self) -> bool {
        self.zoom.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseConfig {
    /// Proof-of-payment URL sent with every purchase
    #[serde(default = "default_proof_url")]
    pub proof_url: String,

    /// Re-fetch the raffle and check the selection before buying
    #[serde(default)]
    pub revalidate: bool,
}

fn default_proof_url() -> String {
    DEFAULT_PROOF_URL.to_string()
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            proof_url: default_proof_url(),
            revalidate: false,
        }
    }
}

impl PurchaseConfig {
    pub fn is_default(&self) -> bool {
        self.proof_url == DEFAULT_PROOF_URL && !self.revalidate
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        rifa_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            RifaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// API base URL from environment or config file
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = env::var("RIFA_API_URL")
            && !url.is_empty()
        {
            return url;
        }
        self.api.base_url.clone()
    }

    /// Acting user id from environment or config file
    pub fn user_id(&self) -> Option<String> {
        if let Ok(id) = env::var("RIFA_USER_ID")
            && !id.is_empty()
        {
            return Some(id);
        }
        self.user.id.clone()
    }

    /// Resolve the user for a command: explicit flag first, then configuration.
    pub fn require_user_id(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.user_id())
            .ok_or_else(|| {
                RifaError::Config(
                    "no user configured. Pass --user, set RIFA_USER_ID or run: rifa config set user.id <id>"
                        .to_string(),
                )
            })
    }

    /// Configured zoom override, validated against the zoom table
    pub fn zoom_override(&self) -> Option<ZoomLevel> {
        self.grid.zoom.and_then(ZoomLevel::new)
    }

    /// Read a single value by dot-notation key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout" => Some(self.api.timeout.to_string()),
            "user.id" => self.user.id.clone(),
            "grid.zoom" => self.grid.zoom.map(|z| z.to_string()),
            "purchase.proof_url" => Some(self.purchase.proof_url.clone()),
            "purchase.revalidate" => Some(self.purchase.revalidate.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a single value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value)?;
                self.api.base_url = value.to_string();
            }
            "api.timeout" => {
                self.api.timeout = value.parse().map_err(|_| {
                    RifaError::Config(format!("api.timeout must be a number of seconds, got '{value}'"))
                })?;
            }
            "user.id" => self.user.id = Some(value.to_string()),
            "grid.zoom" => {
                let level = value
                    .parse::<u8>()
                    .ok()
                    .and_then(ZoomLevel::new)
                    .ok_or_else(|| {
                        RifaError::Config(format!(
                            "grid.zoom must be between 1 and {}, got '{value}'",
                            ZoomLevel::MAX.get()
                        ))
                    })?;
                self.grid.zoom = Some(level.get());
            }
            "purchase.proof_url" => self.purchase.proof_url = value.to_string(),
            "purchase.revalidate" => {
                self.purchase.revalidate = value.parse().map_err(|_| {
                    RifaError::Config(format!(
                        "purchase.revalidate must be true or false, got '{value}'"
                    ))
                })?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> RifaError {
    RifaError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}
