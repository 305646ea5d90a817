use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Which ExchangeRate-API endpoint shape to call.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFlavor {
    /// `GET {base}/v6/latest/{CODE}`, no key needed.
    #[default]
    Open,
    /// `GET {base}/v6/{KEY}/latest/{CODE}`.
    Keyed,
}

impl ProviderFlavor {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderFlavor::Open => "https://open.er-api.com",
            ProviderFlavor::Keyed => "https://v6.exchangerate-api.com",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default)]
    pub flavor: ProviderFlavor,
    /// Overrides the flavor's default endpoint.
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.flavor.default_base_url())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            flavor: ProviderFlavor::default(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

// Hand-written so the key never ends up in a log line.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider", &self.provider)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            api_key: None,
            provider: ProviderConfig::default(),
            static_dir: default_static_dir(),
        }
    }
}

impl AppConfig {
    /// Builds the process configuration: defaults, then the config file
    /// (explicit path, or the platform default if present), then the
    /// environment.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from_path(&default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.with_env(|name| std::env::var(name).ok())
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxproxy", "fxproxy")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Applies `PORT`, `EXCHANGE_RATE_API_KEY`, `EXCHANGE_RATE_API_URL` and
    /// `STATIC_DIR` on top of `self`. `lookup` stands in for `std::env::var`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        if let Some(key) = lookup("EXCHANGE_RATE_API_KEY") {
            self.api_key = Some(key);
        }
        // An empty key is the same as no key.
        self.api_key = self
            .api_key
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Some(url) = lookup("EXCHANGE_RATE_API_URL").filter(|u| !u.is_empty()) {
            self.provider.base_url = Some(url);
        }

        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.is_empty()) {
            self.static_dir = PathBuf::from(dir);
        }

        Ok(self)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
