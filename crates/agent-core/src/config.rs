use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vendor::ApiVendor;

const CONFIG_FILE_PATH: &str = "gasa.toml";
const SECRETS_FILE_PATH: &str = ".streamlit/secrets.toml";
const DEFAULT_SUBMISSION_MODEL: &str = "gemini-1.5-flash";
const GROK_TIMEOUT_SECS: u64 = 3600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// The API key, if set and not blank.
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfigs {
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub grok: ProviderConfig,
}

impl ProviderConfigs {
    pub fn get(&self, vendor: ApiVendor) -> &ProviderConfig {
        match vendor {
            ApiVendor::Gemini => &self.gemini,
            ApiVendor::OpenAI => &self.openai,
            ApiVendor::Grok => &self.grok,
        }
    }

    pub fn get_mut(&mut self, vendor: ApiVendor) -> &mut ProviderConfig {
        match vendor {
            ApiVendor::Gemini => &mut self.gemini,
            ApiVendor::OpenAI => &mut self.openai,
            ApiVendor::Grok => &mut self.grok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Retries for transient failures (connection errors, 5xx, 429).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Below this many extracted characters per page, OCR is attempted.
    #[serde(default = "default_min_chars_per_page")]
    pub min_chars_per_page: usize,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars_per_page: default_min_chars_per_page(),
            dpi: default_dpi(),
            language: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_chars_per_page() -> usize {
    100
}

fn default_dpi() -> u32 {
    200
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProviderConfigs,
    #[serde(default)]
    pub agents_file: Option<PathBuf>,
    #[serde(default = "default_submission_api")]
    pub submission_api: ApiVendor,
    #[serde(default = "default_submission_model")]
    pub submission_model: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

fn default_submission_api() -> ApiVendor {
    ApiVendor::Gemini
}

fn default_submission_model() -> String {
    DEFAULT_SUBMISSION_MODEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProviderConfigs::default(),
            agents_file: None,
            submission_api: default_submission_api(),
            submission_model: default_submission_model(),
            http: HttpConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

pub fn gasa_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".gasa")
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Config {
    /// Loads configuration from file, environment and secrets, in that order
    /// of increasing precedence.
    ///
    /// With `explicit` set, that file must exist. Otherwise the first of
    /// `$GASA_CONFIG`, `./gasa.toml` and `~/.gasa/config.toml` is used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => match Self::discover_config_file() {
                Some(path) => Self::from_file(&path)?,
                None => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_with(|name| std::env::var(name).ok());

        for path in [PathBuf::from(SECRETS_FILE_PATH), gasa_dir().join("secrets.toml")] {
            if path.is_file() {
                match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        if let Err(e) = config.apply_secrets_str(&content) {
                            log::warn!("Ignoring secrets file {}: {}", path.display(), e);
                        } else {
                            log::debug!("Loaded API keys from {}", path.display());
                        }
                    }
                    Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
                }
                break;
            }
        }

        Ok(config)
    }

    fn discover_config_file() -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("GASA_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from(CONFIG_FILE_PATH));
        candidates.push(gasa_dir().join("config.toml"));
        candidates.into_iter().find(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        for vendor in ApiVendor::ALL {
            if let Some(key) = vendor.env_keys().iter().find_map(|name| non_empty(name)) {
                self.providers.get_mut(vendor).api_key = Some(key);
            }
            let base_url_var = format!("{}_BASE_URL", vendor.as_str().to_ascii_uppercase());
            if let Some(url) = non_empty(&base_url_var) {
                self.providers.get_mut(vendor).base_url = Some(url);
            }
        }

        if let Some(path) = non_empty("GASA_AGENTS_FILE") {
            self.agents_file = Some(PathBuf::from(path));
        }
        if let Some(model) = non_empty("GASA_SUBMISSION_MODEL") {
            self.submission_model = model;
        }
        if let Some(retries) = non_empty("GASA_MAX_RETRIES").and_then(|v| v.trim().parse().ok()) {
            self.http.max_retries = retries;
        }
        if let Some(enabled) = non_empty("GASA_OCR_ENABLED") {
            self.ocr.enabled = parse_bool_env(&enabled);
        }
    }

    /// Applies a flat `NAME = "value"` secrets table (the Streamlit layout).
    /// Secrets take precedence over the environment.
    pub fn apply_secrets_str(&mut self, content: &str) -> Result<(), toml::de::Error> {
        let secrets: BTreeMap<String, toml::Value> = toml::from_str(content)?;
        let secret = |name: &str| {
            secrets
                .get(name)
                .and_then(|v| v.as_str())
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };

        for vendor in ApiVendor::ALL {
            if let Some(key) = vendor.env_keys().iter().find_map(|name| secret(name)) {
                self.providers.get_mut(vendor).api_key = Some(key);
            }
        }
        Ok(())
    }

    /// Request timeout for `vendor`, honoring the long Grok default.
    pub fn timeout_secs(&self, vendor: ApiVendor) -> u64 {
        self.providers
            .get(vendor)
            .timeout_secs
            .unwrap_or(match vendor {
                ApiVendor::Grok => GROK_TIMEOUT_SECS,
                _ => self.http.timeout_secs,
            })
    }
}
