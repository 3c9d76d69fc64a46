//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SHELF_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::constants::{DEFAULT_CORS_ORIGINS, DEFAULT_MAX_SEQ_LEN, DEFAULT_PORT, DEFAULT_TOP_K};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SHELF_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Sentence encoder directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// When unset the server runs the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Number of identifiers returned per recommendation. Default: `9`.
    pub top_k: usize,

    /// Max tokens per text before truncation. When unset the model directory's
    /// `sentence_bert_config.json` decides (falling back to `512`).
    pub max_seq_len: Option<usize>,

    /// Browser origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_path: None,
            top_k: DEFAULT_TOP_K,
            max_seq_len: None,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SHELF_PORT";
    const ENV_BIND_ADDR: &'static str = "SHELF_BIND_ADDR";
    const ENV_MODEL_PATH: &'static str = "SHELF_MODEL_PATH";
    const ENV_TOP_K: &'static str = "SHELF_TOP_K";
    const ENV_MAX_SEQ_LEN: &'static str = "SHELF_MAX_SEQ_LEN";
    const ENV_CORS_ORIGINS: &'static str = "SHELF_CORS_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let top_k = Self::parse_positive_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let max_seq_len = match env::var(Self::ENV_MAX_SEQ_LEN) {
            Ok(_) => Some(Self::parse_positive_from_env(
                Self::ENV_MAX_SEQ_LEN,
                DEFAULT_MAX_SEQ_LEN,
            )?),
            Err(_) => defaults.max_seq_len,
        };
        let cors_origins = Self::parse_list_from_env(Self::ENV_CORS_ORIGINS, defaults.cors_origins);

        Ok(Self {
            port,
            bind_addr,
            model_path,
            top_k,
            max_seq_len,
            cors_origins,
        })
    }

    /// Validates paths and basic invariants (does not load the model).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidNumber {
                name: Self::ENV_TOP_K,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.max_seq_len == Some(0) {
            return Err(ConfigError::InvalidNumber {
                name: Self::ENV_MAX_SEQ_LEN,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        self.cors_header_values()?;

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    /// Converts the configured origins into header values for the CORS layer.
    pub fn cors_header_values(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin {
                    origin: origin.clone(),
                })
            })
            .collect()
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_positive_from_env(
        var_name: &'static str,
        default: usize,
    ) -> Result<usize, ConfigError> {
        let Ok(value) = env::var(var_name) else {
            return Ok(default);
        };

        let parsed: usize = value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidNumber {
                name: var_name,
                value: value.clone(),
                reason: e.to_string(),
            })?;

        if parsed == 0 {
            return Err(ConfigError::InvalidNumber {
                name: var_name,
                value,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(parsed)
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        let items: Vec<String> = env::var(var_name)
            .unwrap_or_default()
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        if items.is_empty() { default } else { items }
    }
}
