//! Configuration module for the phone bridge
//!
//! Configuration comes from environment variables (optionally seeded from a
//! `.env` file in `main`) and an optional YAML file. Priority:
//! YAML > ENV vars > .env values > defaults.
//!
//! # Example
//! ```rust,no_run
//! use waav_phone_bridge::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

mod yaml;

pub use yaml::YamlConfig;

use crate::core::convai::{ConvaiConfig, ELEVENLABS_CONVAI_URL};

/// Default listening port
pub const DEFAULT_PORT: u16 = 5000;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing ELEVENLABS_AGENT_ID in environment variables")]
    MissingAgentId,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("TLS requires both a certificate path and a key path")]
    IncompleteTls,

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// TLS configuration for HTTPS and WSS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Holds the listener settings and the Conversational AI agent every relay
/// session connects to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // ElevenLabs Conversational AI
    pub elevenlabs_agent_id: String,
    pub elevenlabs_convai_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingAgentId`] when `ELEVENLABS_AGENT_ID` is
    /// unset or empty, or [`ConfigError::InvalidValue`] for a malformed `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(None, |key| std::env::var(key).ok())
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Environment variables provide the base configuration and values in the
    /// YAML file override them. The merged result is validated afterwards.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml_config = YamlConfig::from_file(path)?;
        Self::from_lookup(Some(yaml_config), |key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup and optional
    /// YAML overrides.
    pub(crate) fn from_lookup<F>(yaml: Option<YamlConfig>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let yaml = yaml.unwrap_or_default();
        let server_yaml = yaml.server.unwrap_or_default();
        let elevenlabs_yaml = yaml.elevenlabs.unwrap_or_default();

        // Hosted environments (Render) need to listen on every interface
        let default_host = if lookup("RENDER").is_some() {
            "0.0.0.0"
        } else {
            "localhost"
        };
        let host = server_yaml
            .host
            .or_else(|| non_empty(lookup("HOST")))
            .unwrap_or_else(|| default_host.to_string());

        let port = match server_yaml.port {
            Some(port) => port,
            None => match non_empty(lookup("PORT")) {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: "PORT",
                    value: raw.clone(),
                })?,
                None => DEFAULT_PORT,
            },
        };

        let tls = resolve_tls(server_yaml.tls, &lookup)?;

        let elevenlabs_agent_id = elevenlabs_yaml
            .agent_id
            .and_then(|id| non_empty(Some(id)))
            .or_else(|| non_empty(lookup("ELEVENLABS_AGENT_ID")))
            .ok_or(ConfigError::MissingAgentId)?;

        let elevenlabs_convai_url = elevenlabs_yaml
            .convai_url
            .or_else(|| non_empty(lookup("ELEVENLABS_CONVAI_URL")))
            .unwrap_or_else(|| ELEVENLABS_CONVAI_URL.to_string());

        let config = Self {
            host,
            port,
            tls,
            elevenlabs_agent_id,
            elevenlabs_convai_url,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Fail at startup rather than on the first call
        self.convai_config()
            .conversation_url()
            .map_err(|_| ConfigError::InvalidValue {
                name: "ELEVENLABS_CONVAI_URL",
                value: self.elevenlabs_convai_url.clone(),
            })?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Conversational AI endpoint settings handed to every relay session
    pub fn convai_config(&self) -> ConvaiConfig {
        ConvaiConfig {
            base_url: self.elevenlabs_convai_url.clone(),
            agent_id: self.elevenlabs_agent_id.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn resolve_tls<F>(tls_yaml: Option<yaml::TlsYaml>, lookup: &F) -> Result<Option<TlsConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(tls) = tls_yaml {
        if tls.enabled == Some(false) {
            return Ok(None);
        }
        return match (tls.cert_path, tls.key_path) {
            (Some(cert), Some(key)) => Ok(Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            })),
            (None, None) if tls.enabled.is_none() => Ok(None),
            _ => Err(ConfigError::IncompleteTls),
        };
    }

    match (
        non_empty(lookup("TLS_CERT_PATH")),
        non_empty(lookup("TLS_KEY_PATH")),
    ) {
        (Some(cert), Some(key)) => Ok(Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        })),
        (None, None) => Ok(None),
        _ => Err(ConfigError::IncompleteTls),
    }
}
