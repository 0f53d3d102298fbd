use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api_auth::ApiCredential;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    /// hourly | daily | never
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "xcom_api_validator.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub contract_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_body_bytes: 1024 * 1024,
            contract_path: PathBuf::from("contract/openapi.yaml"),
        }
    }
}

/// A credential bound to one api-key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CredentialConfig {
    pub api_key: String,
    #[serde(flatten)]
    pub credential: ApiCredential,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Allowed clock skew between client and server, both directions
    pub timestamp_window_ms: i64,
    /// Defaults to, and is floored at, twice the window
    pub nonce_retention_ms: Option<i64>,
    pub nonce_sweep_interval_ms: u64,
    pub credentials: Vec<CredentialConfig>,
    /// Applied to api-keys without their own credential
    pub default_credential: Option<ApiCredential>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            timestamp_window_ms: 30_000,
            nonce_retention_ms: None,
            nonce_sweep_interval_ms: 60_000,
            credentials: Vec::new(),
            default_credential: None,
        }
    }
}

impl AuthConfig {
    /// A signed request is accepted anywhere in `[ts - window, ts + window]`,
    /// so its nonce has to outlive that whole 2 x window span.
    pub fn nonce_retention_ms(&self) -> i64 {
        let floor = 2 * self.timestamp_window_ms;
        self.nonce_retention_ms.unwrap_or(floor).max(floor)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// URL template -> extra union equivalence sets (JSON pointers)
    pub equivalent_properties: BTreeMap<String, Vec<Vec<String>>>,
}

impl AppConfig {
    /// Load `config/{env}.yaml`.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(format!("config/{}.yaml", env))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.timestamp_window_ms <= 0 {
            return Err(ConfigError::Invalid(
                "auth.timestamp_window_ms must be positive".into(),
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::{DigestAlgorithm, SigningFamily};

    const YAML: &str = r#"
server:
  port: 9000
auth:
  timestamp_window_ms: 10000
  credentials:
    - api_key: alice
      algorithm: { family: hmac, digest: sha512 }
      key: secret
      encoding: base64
  default_credential:
    algorithm: { family: ecdsa, digest: sha256, curve: prime256v1 }
    key: "-----BEGIN PUBLIC KEY-----"
validation:
  equivalent_properties:
    /accounts/{accountId}/liquidity/quotes:
      - [/fromAmount, /toAmount]
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config: AppConfig = serde_yaml::from_str(YAML).unwrap();
        config.validate().unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert_eq!(config.logging.log_level, "info");

        let alice = &config.auth.credentials[0];
        assert_eq!(alice.api_key, "alice");
        assert_eq!(alice.credential.algorithm.family, SigningFamily::Hmac);
        assert_eq!(alice.credential.algorithm.digest, DigestAlgorithm::Sha512);
        assert_eq!(
            config.auth.default_credential.as_ref().unwrap().algorithm.curve_name(),
            "prime256v1"
        );
        assert_eq!(config.validation.equivalent_properties.len(), 1);
    }

    #[test]
    fn test_nonce_retention_floor() {
        let mut auth = AuthConfig::default();
        assert_eq!(auth.nonce_retention_ms(), 60_000);
        auth.nonce_retention_ms = Some(1_000);
        assert_eq!(auth.nonce_retention_ms(), 60_000);
        auth.nonce_retention_ms = Some(30_000);
        assert_eq!(auth.nonce_retention_ms(), 60_000);
        auth.nonce_retention_ms = Some(90_000);
        assert_eq!(auth.nonce_retention_ms(), 90_000);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(matches!(
            AppConfig::load("does-not-exist"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_window() {
        let config: AppConfig =
            serde_yaml::from_str("auth: { timestamp_window_ms: 0 }").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
