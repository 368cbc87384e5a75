//! # AccessToken Config
//!
//! Issuer credentials for minting access tokens.
//!
//! An [`AccessTokenConfig`] holds the account identifier, the API key and the
//! API secret used to sign tokens, plus optional defaults for the identity,
//! the video configuration profile, the time-to-live and the signing
//! algorithm. It can be built in code, read from environment variables, or
//! loaded from a JSON or TOML file.
//!
//! ```no_run
//! use accesstoken_config::AccessTokenConfig;
//!
//! // Reads TW_ACCOUNT_SID, TW_API_KEY, TW_API_SECRET and friends
//! let config = AccessTokenConfig::from_env("TW").expect("missing credentials");
//! println!("issuing tokens for {}", config.account_sid);
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default token lifetime in seconds.
pub const DEFAULT_TTL: i64 = 3600;

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Account SID is required but was not provided")]
    MissingAccountSid,

    #[error("API key is required but was not provided")]
    MissingApiKey,

    #[error("API secret is required but was not provided")]
    MissingApiSecret,

    #[error("Invalid TTL {0}: the token lifetime must be a positive number of seconds")]
    InvalidTtl(i64),

    #[error("I/O error occurred while reading configuration: {0}")]
    IOError(String),

    #[error("Failed to parse configuration data: {0}")]
    ParseError(String),

    #[error("Environment variable error: {0}")]
    EnvVarError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

/// Credentials and defaults for an access token issuer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenConfig {
    /// Account the tokens are issued for, written to `sub`
    pub account_sid: String,
    /// API key, written to `iss` and used to derive `jti`
    pub api_key: String,
    /// API secret used as the HMAC key
    pub api_secret: String,
    /// Configuration profile for the video (rtc) grant
    #[serde(default)]
    pub video_sid: Option<String>,
    /// Default identity embedded in the grants
    #[serde(default)]
    pub identity: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Signing algorithm identifier, e.g. "HS256"
    #[serde(default)]
    pub algorithm: Option<String>,
}

/// Builder for AccessTokenConfig
#[derive(Default, Debug)]
pub struct AccessTokenConfigBuilder {
    account_sid: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    video_sid: Option<String>,
    identity: Option<String>,
    ttl: Option<i64>,
    algorithm: Option<String>,
}

impl AccessTokenConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: &AccessTokenConfig) -> Self {
        Self {
            account_sid: Some(config.account_sid.clone()),
            api_key: Some(config.api_key.clone()),
            api_secret: Some(config.api_secret.clone()),
            video_sid: config.video_sid.clone(),
            identity: config.identity.clone(),
            ttl: config.ttl,
            algorithm: config.algorithm.clone(),
        }
    }

    pub fn account_sid(mut self, account_sid: impl Into<String>) -> Self {
        self.account_sid = Some(account_sid.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn video_sid(mut self, video_sid: impl Into<String>) -> Self {
        self.video_sid = Some(video_sid.into());
        self
    }

    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or invalid
    pub fn build(self) -> Result<AccessTokenConfig, ConfigError> {
        let config = AccessTokenConfig {
            account_sid: self.account_sid.ok_or(ConfigError::MissingAccountSid)?,
            api_key: self.api_key.ok_or(ConfigError::MissingApiKey)?,
            api_secret: self.api_secret.ok_or(ConfigError::MissingApiSecret)?,
            video_sid: self.video_sid,
            identity: self.identity,
            ttl: self.ttl,
            algorithm: self.algorithm,
        };

        config.validate()?;

        Ok(config)
    }
}

impl AccessTokenConfig {
    /// Create a configuration with the three required credentials
    pub fn new(
        account_sid: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        AccessTokenConfig {
            account_sid: account_sid.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            video_sid: None,
            identity: None,
            ttl: None,
            algorithm: None,
        }
    }

    pub fn builder() -> AccessTokenConfigBuilder {
        AccessTokenConfigBuilder::new()
    }

    /// Convert this configuration to a builder for modification
    pub fn to_builder(&self) -> AccessTokenConfigBuilder {
        AccessTokenConfigBuilder::from_config(self)
    }

    /// The configured lifetime, or [`DEFAULT_TTL`]
    pub fn ttl_or_default(&self) -> i64 {
        self.ttl.unwrap_or(DEFAULT_TTL)
    }

    /// Create a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: AccessTokenConfig = serde_json::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from a TOML file
    #[cfg(feature = "toml")]
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: AccessTokenConfig = toml::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON or TOML file, picking the format from the extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(path),
            _ => Self::from_file(path),
        }
    }

    /// Create a configuration from environment variables
    ///
    /// The environment variables are named with the given prefix followed by:
    /// - ACCOUNT_SID: The account the tokens are issued for
    /// - API_KEY: The API key (token issuer)
    /// - API_SECRET: The API secret used to sign tokens
    /// - VIDEO_SID: Video configuration profile (optional)
    /// - IDENTITY: Default identity (optional)
    /// - TTL: Token lifetime in seconds (optional)
    /// - ALGORITHM: Signing algorithm (optional)
    ///
    /// With the prefix "TW" the variables are `TW_ACCOUNT_SID`, `TW_API_KEY`,
    /// `TW_API_SECRET`, `TW_VIDEO_SID`, `TW_IDENTITY`, `TW_TTL` and
    /// `TW_ALGORITHM`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any required variable is missing or invalid.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let config = AccessTokenConfig {
            account_sid: required_var(prefix, "ACCOUNT_SID", ConfigError::MissingAccountSid)?,
            api_key: required_var(prefix, "API_KEY", ConfigError::MissingApiKey)?,
            api_secret: required_var(prefix, "API_SECRET", ConfigError::MissingApiSecret)?,
            video_sid: optional_var(prefix, "VIDEO_SID")?,
            identity: optional_var(prefix, "IDENTITY")?,
            ttl: parse_ttl(optional_var(prefix, "TTL")?)?,
            algorithm: optional_var(prefix, "ALGORITHM")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from environment variables or files
    ///
    /// Like `from_env`, but the secret may also be read from the file named by
    /// `<PREFIX>_API_SECRET_FILE`, which takes precedence over
    /// `<PREFIX>_API_SECRET`. Trailing newlines in the file are ignored.
    pub fn from_env_or_file(prefix: &str) -> Result<Self, ConfigError> {
        let api_secret = match env::var(format!("{}_API_SECRET_FILE", prefix)) {
            Ok(secret_file) => fs::read_to_string(secret_file)
                .map_err(|e| ConfigError::IOError(format!("Failed to read secret file: {}", e)))?
                .trim_end_matches(['\r', '\n'])
                .to_string(),
            Err(env::VarError::NotPresent) => {
                required_var(prefix, "API_SECRET", ConfigError::MissingApiSecret)?
            }
            Err(e) => return Err(ConfigError::EnvVarError(e.to_string())),
        };

        let config = AccessTokenConfig {
            account_sid: required_var(prefix, "ACCOUNT_SID", ConfigError::MissingAccountSid)?,
            api_key: required_var(prefix, "API_KEY", ConfigError::MissingApiKey)?,
            api_secret,
            video_sid: optional_var(prefix, "VIDEO_SID")?,
            identity: optional_var(prefix, "IDENTITY")?,
            ttl: parse_ttl(optional_var(prefix, "TTL")?)?,
            algorithm: optional_var(prefix, "ALGORITHM")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks that the credentials are present and the TTL is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account_sid.is_empty() {
            return Err(ConfigError::MissingAccountSid);
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api_secret.is_empty() {
            return Err(ConfigError::MissingApiSecret);
        }
        if let Some(ttl) = self.ttl {
            if ttl <= 0 {
                return Err(ConfigError::InvalidTtl(ttl));
            }
        }
        Ok(())
    }
}

fn required_var(prefix: &str, name: &str, missing: ConfigError) -> Result<String, ConfigError> {
    match env::var(format!("{}_{}", prefix, name)) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) | Err(env::VarError::NotPresent) => Err(missing),
        Err(e) => Err(ConfigError::EnvVarError(e.to_string())),
    }
}

fn optional_var(prefix: &str, name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(format!("{}_{}", prefix, name)) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVarError(e.to_string())),
    }
}

fn parse_ttl(value: Option<String>) -> Result<Option<i64>, ConfigError> {
    value
        .map(|ttl| {
            ttl.parse::<i64>()
                .map_err(|_| ConfigError::ParseError(format!("Invalid TTL: {}", ttl)))
        })
        .transpose()
}

/// Try to load a configuration from standard locations
///
/// This function attempts, in order:
/// 1. Environment variables with the prefix "TW" (see `from_env_or_file`)
/// 2. `./accesstoken.json`, `~/.accesstoken/config.json`, `/etc/accesstoken/config.json`
/// 3. If the "toml" feature is enabled, the same paths with a `.toml` extension
///
/// Returns None if no configuration could be found.
pub fn try_load_default_config() -> Option<AccessTokenConfig> {
    if let Ok(config) = AccessTokenConfig::from_env_or_file("TW") {
        return Some(config);
    }

    let json_paths = [
        "./accesstoken.json",
        "~/.accesstoken/config.json",
        "/etc/accesstoken/config.json",
    ];
    for path in json_paths.iter().filter_map(|p| expand_home(p)) {
        if path.exists() {
            if let Ok(config) = AccessTokenConfig::from_file(&path) {
                return Some(config);
            }
        }
    }

    #[cfg(feature = "toml")]
    {
        let toml_paths = [
            "./accesstoken.toml",
            "~/.accesstoken/config.toml",
            "/etc/accesstoken/config.toml",
        ];
        for path in toml_paths.iter().filter_map(|p| expand_home(p)) {
            if path.exists() {
                if let Ok(config) = AccessTokenConfig::from_toml(&path) {
                    return Some(config);
                }
            }
        }
    }

    None
}

fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(stripped) => dirs::home_dir().map(|home| home.join(stripped)),
        None => Some(Path::new(path).to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn set_vars(prefix: &str, vars: &[(&str, &str)]) {
        for (name, value) in vars {
            env::set_var(format!("{}_{}", prefix, name), value);
        }
    }

    #[test]
    fn test_builder_requires_credentials() {
        let result = AccessTokenConfig::builder()
            .api_key("SK123")
            .api_secret("secret")
            .build();
        assert!(matches!(result, Err(ConfigError::MissingAccountSid)));

        let result = AccessTokenConfig::builder()
            .account_sid("AC123")
            .api_secret("secret")
            .build();
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));

        let result = AccessTokenConfig::builder()
            .account_sid("AC123")
            .api_key("SK123")
            .build();
        assert!(matches!(result, Err(ConfigError::MissingApiSecret)));
    }

    #[test]
    fn test_builder_round_trip() {
        let config = AccessTokenConfig::builder()
            .account_sid("AC123")
            .api_key("SK123")
            .api_secret("secret")
            .identity("alice")
            .video_sid("VS123")
            .ttl(600)
            .algorithm("HS512")
            .build()
            .unwrap();
        assert_eq!(config.ttl_or_default(), 600);

        let changed = config.to_builder().ttl(60).build().unwrap();
        assert_eq!(changed.ttl, Some(60));
        assert_eq!(changed.identity.as_deref(), Some("alice"));
    }

    #[test]
    fn test_validate_rejects_bad_ttl() {
        let mut config = AccessTokenConfig::new("AC123", "SK123", "secret");
        assert_eq!(config.ttl_or_default(), DEFAULT_TTL);
        config.ttl = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTtl(0))));
        config.ttl = Some(-5);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTtl(-5))));
    }

    #[test]
    fn test_from_file_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"account_sid":"AC123","api_key":"SK123","api_secret":"secret","ttl":120}}"#
        )
        .unwrap();

        let config = AccessTokenConfig::from_file(file.path()).unwrap();
        assert_eq!(config.account_sid, "AC123");
        assert_eq!(config.ttl, Some(120));
        assert_eq!(config.video_sid, None);
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            AccessTokenConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_path_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "account_sid = \"AC123\"").unwrap();
        writeln!(file, "api_key = \"SK123\"").unwrap();
        writeln!(file, "api_secret = \"secret\"").unwrap();
        writeln!(file, "video_sid = \"VS123\"").unwrap();

        let config = AccessTokenConfig::from_path(file.path()).unwrap();
        assert_eq!(config.video_sid.as_deref(), Some("VS123"));
    }

    #[test]
    fn test_from_env() {
        set_vars(
            "ATCFG_ENV",
            &[
                ("ACCOUNT_SID", "AC123"),
                ("API_KEY", "SK123"),
                ("API_SECRET", "secret"),
                ("VIDEO_SID", "VS123"),
                ("TTL", "90"),
            ],
        );

        let config = AccessTokenConfig::from_env("ATCFG_ENV").unwrap();
        assert_eq!(config.api_key, "SK123");
        assert_eq!(config.video_sid.as_deref(), Some("VS123"));
        assert_eq!(config.ttl, Some(90));
        assert_eq!(config.identity, None);
    }

    #[test]
    fn test_from_env_missing_secret() {
        set_vars(
            "ATCFG_NOSECRET",
            &[("ACCOUNT_SID", "AC123"), ("API_KEY", "SK123")],
        );
        assert!(matches!(
            AccessTokenConfig::from_env("ATCFG_NOSECRET"),
            Err(ConfigError::MissingApiSecret)
        ));
    }

    #[test]
    fn test_from_env_bad_ttl() {
        set_vars(
            "ATCFG_BADTTL",
            &[
                ("ACCOUNT_SID", "AC123"),
                ("API_KEY", "SK123"),
                ("API_SECRET", "secret"),
                ("TTL", "soon"),
            ],
        );
        assert!(matches!(
            AccessTokenConfig::from_env("ATCFG_BADTTL"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_env_or_file_reads_secret_file() {
        let mut secret_file = NamedTempFile::new().unwrap();
        writeln!(secret_file, "file-secret").unwrap();

        set_vars(
            "ATCFG_FILE",
            &[
                ("ACCOUNT_SID", "AC123"),
                ("API_KEY", "SK123"),
                ("API_SECRET", "env-secret"),
            ],
        );
        env::set_var(
            "ATCFG_FILE_API_SECRET_FILE",
            secret_file.path().to_str().unwrap(),
        );

        let config = AccessTokenConfig::from_env_or_file("ATCFG_FILE").unwrap();
        assert_eq!(config.api_secret, "file-secret");
    }
}
