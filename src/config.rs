//! Client configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//! `MEGAFM_API_URL` and `MEGAFM_PROXY` override the file when set.
//!
//! ```toml
//! api_url = "https://g.api.mega.co.nz/cs"
//! request_timeout_secs = 20
//! download_mode = "fetch"
//! backend = "api"
//!
//! [key_derivation]
//! algorithm = "sha256"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::API_URL;
use crate::crypto::KeyDerivation;
use crate::error::{ClientError, Result};
use crate::fs::DownloadMode;

/// Which [`crate::backend::StorageBackend`] to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// JSON action gateway.
    #[default]
    Api,
    /// MEGAcmd command-line tools.
    Megacmd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway endpoint.
    pub api_url: String,
    /// HTTP(S) or SOCKS proxy for all requests.
    pub proxy: Option<String>,
    /// Per-request timeout in seconds; 0 disables it.
    pub request_timeout_secs: u64,
    pub key_derivation: KeyDerivation,
    pub download_mode: DownloadMode,
    pub backend: BackendKind,
    /// Remote folder the MEGAcmd backend works in.
    pub megacmd_root: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            proxy: None,
            request_timeout_secs: 20,
            key_derivation: KeyDerivation::default(),
            download_mode: DownloadMode::default(),
            backend: BackendKind::default(),
            megacmd_root: "/".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ClientError::ConfigError(e.to_string()))
    }

    /// Load from `path`, apply environment overrides and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("MEGAFM_API_URL") {
            self.api_url = url;
        }
        if let Ok(proxy) = std::env::var("MEGAFM_PROXY") {
            self.proxy = Some(proxy).filter(|p| !p.is_empty());
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ClientError::ConfigError(format!(
                "api_url must start with http:// or https://, got {}",
                self.api_url
            )));
        }
        if let KeyDerivation::Pbkdf2Sha512 { iterations: 0, .. } = self.key_derivation {
            return Err(ClientError::ConfigError(
                "key_derivation.iterations must be greater than 0".to_string(),
            ));
        }
        if !self.megacmd_root.starts_with('/') {
            return Err(ClientError::ConfigError(format!(
                "megacmd_root must be an absolute remote path, got {}",
                self.megacmd_root
            )));
        }
        Ok(())
    }
}
