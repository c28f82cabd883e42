//! Configuration parsing module
//!
//! Loads the issuer trust configuration from a TOML file.
//!
//! # Example
//!
//! ```rust,ignore
//! use hri_authz::config::load_config;
//!
//! let config = load_config("authz.toml")?;
//! let authorizer = hri_authz::Authorizer::from_config(&config.oidc_config()?)?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::oidc::types::Issuer;
use crate::{Error, Result};

/// Platform name used when the configuration does not name one
pub const DEFAULT_PLATFORM: &str = "OIDC";

/// Default timeout for discovery and key set requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// OIDC configuration section
    #[serde(default)]
    pub oidc: Option<OidcConfig>,
}

impl AuthzConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config(path)
    }

    /// Get OIDC configuration
    pub fn oidc_config(&self) -> Result<OidcConfig> {
        self.oidc.clone().ok_or_else(|| {
            Error::Config("OIDC configuration not found in config file".to_string())
        })
    }
}

/// OIDC configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Identity platform name (e.g. "Azure AD"), shown in generic 401 messages
    #[serde(default)]
    pub provider: Option<String>,

    /// OIDC provider issuer URL
    pub issuer_url: String,

    /// Audience tokens must be issued for
    pub audience_id: String,

    /// Timeout in seconds for each discovery and key set request
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl OidcConfig {
    pub fn to_issuer(&self) -> Issuer {
        Issuer::new(self.issuer_url.clone(), self.audience_id.clone())
    }

    pub fn platform(&self) -> &str {
        self.provider.as_deref().unwrap_or(DEFAULT_PLATFORM)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AuthzConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML config: {}", e)))
}
