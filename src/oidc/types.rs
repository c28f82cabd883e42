//! Common types for OIDC operations

use serde::{Deserialize, Serialize};

/// OIDC discovery document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcDiscoveryDocument {
    /// Issuer identifier
    pub issuer: String,
    /// JWKS URI
    pub jwks_uri: String,
    /// Authorization endpoint
    #[serde(default)]
    pub authorization_endpoint: Option<String>,
    /// Token endpoint
    #[serde(default)]
    pub token_endpoint: Option<String>,
    /// Signing algorithms the issuer advertises
    #[serde(default)]
    pub id_token_signing_alg_values_supported: Vec<String>,
}

/// Trust configuration of a deployment: who signs tokens and for whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    /// OIDC provider issuer URL
    pub issuer_url: String,
    /// Audience tokens must be issued for
    pub audience_id: String,
}

impl Issuer {
    pub fn new(issuer_url: impl Into<String>, audience_id: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience_id: audience_id.into(),
        }
    }

    /// Well-known discovery URL for this issuer
    pub fn discovery_url(&self) -> String {
        discovery_url(&self.issuer_url)
    }
}

pub(crate) fn discovery_url(issuer_url: &str) -> String {
    format!(
        "{}/.well-known/openid-configuration",
        issuer_url.trim_end_matches('/')
    )
}
