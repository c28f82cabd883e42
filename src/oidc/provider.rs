//! Provider and verifier seams
//!
//! Authorization never talks to the identity provider directly. It asks an
//! [`IssuerResolver`] for an [`OidcProvider`], asks the provider for a
//! [`TokenVerifier`] bound to an audience, and gets back a [`VerifiedToken`]
//! that decodes into [`Claims`] on demand.
//!
//! Two implementations ship with the crate: the network-backed
//! [`HttpIssuerResolver`](super::HttpIssuerResolver) and the in-memory
//! [`StaticIssuerResolver`](super::StaticIssuerResolver) for tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::claims::Claims;
use crate::error::{Error, Result};

/// Turns an issuer URL into a provider able to build verifiers
#[async_trait]
pub trait IssuerResolver: Send + Sync {
    /// Resolve the issuer. Any failure is [`Error::ProviderUnavailable`].
    async fn resolve(&self, issuer_url: &str) -> Result<Arc<dyn OidcProvider>>;
}

/// A resolved issuer
pub trait OidcProvider: Send + Sync {
    /// Build a verifier that only accepts tokens issued for `audience_id`
    fn verifier(&self, audience_id: &str) -> Box<dyn TokenVerifier>;
}

/// Validates raw bearer tokens
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Check signature, expiry and audience.
    ///
    /// Rejections are [`Error::Verification`] carrying the verifier's own text.
    async fn verify(&self, raw_token: &str) -> Result<VerifiedToken>;
}

/// Verify `raw_token` against `provider` for `audience_id`
pub async fn verify(
    provider: &dyn OidcProvider,
    audience_id: &str,
    raw_token: &str,
) -> Result<VerifiedToken> {
    provider.verifier(audience_id).verify(raw_token).await
}

/// Claims payload of a token that passed verification
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    payload: Value,
}

impl VerifiedToken {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Raw JSON payload
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Decode the payload into typed claims
    pub fn claims(&self) -> Result<Claims> {
        serde_json::from_value(self.payload.clone()).map_err(|e| Error::ClaimsDecode(e.to_string()))
    }
}
