//! In-memory issuer with a fixed verification decision

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::provider::{IssuerResolver, OidcProvider, TokenVerifier, VerifiedToken};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Decision {
    Accept(Value),
    Reject(String),
}

/// Resolver that never touches the network
///
/// # Example
///
/// ```rust
/// use hri_authz::oidc::StaticIssuerResolver;
///
/// let resolver = StaticIssuerResolver::accepting(serde_json::json!({ "scope": "tenant_123" }))
///     .with_token("goodtoken");
/// ```
#[derive(Debug, Clone)]
pub struct StaticIssuerResolver {
    outcome: std::result::Result<StaticProvider, String>,
}

impl StaticIssuerResolver {
    /// Every token verifies and carries `payload` as its claims
    pub fn accepting(payload: Value) -> Self {
        Self::from_decision(Decision::Accept(payload))
    }

    /// Every token is rejected with `message`
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::from_decision(Decision::Reject(message.into()))
    }

    /// Resolution itself fails with `message`
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }

    /// Only accept this exact raw token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        if let Ok(provider) = &mut self.outcome {
            provider.token = Some(token.into());
        }
        self
    }

    /// Only accept verifiers built for this audience
    pub fn with_audience(mut self, audience_id: impl Into<String>) -> Self {
        if let Ok(provider) = &mut self.outcome {
            provider.audience_id = Some(audience_id.into());
        }
        self
    }

    fn from_decision(decision: Decision) -> Self {
        Self {
            outcome: Ok(StaticProvider {
                decision,
                token: None,
                audience_id: None,
            }),
        }
    }
}

#[async_trait]
impl IssuerResolver for StaticIssuerResolver {
    async fn resolve(&self, _issuer_url: &str) -> Result<Arc<dyn OidcProvider>> {
        match &self.outcome {
            Ok(provider) => Ok(Arc::new(provider.clone())),
            Err(message) => Err(Error::ProviderUnavailable(message.clone())),
        }
    }
}

#[derive(Debug, Clone)]
struct StaticProvider {
    decision: Decision,
    token: Option<String>,
    audience_id: Option<String>,
}

impl OidcProvider for StaticProvider {
    fn verifier(&self, audience_id: &str) -> Box<dyn TokenVerifier> {
        Box::new(StaticVerifier {
            provider: self.clone(),
            audience_id: audience_id.to_string(),
        })
    }
}

struct StaticVerifier {
    provider: StaticProvider,
    audience_id: String,
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, raw_token: &str) -> Result<VerifiedToken> {
        if let Some(expected) = &self.provider.audience_id {
            if *expected != self.audience_id {
                return Err(Error::Verification(format!(
                    "oidc: expected audience {:?} got {:?}",
                    self.audience_id, expected
                )));
            }
        }
        if let Some(expected) = &self.provider.token {
            if expected != raw_token {
                return Err(Error::Verification(
                    "oidc: failed to verify signature: token not recognized".to_string(),
                ));
            }
        }
        match &self.provider.decision {
            Decision::Accept(payload) => Ok(VerifiedToken::new(payload.clone())),
            Decision::Reject(message) => Err(Error::Verification(message.clone())),
        }
    }
}
