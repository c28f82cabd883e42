//! Per-request authorization pipeline
//!
//! Every call resolves the issuer, verifies the bearer token and, for
//! tenant-scoped endpoints, checks the `tenant_<tenantId>` role. Failures are
//! logged once with the request id and returned as [`AuthorizationError`].

use std::sync::Arc;

use super::bearer::strip_bearer_prefix;
use super::claims::Claims;
use super::classify::{
    claims_decode_failure, classify_verification_error, provider_unavailable, tenant_mismatch,
};
use super::error::{AuthorizationError, RoleDenial};
use crate::config::OidcConfig;
use crate::error::Result;
use crate::oidc::{verify, HttpIssuerResolver, IssuerResolver, Issuer, VerifiedToken};

/// Authorization engine shared by all request handlers
#[derive(Clone)]
pub struct Authorizer {
    issuer: Issuer,
    platform: String,
    resolver: Arc<dyn IssuerResolver>,
}

impl Authorizer {
    /// Create an engine
    ///
    /// `platform` names the identity provider in generic 401 messages.
    pub fn new(issuer: Issuer, platform: impl Into<String>, resolver: Arc<dyn IssuerResolver>) -> Self {
        Self {
            issuer,
            platform: platform.into(),
            resolver,
        }
    }

    /// Create an engine backed by OIDC discovery over HTTP
    pub fn from_config(config: &OidcConfig) -> Result<Self> {
        let resolver = HttpIssuerResolver::with_timeout(config.request_timeout())?;
        Ok(Self::new(
            config.to_issuer(),
            config.platform(),
            Arc::new(resolver),
        ))
    }

    pub fn issuer(&self) -> &Issuer {
        &self.issuer
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Check that the caller presents a valid token from the trusted issuer
    pub async fn validate_for_tenant(
        &self,
        request_id: &str,
        auth_header: &str,
    ) -> std::result::Result<(), AuthorizationError> {
        self.verify_token(request_id, auth_header).await.map(|_| ())
    }

    /// Check the token and that its claims grant `tenant_<tenantId>`
    ///
    /// A tenant mismatch still carries the decoded claims in the denial.
    pub async fn validate_roles(
        &self,
        request_id: &str,
        auth_header: &str,
        tenant_id: &str,
    ) -> std::result::Result<Claims, RoleDenial> {
        let token = self.verify_token(request_id, auth_header).await?;

        let claims = token.claims().map_err(|e| {
            tracing::error!(request_id = %request_id, "Failed to decode token claims: {}", e);
            claims_decode_failure(request_id, &e.to_string())
        })?;

        if !claims.has_tenant(tenant_id) {
            let error = tenant_mismatch(request_id, tenant_id);
            tracing::error!(
                request_id = %request_id,
                subject = %claims.subject,
                "{}",
                error.message
            );
            return Err(RoleDenial {
                error,
                claims: Some(claims),
            });
        }

        Ok(claims)
    }

    async fn verify_token(
        &self,
        request_id: &str,
        auth_header: &str,
    ) -> std::result::Result<VerifiedToken, AuthorizationError> {
        let raw_token = strip_bearer_prefix(auth_header);

        let provider = self
            .resolver
            .resolve(&self.issuer.issuer_url)
            .await
            .map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    issuer = %self.issuer.issuer_url,
                    "Failed to create OIDC provider: {}",
                    e
                );
                provider_unavailable(request_id, &e.to_string())
            })?;

        verify(provider.as_ref(), &self.issuer.audience_id, raw_token)
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, "Token verification failed: {}", e);
                classify_verification_error(request_id, &self.platform, &e.to_string())
            })
    }
}
