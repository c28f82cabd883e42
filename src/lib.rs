//! # HRI authorization gate
//!
//! Verifies OIDC bearer tokens against a configured issuer and enforces
//! tenant-scoped roles before tenant and batch endpoints run.
//!
//! ## Features
//!
//! - `axum` (default): `IntoResponse` for authorization errors and header
//!   helpers for handlers

pub mod auth;
pub mod config;
pub mod error;
pub mod oidc;

#[cfg(feature = "axum")]
pub mod axum_integration;

pub use error::{Error, Result};

pub use crate::auth::{
    build_role_string, strip_bearer_prefix, tenant_role, AuthorizationError, Authorizer, Claims,
    ErrorBody, LogicalRole, RoleDenial,
};
pub use crate::config::{load_config, AuthzConfig, OidcConfig};
pub use crate::oidc::{
    HttpIssuerResolver, IssuerResolver, Issuer, OidcProvider, StaticIssuerResolver, TokenVerifier,
    VerifiedToken,
};
