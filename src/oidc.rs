//! OIDC issuer resolution and token verification
//!
//! This module provides the provider/verifier abstraction used by the
//! authorization engine, a network-backed implementation performing OIDC
//! discovery and JWKS verification, and an in-memory one for tests.

pub mod fake;
pub mod provider;
pub mod resource_server;
pub mod types;

pub use fake::StaticIssuerResolver;
pub use provider::{verify, IssuerResolver, OidcProvider, TokenVerifier, VerifiedToken};
pub use resource_server::{DiscoveredProvider, HttpIssuerResolver, JwksTokenVerifier};
pub use types::{Issuer, OidcDiscoveryDocument};
