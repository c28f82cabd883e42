//! Tenant-scoped authorization
//!
//! This module turns a raw `Authorization` header into either verified
//! [`Claims`] or an [`AuthorizationError`] carrying the HTTP status the
//! caller should receive.
//!
//! # Example
//!
//! ```rust,ignore
//! use hri_authz::{build_role_string, Authorizer, LogicalRole};
//!
//! let authorizer = Authorizer::from_config(&config.oidc_config()?)?;
//!
//! let claims = authorizer
//!     .validate_roles(&request_id, &auth_header, &tenant_id)
//!     .await?;
//! if claims.has_role(&build_role_string(&tenant_id, LogicalRole::DataConsumer)) {
//!     // read batches
//! }
//! ```

pub mod bearer;
pub mod claims;
pub mod classify;
pub mod engine;
pub mod error;

pub use bearer::strip_bearer_prefix;
pub use claims::{build_role_string, tenant_role, Claims, LogicalRole};
pub use engine::Authorizer;
pub use error::{AuthorizationError, ErrorBody, RoleDenial};
