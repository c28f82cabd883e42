//! Axum integration
//!
//! Header helpers for handlers that feed the [`Authorizer`](crate::Authorizer).
//! [`AuthorizationError`](crate::AuthorizationError) and
//! [`RoleDenial`](crate::RoleDenial) implement `IntoResponse`, so handlers can
//! return them directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{extract::{Path, State}, http::HeaderMap, Json};
//! use hri_authz::axum_integration::{bearer_header, request_id};
//!
//! async fn get_batches(
//!     State(authorizer): State<Arc<Authorizer>>,
//!     Path(tenant_id): Path<String>,
//!     headers: HeaderMap,
//! ) -> Result<Json<Vec<Batch>>, RoleDenial> {
//!     let request_id = request_id(&headers);
//!     let claims = authorizer
//!         .validate_roles(&request_id, bearer_header(&headers), &tenant_id)
//!         .await?;
//!     // ...
//! }
//! ```

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Header carrying the caller's correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Raw `Authorization` header value, empty when missing or not valid UTF-8
pub fn bearer_header(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Correlation id from `X-Request-Id`, or a fresh one when absent
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer my-secret-token".parse().unwrap());

        assert_eq!(bearer_header(&headers), "Bearer my-secret-token");
    }

    #[test]
    fn test_bearer_header_missing() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_header(&headers), "");
    }

    #[test]
    fn test_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-Id", "req-42".parse().unwrap());

        assert_eq!(request_id(&headers), "req-42");
    }

    #[test]
    fn test_request_id_generated() {
        let headers = HeaderMap::new();
        let first = request_id(&headers);
        let second = request_id(&headers);
        assert_eq!(first.len(), 36);
        assert_ne!(first, second);
    }
}
