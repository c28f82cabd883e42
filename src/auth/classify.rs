//! Maps verifier failures to caller-visible errors

use super::error::AuthorizationError;

/// Verifier phrasings for tokens that are malformed or expired
const GENERIC_REJECTIONS: [&str; 3] = [
    "JWS format must have three parts",
    "malformed jwt",
    "Token Expiry",
];

/// Message prefix for issuer resolution failures
pub const PROVIDER_FAILURE_PREFIX: &str = "Failed to create OIDC provider: ";

fn is_generic_rejection(verifier_message: &str) -> bool {
    let haystack = verifier_message.to_ascii_lowercase();
    GENERIC_REJECTIONS
        .iter()
        .any(|needle| haystack.contains(&needle.to_ascii_lowercase()))
}

/// Classify a token verification failure
///
/// Malformed and expired tokens get a generic `<platform> authentication
/// returned 401`; any other verifier text is forwarded as is.
pub fn classify_verification_error(
    request_id: &str,
    platform: &str,
    verifier_message: &str,
) -> AuthorizationError {
    if is_generic_rejection(verifier_message) {
        AuthorizationError::unauthorized(
            request_id,
            format!("{} authentication returned 401", platform),
        )
    } else {
        AuthorizationError::unauthorized(request_id, verifier_message)
    }
}

pub fn provider_unavailable(request_id: &str, cause: &str) -> AuthorizationError {
    AuthorizationError::internal(request_id, format!("{}{}", PROVIDER_FAILURE_PREFIX, cause))
}

pub fn claims_decode_failure(request_id: &str, cause: &str) -> AuthorizationError {
    AuthorizationError::unauthorized(request_id, cause)
}

pub fn tenant_mismatch(request_id: &str, tenant_id: &str) -> AuthorizationError {
    AuthorizationError::unauthorized(
        request_id,
        format!(
            "Unauthorized tenant access. Tenant '{}' is not included in the authorized roles:tenant_{}.",
            tenant_id, tenant_id
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_generic_rejections_hide_detail() {
        for message in [
            "oidc: malformed jwt: square/go-jose: compact JWS format must have three parts",
            "oidc: malformed jwt: illegal base64 data at input byte 4",
            "oidc: MALFORMED JWT: bad",
            "Malformed JWT",
            "oidc: token is expired (Token Expiry: 2020-01-01 00:00:00 +0000 UTC)",
        ] {
            let err = classify_verification_error("req", "Azure AD", message);
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.message, "Azure AD authentication returned 401");
            assert_eq!(err.request_id, "req");
        }
    }

    #[test]
    fn test_other_rejections_forwarded() {
        let message = r#"oidc: expected audience "api://hri" got ["other"]"#;
        let err = classify_verification_error("req", "Azure AD", message);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, message);
    }

    #[test]
    fn test_provider_unavailable_is_500() {
        let err = provider_unavailable("req", "connection refused");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to create OIDC provider: connection refused");
    }

    #[test]
    fn test_tenant_mismatch_message() {
        let err = tenant_mismatch("req", "456");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.message,
            "Unauthorized tenant access. Tenant '456' is not included in the authorized roles:tenant_456."
        );
    }
}
