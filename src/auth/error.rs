use http::StatusCode;
use serde::{Deserialize, Serialize};

use super::claims::Claims;

/// Terminal authorization failure for one request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct AuthorizationError {
    pub status: StatusCode,
    pub request_id: String,
    pub message: String,
}

/// JSON body returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_event_id: String,
    pub error_description: String,
}

impl AuthorizationError {
    pub fn new(status: StatusCode, request_id: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            request_id: request_id.to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, request_id, message)
    }

    pub fn internal(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, request_id, message)
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error_event_id: self.request_id.clone(),
            error_description: self.message.clone(),
        }
    }
}

/// A failed tenant-scoped check
///
/// When the token itself was fine but the tenant role was missing, `claims`
/// holds the decoded claims so the caller can record who tried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct RoleDenial {
    pub error: AuthorizationError,
    pub claims: Option<Claims>,
}

impl RoleDenial {
    pub fn status(&self) -> StatusCode {
        self.error.status
    }
}

impl From<AuthorizationError> for RoleDenial {
    fn from(error: AuthorizationError) -> Self {
        Self {
            error,
            claims: None,
        }
    }
}

#[cfg(feature = "axum")]
mod response {
    use axum::response::{IntoResponse, Json, Response};

    use super::{AuthorizationError, RoleDenial};

    impl IntoResponse for AuthorizationError {
        fn into_response(self) -> Response {
            (self.status, Json(self.body())).into_response()
        }
    }

    impl IntoResponse for RoleDenial {
        fn into_response(self) -> Response {
            self.error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape() {
        let err = AuthorizationError::unauthorized("req-1", "bad token");
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"errorEventId": "req-1", "errorDescription": "bad token"})
        );
    }

    #[test]
    fn test_display() {
        let err = AuthorizationError::internal("req-1", "boom");
        assert_eq!(err.to_string(), "500 Internal Server Error: boom");
    }

    #[test]
    fn test_denial_from_error_has_no_claims() {
        let denial = RoleDenial::from(AuthorizationError::unauthorized("r", "m"));
        assert_eq!(denial.status(), StatusCode::UNAUTHORIZED);
        assert!(denial.claims.is_none());
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_unauthorized_status() {
        use axum::response::IntoResponse;

        let response = AuthorizationError::unauthorized("r", "m").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_internal_status_through_denial() {
        use axum::response::IntoResponse;

        let response = RoleDenial::from(AuthorizationError::internal("r", "m")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
