//! Error types for authorization internals

/// Crate error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discovery of the issuer failed for any reason
    #[error("{0}")]
    ProviderUnavailable(String),

    /// Verifier rejection, rendered exactly as the verifier phrased it
    #[error("{0}")]
    Verification(String),

    /// Verified token whose claims do not fit [`crate::Claims`]
    #[error("{0}")]
    ClaimsDecode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_error_is_unprefixed() {
        let err = Error::Verification("oidc: malformed jwt: bad header".to_string());
        assert_eq!(err.to_string(), "oidc: malformed jwt: bad header");
    }

    #[test]
    fn test_config_error_is_prefixed() {
        let err = Error::Config("missing [oidc]".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing [oidc]");
    }
}
