const BEARER_PREFIX: &str = "bearer ";

/// Strip a case-insensitive `Bearer ` prefix from an `Authorization` value
///
/// Values without the prefix are returned unchanged. Only one prefix is
/// stripped, so `Bearer bearer x` yields `bearer x`.
///
/// ```rust
/// use hri_authz::strip_bearer_prefix;
///
/// assert_eq!(strip_bearer_prefix("Bearer abc.def.ghi"), "abc.def.ghi");
/// assert_eq!(strip_bearer_prefix("bearer abc.def.ghi"), "abc.def.ghi");
/// assert_eq!(strip_bearer_prefix("abc.def.ghi"), "abc.def.ghi");
/// ```
pub fn strip_bearer_prefix(header: &str) -> &str {
    match header.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            &header[BEARER_PREFIX.len()..]
        }
        _ => header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_variants() {
        assert_eq!(strip_bearer_prefix("Bearer tok"), "tok");
        assert_eq!(strip_bearer_prefix("bearer tok"), "tok");
        assert_eq!(strip_bearer_prefix("BEARER tok"), "tok");
    }

    #[test]
    fn test_strip_is_idempotent() {
        for header in ["Bearer a.b.c", "bearer a.b.c", "a.b.c", "", "Basic dXNlcjpwYXNz"] {
            let once = strip_bearer_prefix(header);
            assert_eq!(strip_bearer_prefix(once), once);
        }
    }

    #[test]
    fn test_only_one_prefix_is_stripped() {
        assert_eq!(strip_bearer_prefix("Bearer bearer x"), "bearer x");
    }

    #[test]
    fn test_no_space_is_not_a_prefix() {
        assert_eq!(strip_bearer_prefix("Bearertoken"), "Bearertoken");
    }

    #[test]
    fn test_short_and_multibyte_headers() {
        assert_eq!(strip_bearer_prefix("Bear"), "Bear");
        assert_eq!(strip_bearer_prefix("Beäre tok"), "Beäre tok");
    }
}
