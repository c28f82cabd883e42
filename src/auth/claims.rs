//! Typed claims and role-string rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Prefix shared by every HRI role
pub const HRI_PREFIX: &str = "hri_";

/// Prefix of the bare tenant-scope role
pub const TENANT_PREFIX: &str = "tenant_";

/// Verified token claims
///
/// Providers that encode authorization as a scope string fill `scope`;
/// providers that emit a JSON array fill `roles`. Both are always present
/// and empty when unused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Space-delimited scope tokens
    #[serde(default)]
    pub scope: String,
    /// Discrete role list
    #[serde(default)]
    pub roles: Vec<String>,
    /// Subject
    #[serde(rename = "sub", default)]
    pub subject: String,
    /// Audience, a single string is read as a one-element list
    #[serde(rename = "aud", default, deserialize_with = "one_or_many")]
    pub audience: Vec<String>,
}

impl Claims {
    /// Check if `candidate` is a scope token or a listed role
    ///
    /// Matching is exact: `hri_consumer` does not match inside
    /// `hri_other_hri_consumer`.
    pub fn has_role(&self, candidate: &str) -> bool {
        self.scope.split_whitespace().any(|s| s == candidate)
            || self.roles.iter().any(|r| r == candidate)
    }

    /// Check if claims contain any of the provided roles
    pub fn has_any_role(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|&candidate| self.has_role(candidate))
    }

    /// Individual scope tokens
    pub fn scopes(&self) -> Vec<&str> {
        self.scope.split_whitespace().collect()
    }

    /// Check for the bare `tenant_<tenantId>` role
    pub fn has_tenant(&self, tenant_id: &str) -> bool {
        self.has_role(&tenant_role(tenant_id))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}

/// Capability a tenant role grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalRole {
    /// Write access for data integrators
    DataIntegrator,
    /// Read access for data consumers
    DataConsumer,
    /// Internal service access
    DataInternal,
}

impl LogicalRole {
    pub const ALL: [LogicalRole; 3] = [
        LogicalRole::DataIntegrator,
        LogicalRole::DataConsumer,
        LogicalRole::DataInternal,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            LogicalRole::DataIntegrator => "_data_integrator",
            LogicalRole::DataConsumer => "_data_consumer",
            LogicalRole::DataInternal => "_data_internal",
        }
    }
}

impl fmt::Display for LogicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix().trim_start_matches('_'))
    }
}

impl FromStr for LogicalRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalRole::ALL
            .into_iter()
            .find(|role| role.suffix().trim_start_matches('_') == s)
            .ok_or_else(|| format!("unknown logical role: {}", s))
    }
}

/// Bare tenant-scope role, `tenant_<tenantId>`
pub fn tenant_role(tenant_id: &str) -> String {
    format!("{}{}", TENANT_PREFIX, tenant_id)
}

/// Role string for a capability within a tenant
///
/// ```rust
/// use hri_authz::{build_role_string, LogicalRole};
///
/// assert_eq!(
///     build_role_string("acme", LogicalRole::DataIntegrator),
///     "hri_tenant_acme_data_integrator"
/// );
/// ```
pub fn build_role_string(tenant_id: &str, role: LogicalRole) -> String {
    format!("{}{}{}", HRI_PREFIX, tenant_role(tenant_id), role.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_scope(scope: &str) -> Claims {
        Claims {
            scope: scope.to_string(),
            subject: "user123".to_string(),
            ..Claims::default()
        }
    }

    fn claims_with_roles(roles: Vec<&str>) -> Claims {
        Claims {
            roles: roles.into_iter().map(String::from).collect(),
            subject: "user123".to_string(),
            ..Claims::default()
        }
    }

    #[test]
    fn test_has_role_scope_token() {
        let claims = claims_with_scope("hri_consumer other_scope");
        assert!(claims.has_role("hri_consumer"));
        assert!(claims.has_role("other_scope"));
        assert!(!claims.has_role("hri_internal"));
    }

    #[test]
    fn test_has_role_no_substring_match() {
        let claims = claims_with_scope("hri_other_hri_consumer");
        assert!(!claims.has_role("hri_consumer"));
        assert!(!claims.has_role("hri_other"));
    }

    #[test]
    fn test_has_role_comma_neighbors_do_not_match() {
        let claims = claims_with_scope("tenant_1,tenant_2");
        assert!(!claims.has_role("tenant_1"));
        assert!(!claims.has_role("tenant_2"));
    }

    #[test]
    fn test_has_role_is_case_sensitive() {
        let claims = claims_with_scope("Tenant_1");
        assert!(!claims.has_role("tenant_1"));
    }

    #[test]
    fn test_has_role_roles_array() {
        let claims = claims_with_roles(vec!["tenant_123", "hri_tenant_123_data_consumer"]);
        assert!(claims.has_role("tenant_123"));
        assert!(claims.has_role("hri_tenant_123_data_consumer"));
        assert!(!claims.has_role("tenant_12"));
    }

    #[test]
    fn test_has_role_either_source() {
        let claims = Claims {
            scope: "tenant_a".to_string(),
            roles: vec!["tenant_b".to_string()],
            ..Claims::default()
        };
        assert!(claims.has_tenant("a"));
        assert!(claims.has_tenant("b"));
        assert!(!claims.has_tenant("c"));
    }

    #[test]
    fn test_has_role_empty_claims() {
        let claims = Claims::default();
        assert!(!claims.has_role("tenant_1"));
        assert!(!claims.has_role(""));
    }

    #[test]
    fn test_has_any_role() {
        let claims = claims_with_scope("hri_consumer");
        assert!(claims.has_any_role(&["hri_data_integrator", "hri_consumer"]));
        assert!(!claims.has_any_role(&["hri_data_integrator", "hri_internal"]));
    }

    #[test]
    fn test_scopes_extraction_collapses_whitespace() {
        let claims = claims_with_scope("  read\twrite  delete ");
        assert_eq!(claims.scopes(), vec!["read", "write", "delete"]);
    }

    #[test]
    fn test_edge_case_unicode_scope() {
        let claims = claims_with_scope("tenant_文档 write");
        assert!(claims.has_tenant("文档"));
    }

    #[test]
    fn test_deserialize_audience_string_or_list() {
        let single: Claims = serde_json::from_str(r#"{"aud": "api://hri"}"#).unwrap();
        assert_eq!(single.audience, vec!["api://hri"]);

        let many: Claims = serde_json::from_str(r#"{"aud": ["a", "b"]}"#).unwrap();
        assert_eq!(many.audience, vec!["a", "b"]);

        let missing: Claims = serde_json::from_str(r#"{"sub": "x"}"#).unwrap();
        assert!(missing.audience.is_empty());
        assert!(missing.roles.is_empty());
        assert_eq!(missing.scope, "");
    }

    #[test]
    fn test_deserialize_rejects_malformed_roles() {
        assert!(serde_json::from_str::<Claims>(r#"{"roles": "admin"}"#).is_err());
        assert!(serde_json::from_str::<Claims>(r#"{"scope": ["a"]}"#).is_err());
    }

    #[test]
    fn test_build_role_string() {
        for tenant in ["123", "acme-corp", "t_1"] {
            assert_eq!(
                build_role_string(tenant, LogicalRole::DataIntegrator),
                format!("hri_tenant_{}_data_integrator", tenant)
            );
            assert_eq!(
                build_role_string(tenant, LogicalRole::DataConsumer),
                format!("hri_tenant_{}_data_consumer", tenant)
            );
            assert_eq!(
                build_role_string(tenant, LogicalRole::DataInternal),
                format!("hri_tenant_{}_data_internal", tenant)
            );
        }
    }

    #[test]
    fn test_logical_role_parse_and_display() {
        for role in LogicalRole::ALL {
            assert_eq!(role.to_string().parse::<LogicalRole>().unwrap(), role);
        }
        assert_eq!(LogicalRole::DataConsumer.to_string(), "data_consumer");
        assert!("consumer".parse::<LogicalRole>().is_err());
    }
}
