//! Network-backed issuer resolution and JWT verification
//!
//! Nothing here is cached: every resolution fetches the discovery document
//! and every verification fetches the key set, so key rotation at the issuer
//! is picked up on the next request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde_json::Value;

use super::provider::{IssuerResolver, OidcProvider, TokenVerifier, VerifiedToken};
use super::types::{discovery_url, OidcDiscoveryDocument};
use crate::error::{Error, Result};

const RSA_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

/// Algorithms a JWK may verify
///
/// A JWK that declares `alg` verifies only that algorithm, which must belong
/// to the key's family. Otherwise every algorithm of the family is accepted.
pub fn jwk_accepted_algorithms(jwk: &jsonwebtoken::jwk::Jwk) -> Result<Vec<Algorithm>> {
    let family = match &jwk.algorithm {
        jsonwebtoken::jwk::AlgorithmParameters::RSA(_) => RSA_ALGORITHMS.to_vec(),
        jsonwebtoken::jwk::AlgorithmParameters::EllipticCurve(params) => match &params.curve {
            jsonwebtoken::jwk::EllipticCurve::P256 => vec![Algorithm::ES256],
            jsonwebtoken::jwk::EllipticCurve::P384 => vec![Algorithm::ES384],
            other => {
                return Err(Error::Verification(format!(
                    "oidc: unsupported elliptic curve for JWK: {:?}",
                    other
                )))
            }
        },
        jsonwebtoken::jwk::AlgorithmParameters::OctetKey(_) => {
            return Err(Error::Verification(
                "oidc: HMAC keys not supported for OIDC verification".to_string(),
            ))
        }
        jsonwebtoken::jwk::AlgorithmParameters::OctetKeyPair(_) => vec![Algorithm::EdDSA],
    };

    match &jwk.common.key_algorithm {
        None => Ok(family),
        Some(declared) => {
            let algorithm = declared_algorithm(declared)?;
            if family.contains(&algorithm) {
                Ok(vec![algorithm])
            } else {
                Err(Error::Verification(format!(
                    "oidc: JWK declares {:?} which does not fit its key type",
                    algorithm
                )))
            }
        }
    }
}

fn declared_algorithm(declared: &KeyAlgorithm) -> Result<Algorithm> {
    match declared {
        KeyAlgorithm::RS256 => Ok(Algorithm::RS256),
        KeyAlgorithm::RS384 => Ok(Algorithm::RS384),
        KeyAlgorithm::RS512 => Ok(Algorithm::RS512),
        KeyAlgorithm::PS256 => Ok(Algorithm::PS256),
        KeyAlgorithm::PS384 => Ok(Algorithm::PS384),
        KeyAlgorithm::PS512 => Ok(Algorithm::PS512),
        KeyAlgorithm::ES256 => Ok(Algorithm::ES256),
        KeyAlgorithm::ES384 => Ok(Algorithm::ES384),
        KeyAlgorithm::EdDSA => Ok(Algorithm::EdDSA),
        other => Err(Error::Verification(format!(
            "oidc: JWK algorithm {:?} cannot verify signatures",
            other
        ))),
    }
}

/// Resolves issuers through OIDC discovery
#[derive(Clone)]
pub struct HttpIssuerResolver {
    http_client: Client,
}

impl HttpIssuerResolver {
    /// Create a resolver with a default HTTP client
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a resolver whose HTTP calls give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http_client))
    }

    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Fetch and check the issuer's discovery document
    pub async fn get_discovery_document(&self, issuer_url: &str) -> Result<OidcDiscoveryDocument> {
        let discovery_url = discovery_url(issuer_url);
        tracing::debug!("Fetching OIDC discovery document from: {}", discovery_url);

        let response = self
            .http_client
            .get(&discovery_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                Error::ProviderUnavailable(format!("failed to fetch discovery document: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Error::ProviderUnavailable(format!(
                "discovery document fetch failed with status: {}",
                response.status()
            )));
        }

        let discovery_doc: OidcDiscoveryDocument = response.json().await.map_err(|e| {
            Error::ProviderUnavailable(format!("failed to parse discovery document: {}", e))
        })?;

        if discovery_doc.issuer.trim_end_matches('/') != issuer_url.trim_end_matches('/') {
            return Err(Error::ProviderUnavailable(format!(
                "issuer did not match the issuer returned by provider, expected {:?} got {:?}",
                issuer_url, discovery_doc.issuer
            )));
        }

        Ok(discovery_doc)
    }
}

impl Default for HttpIssuerResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IssuerResolver for HttpIssuerResolver {
    async fn resolve(&self, issuer_url: &str) -> Result<Arc<dyn OidcProvider>> {
        let discovery = self.get_discovery_document(issuer_url).await?;
        Ok(Arc::new(DiscoveredProvider::new(
            self.http_client.clone(),
            discovery,
        )))
    }
}

/// Issuer resolved through discovery
#[derive(Clone)]
pub struct DiscoveredProvider {
    http_client: Client,
    discovery: OidcDiscoveryDocument,
}

impl DiscoveredProvider {
    pub fn new(http_client: Client, discovery: OidcDiscoveryDocument) -> Self {
        Self {
            http_client,
            discovery,
        }
    }

    pub fn discovery(&self) -> &OidcDiscoveryDocument {
        &self.discovery
    }
}

impl OidcProvider for DiscoveredProvider {
    fn verifier(&self, audience_id: &str) -> Box<dyn TokenVerifier> {
        Box::new(JwksTokenVerifier {
            http_client: self.http_client.clone(),
            issuer: self.discovery.issuer.clone(),
            jwks_uri: self.discovery.jwks_uri.clone(),
            audience_id: audience_id.to_string(),
        })
    }
}

struct SigningKey {
    kid: Option<String>,
    key: DecodingKey,
    algorithms: Vec<Algorithm>,
}

/// Verifies tokens against the issuer's published key set
pub struct JwksTokenVerifier {
    http_client: Client,
    issuer: String,
    jwks_uri: String,
    audience_id: String,
}

impl JwksTokenVerifier {
    async fn fetch_keys(&self) -> Result<Vec<SigningKey>> {
        tracing::debug!("Fetching JWKS from: {}", self.jwks_uri);

        let response = self
            .http_client
            .get(&self.jwks_uri)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| signature_failure(&format!("fetching keys: {}", e)))?;

        if !response.status().is_success() {
            return Err(signature_failure(&format!(
                "fetching keys: status {}",
                response.status()
            )));
        }

        let jwks_text = response
            .text()
            .await
            .map_err(|e| signature_failure(&format!("reading keys: {}", e)))?;

        let jwk_set: JwkSet = serde_json::from_str(&jwks_text)
            .map_err(|e| signature_failure(&format!("parsing keys: {}", e)))?;

        let mut keys = Vec::with_capacity(jwk_set.keys.len());
        for jwk in &jwk_set.keys {
            let kid = jwk.common.key_id.clone();
            let label = kid.as_deref().unwrap_or("<none>");
            let key = match DecodingKey::from_jwk(jwk) {
                Ok(key) => key,
                Err(err) => {
                    tracing::warn!("Failed to create decoding key for kid {}: {}", label, err);
                    continue;
                }
            };
            match jwk_accepted_algorithms(jwk) {
                Ok(algorithms) => {
                    tracing::debug!("Parsed key {}: algorithms={:?}", label, algorithms);
                    keys.push(SigningKey {
                        kid,
                        key,
                        algorithms,
                    });
                }
                Err(e) => tracing::warn!("Unsupported algorithm for kid {}: {}", label, e),
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl TokenVerifier for JwksTokenVerifier {
    async fn verify(&self, raw_token: &str) -> Result<VerifiedToken> {
        if raw_token.split('.').count() != 3 {
            return Err(malformed("JWS format must have three parts"));
        }

        let header = decode_header(raw_token)
            .map_err(|e| malformed(&format!("failed to parse JWT header: {}", e)))?;
        let unverified = peek_payload(raw_token)?;

        let keys = self.fetch_keys().await?;
        let signing_key = select_key(&keys, header.kid.as_deref())?;

        if !signing_key.algorithms.contains(&header.alg) {
            return Err(signature_failure(&format!(
                "token algorithm {:?} is not accepted by the key, expected one of {:?}",
                header.alg, signing_key.algorithms
            )));
        }

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience_id]);

        let token_data = decode::<Value>(raw_token, &signing_key.key, &validation).map_err(|e| {
            Error::Verification(describe_rejection(
                &e,
                &unverified,
                &self.issuer,
                &self.audience_id,
            ))
        })?;

        Ok(VerifiedToken::new(token_data.claims))
    }
}

fn malformed(detail: &str) -> Error {
    Error::Verification(format!("oidc: malformed jwt: {}", detail))
}

fn signature_failure(detail: &str) -> Error {
    Error::Verification(format!("oidc: failed to verify signature: {}", detail))
}

/// Decode the payload segment without checking the signature
fn peek_payload(raw_token: &str) -> Result<Value> {
    let segment = raw_token.split('.').nth(1).unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| malformed(&format!("failed to decode JWT payload: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| malformed(&format!("failed to unmarshal claims: {}", e)))
}

fn select_key<'a>(keys: &'a [SigningKey], kid: Option<&str>) -> Result<&'a SigningKey> {
    match kid {
        Some(kid) => keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or_else(|| signature_failure(&format!("no key found for kid {}", kid))),
        None => match keys {
            [only] => Ok(only),
            _ => Err(signature_failure(
                "token has no kid and the key set does not hold exactly one key",
            )),
        },
    }
}

/// Phrase a `jsonwebtoken` rejection the way OIDC verifiers report it
fn describe_rejection(
    err: &jsonwebtoken::errors::Error,
    payload: &Value,
    issuer: &str,
    audience_id: &str,
) -> String {
    let claim = |name: &str| payload.get(name).map(Value::to_string).unwrap_or_default();
    match err.kind() {
        ErrorKind::ExpiredSignature => {
            let expiry = payload
                .get("exp")
                .and_then(Value::as_i64)
                .map(|exp| exp.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("oidc: token is expired (Token Expiry: {})", expiry)
        }
        ErrorKind::InvalidAudience => format!(
            "oidc: expected audience {:?} got {}",
            audience_id,
            claim("aud")
        ),
        ErrorKind::InvalidIssuer => format!(
            "oidc: id token issued by a different provider, expected {:?} got {}",
            issuer,
            claim("iss")
        ),
        ErrorKind::InvalidSignature => format!("oidc: failed to verify signature: {}", err),
        ErrorKind::ImmatureSignature => "oidc: current time before the nbf (not before) time".to_string(),
        ErrorKind::MissingRequiredClaim(name) => {
            format!("oidc: token is missing required claim {:?}", name)
        }
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            format!("oidc: malformed jwt: {}", err)
        }
        _ => format!("oidc: {}", err),
    }
}
