/// JWKS-backed token verification
///
/// Fetches the identity provider's published key set (RFC 7517 subset),
/// caches it in-process, and validates RS256-signed bearer tokens against
/// it. The cache refresh rate is bounded so a flood of tokens with
/// unknown key ids cannot hammer the provider.
use super::{Claims, TokenVerifier};
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Issuer values Google uses for ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Minimum interval between key-set fetches.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// JWKS key structure (subset of RFC 7517)
#[derive(Debug, Clone, Deserialize)]
struct JwksKey {
    kty: String,
    kid: String,
    #[serde(default)]
    alg: Option<String>,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwks {
    keys: Vec<JwksKey>,
}

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

pub struct GoogleTokenVerifier {
    http: Client,
    jwks_uri: String,
    audience: String,
    cache: RwLock<Option<CachedKeys>>,
}

impl GoogleTokenVerifier {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            http: Client::new(),
            jwks_uri: config.jwks_uri.clone(),
            audience: config.client_id.clone(),
            cache: RwLock::new(None),
        }
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, DecodingKey>> {
        let jwks: Jwks = self
            .http
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("JWKS fetch failed: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Upstream(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JWKS response malformed: {e}")))?;

        let mut keys = HashMap::new();
        for key in jwks.keys {
            // Only asymmetric RSA signing keys participate.
            if key.kty != "RSA" {
                continue;
            }
            if let Some(alg) = &key.alg {
                if alg != "RS256" {
                    continue;
                }
            }
            if let (Some(n), Some(e)) = (&key.n, &key.e) {
                if let Ok(decoding_key) = DecodingKey::from_rsa_components(n, e) {
                    keys.insert(key.kid, decoding_key);
                }
            }
        }

        Ok(keys)
    }

    /// Look up the signing key for `kid`, refreshing the cached set when
    /// it is absent and the refresh interval has elapsed.
    async fn signing_key(&self, kid: &str) -> Result<DecodingKey> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if let Some(key) = cached.keys.get(kid) {
                    return Ok(key.clone());
                }
                if cached.fetched_at.elapsed() < MIN_REFRESH_INTERVAL {
                    return Err(AppError::Unauthorized);
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if let Some(key) = cached.keys.get(kid) {
                return Ok(key.clone());
            }
        }

        tracing::debug!(%kid, "refreshing signing-key cache");
        let keys = self.fetch_keys().await?;
        let found = keys.get(kid).cloned();
        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        found.ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims> {
        let header = decode_header(token).map_err(|_| AppError::Unauthorized)?;
        if header.alg != Algorithm::RS256 {
            return Err(AppError::Unauthorized);
        }
        let kid = header.kid.ok_or(AppError::Unauthorized)?;

        let key = self.signing_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<Claims>(token, &key, &validation).map_err(|err| {
            tracing::debug!("token rejected: {err}");
            AppError::Unauthorized
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_rsa_and_non_rs256_keys_are_skipped() {
        let jwks: Jwks = serde_json::from_value(serde_json::json!({
            "keys": [
                { "kty": "EC", "kid": "ec-key" },
                { "kty": "RSA", "kid": "hs-key", "alg": "RS384", "n": "AQAB", "e": "AQAB" },
            ]
        }))
        .unwrap();

        assert_eq!(jwks.keys.len(), 2);
        assert_eq!(jwks.keys[0].kty, "EC");
        assert_eq!(jwks.keys[1].alg.as_deref(), Some("RS384"));
    }

    #[test]
    fn jwks_parses_rfc7517_subset() {
        let jwks: Jwks = serde_json::from_str(
            r#"{"keys":[{"kty":"RSA","kid":"k1","alg":"RS256","use":"sig","n":"0vx7","e":"AQAB"}]}"#,
        )
        .unwrap();
        assert_eq!(jwks.keys[0].kid, "k1");
        assert_eq!(jwks.keys[0].n.as_deref(), Some("0vx7"));
    }
}
