use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Google publishes the JWK set used to sign Firebase ID tokens here
const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// How long a fetched JWK set is trusted before it is re-fetched
const KEY_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Verified identity extracted from a Firebase ID token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
}

/// Seam between the auth extractor and the identity provider, so tests can
/// substitute a stub that never touches the network.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<TokenClaims, AppError>;
}

#[derive(Debug, Deserialize, Clone)]
struct JsonWebKey {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JsonWebKey>,
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, JsonWebKey>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn fresh(&self) -> bool {
        self.fetched_at
            .map(|at| at.elapsed() < KEY_REFRESH_INTERVAL)
            .unwrap_or(false)
    }
}

/// Validates Firebase ID tokens against Google's published signing keys
///
/// Keys are cached in-process and refreshed at most once per
/// `KEY_REFRESH_INTERVAL`; token validation pins RS256, the project id as
/// audience, and `https://securetoken.google.com/<project-id>` as issuer.
pub struct FirebaseAuth {
    project_id: String,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl FirebaseAuth {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    pub fn from_env() -> Self {
        let project_id =
            std::env::var("FIREBASE_PROJECT_ID").expect("FIREBASE_PROJECT_ID must be set");
        Self::new(project_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);
        validation
    }

    async fn signing_key(&self, kid: &str) -> Result<JsonWebKey, AppError> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| AppError::AuthError("signing key cache poisoned".to_string()))?;
            if cache.fresh() {
                if let Some(key) = cache.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        self.refresh_keys().await?;

        let cache = self
            .cache
            .read()
            .map_err(|_| AppError::AuthError("signing key cache poisoned".to_string()))?;
        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AppError::AuthError(format!("unknown signing key id: {}", kid)))
    }

    async fn refresh_keys(&self) -> Result<(), AppError> {
        log::info!("🔑 Refreshing Firebase signing keys...");

        let response = self
            .http
            .get(JWKS_URL)
            .send()
            .await
            .map_err(|e| AppError::AuthError(format!("failed to fetch signing keys: {}", e)))?;

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| AppError::AuthError(format!("failed to parse signing keys: {}", e)))?;

        let keys: HashMap<String, JsonWebKey> = jwks
            .keys
            .into_iter()
            .map(|key| (key.kid.clone(), key))
            .collect();

        log::info!("✅ Loaded {} Firebase signing keys", keys.len());

        let mut cache = self
            .cache
            .write()
            .map_err(|_| AppError::AuthError("signing key cache poisoned".to_string()))?;
        cache.keys = keys;
        cache.fetched_at = Some(Instant::now());

        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for FirebaseAuth {
    async fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        let header = decode_header(token)
            .map_err(|e| AppError::AuthError(format!("invalid token header: {}", e)))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::AuthError(format!(
                "unexpected signing algorithm: {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::AuthError("token has no key id".to_string()))?;

        let key = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AppError::AuthError(format!("invalid signing key: {}", e)))?;

        let data = decode::<TokenClaims>(token, &decoding_key, &self.validation())
            .map_err(|e| AppError::AuthError(format!("token validation failed: {}", e)))?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn hs256_token(kid: Option<&str>) -> String {
        let claims = TokenClaims {
            sub: "uid-1".to_string(),
            email: Some("donor@example.com".to_string()),
            exp: 4102444800, // 2100-01-01
        };
        let mut header = Header::new(Algorithm::HS256);
        header.kid = kid.map(|k| k.to_string());
        encode(&header, &claims, &EncodingKey::from_secret(b"secret")).unwrap()
    }

    #[test]
    fn validation_pins_audience_and_issuer() {
        let auth = FirebaseAuth::new("demo-project");
        let validation = auth.validation();

        assert!(validation.aud.as_ref().unwrap().contains("demo-project"));
        assert!(validation
            .iss
            .as_ref()
            .unwrap()
            .contains("https://securetoken.google.com/demo-project"));
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let auth = FirebaseAuth::new("demo-project");
        let result = auth.verify("not-a-jwt").await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn rejects_wrong_algorithm_before_touching_the_network() {
        let auth = FirebaseAuth::new("demo-project");
        let result = auth.verify(&hs256_token(Some("kid-1"))).await;

        match result {
            Err(AppError::AuthError(msg)) => assert!(msg.contains("algorithm")),
            other => panic!("expected auth error, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn empty_cache_is_stale() {
        let cache = KeyCache::default();
        assert!(!cache.fresh());
    }

    #[test]
    fn recently_fetched_cache_is_fresh() {
        let cache = KeyCache {
            keys: HashMap::new(),
            fetched_at: Some(Instant::now()),
        };
        assert!(cache.fresh());
    }
}
