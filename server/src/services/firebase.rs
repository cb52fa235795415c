// verdant-server/src/services/firebase.rs

//! Firebase Authentication ID-token verification.
//!
//! Tokens are RS256 JWTs signed by one of Google's rotating `securetoken`
//! keys. The key set is fetched on first use and cached for an hour. A token
//! naming a key id the cache does not know triggers an early refetch, at most
//! once a minute.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use verdant::{IdentityError, IdentityVerifier, VerifiedCaller};

const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
/// Unknown key ids never trigger more than one refetch per interval.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
  sub: String,
  #[serde(default)]
  email: Option<String>,
}

struct CachedKeys {
  set: JwkSet,
  fetched_at: Instant,
}

pub struct FirebaseVerifier {
  client: reqwest::Client,
  jwks_url: String,
  project_id: String,
  keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
  pub fn new(project_id: &str, jwks_url: &str) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(Self {
      client,
      jwks_url: jwks_url.to_string(),
      project_id: project_id.to_string(),
      keys: RwLock::new(None),
    })
  }

  fn issuer(&self) -> String {
    format!("https://securetoken.google.com/{}", self.project_id)
  }

  fn validation(&self) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[self.project_id.as_str()]);
    validation.set_issuer(&[self.issuer()]);
    validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
    validation
  }

  async fn fetch_keys(&self) -> Result<JwkSet, IdentityError> {
    let unavailable = |e: reqwest::Error| IdentityError::KeysUnavailable { source: e.into() };
    let set: JwkSet = self
      .client
      .get(&self.jwks_url)
      .send()
      .await
      .map_err(unavailable)?
      .error_for_status()
      .map_err(unavailable)?
      .json()
      .await
      .map_err(unavailable)?;
    info!(keys = set.keys.len(), "Fetched identity provider signing keys.");
    Ok(set)
  }

  async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
    {
      let cached = self.keys.read().await;
      if let Some(cached) = cached.as_ref() {
        if cached.fetched_at.elapsed() < KEY_CACHE_TTL {
          if let Some(jwk) = cached.set.find(kid) {
            return usable_key(jwk);
          }
        }
      }
    }

    let mut cached = self.keys.write().await;
    if let Some(current) = cached.as_ref() {
      // Another request may have refreshed while this one waited for the lock.
      let age = current.fetched_at.elapsed();
      if age < KEY_CACHE_TTL {
        if let Some(jwk) = current.set.find(kid) {
          return usable_key(jwk);
        }
      }
      if age < MIN_REFRESH_INTERVAL {
        debug!(kid, "Unknown signing key; key set was refreshed too recently to refetch.");
        return Err(unknown_kid(kid));
      }
    }

    debug!(kid, "Signing key not cached; refreshing key set.");
    let set = self.fetch_keys().await?;
    let refreshed = cached.insert(CachedKeys {
      set,
      fetched_at: Instant::now(),
    });
    match refreshed.set.find(kid) {
      Some(jwk) => usable_key(jwk),
      None => Err(unknown_kid(kid)),
    }
  }
}

fn usable_key(jwk: &Jwk) -> Result<DecodingKey, IdentityError> {
  DecodingKey::from_jwk(jwk).map_err(|e| IdentityError::Rejected(format!("unusable signing key: {}", e)))
}

fn unknown_kid(kid: &str) -> IdentityError {
  IdentityError::Rejected(format!("unknown signing key id '{}'", kid))
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
  #[instrument(name = "firebase::verify", skip_all)]
  async fn verify(&self, bearer_token: &str) -> Result<VerifiedCaller, IdentityError> {
    let header = decode_header(bearer_token).map_err(|e| IdentityError::Malformed(e.to_string()))?;
    if header.alg != Algorithm::RS256 {
      return Err(IdentityError::Rejected(format!("unexpected algorithm {:?}", header.alg)));
    }
    let kid = header
      .kid
      .ok_or_else(|| IdentityError::Malformed("token header has no key id".to_string()))?;

    let key = self.decoding_key(&kid).await?;
    let data = decode::<FirebaseClaims>(bearer_token, &key, &self.validation())
      .map_err(|e| IdentityError::Rejected(e.to_string()))?;

    if data.claims.sub.trim().is_empty() {
      return Err(IdentityError::Rejected("token has an empty subject".to_string()));
    }
    let email = data
      .claims
      .email
      .map(|e| e.trim().to_string())
      .filter(|e| !e.is_empty())
      .ok_or_else(|| IdentityError::Rejected("token carries no email".to_string()))?;
    Ok(VerifiedCaller { email })
  }
}
