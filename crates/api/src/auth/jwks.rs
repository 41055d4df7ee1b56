//! Cached JSON Web Key Set.
//!
//! Keys are fetched from the issuer's JWKS endpoint and kept behind a
//! [`RwLock`]. The set is refetched when it is older than the refresh
//! interval, or when a token names a `kid` the cache does not know. Refetches
//! are spaced by at least the minimum refetch interval so a flood of tokens
//! with a bogus `kid` cannot hammer the issuer.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::{Mutex, RwLock};
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("no signing key found for kid {0:?}")]
    UnknownKey(Option<String>),
}

enum KeySource {
    Remote { client: reqwest::Client, url: Url },
    /// Fixed key set that is never refetched.
    Static,
}

struct CachedKeys {
    keys: JwkSet,
    /// Last successful fetch.
    fetched_at: Option<Instant>,
    /// Last fetch attempt, successful or not.
    attempted_at: Option<Instant>,
}

pub struct JwksCache {
    source: KeySource,
    state: RwLock<CachedKeys>,
    /// Held for the duration of a fetch, never together with a `state` guard.
    refresh: Mutex<()>,
    refresh_interval: Duration,
    min_refetch_interval: Duration,
}

impl JwksCache {
    /// Cache backed by `url`. Nothing is fetched until the first lookup.
    pub fn new(
        url: Url,
        refresh_interval: Duration,
        min_refetch_interval: Duration,
    ) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            source: KeySource::Remote { client, url },
            state: RwLock::new(CachedKeys {
                keys: JwkSet { keys: Vec::new() },
                fetched_at: None,
                attempted_at: None,
            }),
            refresh: Mutex::new(()),
            refresh_interval,
            min_refetch_interval,
        })
    }

    /// Cache over a fixed key set.
    pub fn from_key_set(keys: JwkSet) -> Self {
        Self {
            source: KeySource::Static,
            state: RwLock::new(CachedKeys {
                keys,
                fetched_at: None,
                attempted_at: None,
            }),
            refresh: Mutex::new(()),
            refresh_interval: Duration::MAX,
            min_refetch_interval: Duration::MAX,
        }
    }

    /// Key matching `kid`. Without a `kid` the set must hold exactly one key.
    pub async fn key_for(&self, kid: Option<&str>) -> Result<Jwk, JwksError> {
        {
            let cached = self.state.read().await;
            if let Some(key) = select(&cached.keys, kid) {
                if !self.is_stale(&cached) {
                    return Ok(key.clone());
                }
            }
        }

        let KeySource::Remote { client, url } = &self.source else {
            return Err(unknown(kid));
        };

        // One refresh at a time. The state lock is not held across the fetch.
        let _refresh = self.refresh.lock().await;

        let known = {
            let cached = self.state.read().await;
            // Another task may have refreshed while this one waited.
            let known = select(&cached.keys, kid).cloned();
            if !self.is_stale(&cached) {
                if let Some(key) = known {
                    return Ok(key);
                }
            }
            if !self.refetch_allowed(&cached) {
                return known.ok_or_else(|| unknown(kid));
            }
            known
        };

        let attempted_at = Instant::now();
        self.state.write().await.attempted_at = Some(attempted_at);

        let keys = match fetch(client, url).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "JWKS refresh failed");
                return known.ok_or(err);
            }
        };
        tracing::debug!(url = %url, keys = keys.keys.len(), "JWKS refreshed");

        let mut cached = self.state.write().await;
        cached.keys = keys;
        cached.fetched_at = Some(attempted_at);
        select(&cached.keys, kid).cloned().ok_or_else(|| unknown(kid))
    }

    fn is_stale(&self, cached: &CachedKeys) -> bool {
        match (&self.source, cached.fetched_at) {
            (KeySource::Static, _) => false,
            (KeySource::Remote { .. }, None) => true,
            (KeySource::Remote { .. }, Some(at)) => at.elapsed() >= self.refresh_interval,
        }
    }

    fn refetch_allowed(&self, cached: &CachedKeys) -> bool {
        cached
            .attempted_at
            .map_or(true, |at| at.elapsed() >= self.min_refetch_interval)
    }
}

async fn fetch(client: &reqwest::Client, url: &Url) -> Result<JwkSet, JwksError> {
    let keys = client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await?;
    Ok(keys)
}

fn select<'a>(keys: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    match kid {
        Some(kid) => keys.find(kid),
        None if keys.keys.len() == 1 => keys.keys.first(),
        None => None,
    }
}

fn unknown(kid: Option<&str>) -> JwksError {
    JwksError::UnknownKey(kid.map(str::to_string))
}
