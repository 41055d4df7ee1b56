//! Bearer-token verification against the issuer's JWKS.

pub mod claims;
pub mod jwks;

use jsonwebtoken::jwk::KeyAlgorithm;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use crate::config::AuthConfig;
use claims::IdmClaims;
use jwks::{JwksCache, JwksError};

/// Clock skew tolerated on `exp`, `nbf` and `iat`, in seconds.
const LEEWAY_SECS: u64 = 60;

/// Reasons a request fails authentication. All map to 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingToken,

    #[error("Authorization header is not a Bearer token")]
    NotBearer,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token alg {token:?} does not match key alg {key}")]
    AlgorithmMismatch { token: Algorithm, key: KeyAlgorithm },

    #[error("token issued in the future")]
    IssuedInFuture,

    #[error(transparent)]
    Jwks(#[from] JwksError),
}

impl AuthError {
    /// Message safe to return to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Missing Authorization header",
            AuthError::NotBearer => "Invalid Authorization format. Expected: Bearer <token>",
            _ => "Invalid or expired token",
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    match header.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::NotBearer),
    }
}

/// Verifies signatures and registered claims of access tokens.
pub struct TokenVerifier {
    jwks: JwksCache,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenVerifier {
    pub fn new(jwks: JwksCache) -> Self {
        Self {
            jwks,
            issuer: None,
            audience: None,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, JwksError> {
        let jwks = JwksCache::new(
            config.jwks_url.clone(),
            config.jwks_refresh_interval,
            config.jwks_min_refetch_interval,
        )?;
        Ok(Self {
            jwks,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Verify `token` and return its claims.
    ///
    /// The signing key is chosen by the header `kid`; the header `alg` must
    /// equal the key's `alg` when the key names one, and belong to the key's
    /// family otherwise. `exp` is mandatory.
    pub async fn verify(&self, token: &str) -> Result<IdmClaims, AuthError> {
        let header = decode_header(token)?;
        let jwk = self.jwks.key_for(header.kid.as_deref()).await?;
        if let Some(key_alg) = jwk.common.key_algorithm {
            if key_alg.to_string().parse::<Algorithm>().ok() != Some(header.alg) {
                return Err(AuthError::AlgorithmMismatch {
                    token: header.alg,
                    key: key_alg,
                });
            }
        }
        let key = DecodingKey::from_jwk(&jwk)?;

        let mut validation = Validation::new(header.alg);
        validation.leeway = LEEWAY_SECS;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let claims = decode::<IdmClaims>(token, &key, &validation)?.claims;

        if let Some(iat) = claims.registered.iat {
            let now = chrono::Utc::now().timestamp();
            if iat > now + LEEWAY_SECS as i64 {
                return Err(AuthError::IssuedInFuture);
            }
        }

        Ok(claims)
    }
}
