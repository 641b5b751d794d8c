//! Access/refresh token minting and access-token verification.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::entities::session::Session;
use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};
use crate::services::key::KeyManager;

use super::config::TokenPolicy;

/// Length of the opaque refresh-token string
const REFRESH_TOKEN_LENGTH: usize = 48;

/// The output of one issuance: the client-visible pair plus the hash the
/// store keeps
///
/// The cleartext refresh token exists only in this value and the response
/// built from it; the service persists nothing but `refresh_token_hash`.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token, client-visible exactly once
    pub refresh_token: String,

    /// SHA-256 hex hash of the refresh token, for storage
    pub refresh_token_hash: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

/// Service minting token pairs and verifying access tokens
///
/// Stateless apart from key lookups: verification never touches the session
/// store, which keeps request authorization lock-free and horizontally
/// scalable.
pub struct TokenIssuer {
    keys: Arc<KeyManager>,
    policy: TokenPolicy,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates a new token issuer
    pub fn new(keys: Arc<KeyManager>, policy: TokenPolicy) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[&policy.issuer]);
        validation.set_audience(&[&policy.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            keys,
            policy,
            validation,
        }
    }

    /// The policy this issuer operates under
    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Mints a fresh access/refresh pair for a session
    ///
    /// The access token carries a new `jti` and the current signing key's
    /// id in its header. The refresh token is cryptographically random and
    /// opaque; only its hash is returned for persistence.
    pub fn issue(&self, session: &Session) -> Result<IssuedTokens, DomainError> {
        let claims = Claims::new_access_token(
            session.user_id,
            session.id,
            session.scope.clone(),
            session.roles.clone(),
            &self.policy.issuer,
            &self.policy.audience,
            self.policy.access_token_ttl(),
        );

        let (key_id, encoding_key) = self.keys.current_signing_key()?;
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(key_id);

        let access_token = encode(&header, &claims, &encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        let refresh_token = generate_refresh_token();
        let refresh_token_hash = Self::hash_token(&refresh_token);

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            refresh_token_hash,
            access_expires_in: self.policy.access_token_ttl_secs,
            refresh_expires_in: self.policy.refresh_token_ttl_secs,
        })
    }

    /// Verifies an access token and returns its claims
    ///
    /// Resolves the verification key from the token's `kid` header, then
    /// checks signature, issuer, audience, and temporal bounds. Failures
    /// collapse into `InvalidToken`/`ExpiredToken` so callers cannot probe
    /// the specific cause; only an over-retired signing key surfaces
    /// separately, as the operational `KeyUnavailable`.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let header =
            decode_header(token).map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
        let key_id = header
            .kid
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;

        let decoding_key = self.keys.decoding_key(&key_id)?;

        let token_data =
            decode::<Claims>(token, &decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature
                    | jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        DomainError::Token(TokenError::ExpiredToken)
                    }
                    _ => DomainError::Token(TokenError::InvalidToken),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Hashes a token for storage or lookup
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Generates a random alphanumeric refresh token
fn generate_refresh_token() -> String {
    let mut rng = rand::thread_rng();
    (0..REFRESH_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..62);
            match idx {
                0..10 => (b'0' + idx) as char,
                10..36 => (b'a' + idx - 10) as char,
                36..62 => (b'A' + idx - 36) as char,
                _ => unreachable!(),
            }
        })
        .collect()
}
