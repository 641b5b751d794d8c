//! Login flow: verify credentials, open a session, mint the first pair.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::domain::entities::session::Session;
use crate::domain::entities::token::RefreshTokenRecord;
use crate::domain::value_objects::token_grant::TokenGrant;
use crate::errors::DomainError;
use crate::repositories::session::SessionStore;
use crate::services::token::{TokenIssuer, TokenPolicy};

use super::verifier::CredentialVerifier;

/// Service handling login against the external credential collaborator
pub struct AuthService<S: SessionStore, V: CredentialVerifier> {
    store: Arc<S>,
    verifier: Arc<V>,
    issuer: Arc<TokenIssuer>,
    policy: TokenPolicy,
}

impl<S: SessionStore, V: CredentialVerifier> AuthService<S, V> {
    /// Creates a new auth service
    pub fn new(
        store: Arc<S>,
        verifier: Arc<V>,
        issuer: Arc<TokenIssuer>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            store,
            verifier,
            issuer,
            policy,
        }
    }

    /// Authenticates a user and opens a new session
    ///
    /// On success the first refresh-token record is persisted and the
    /// client receives the initial grant. Rejected credentials surface as
    /// the uniform `Unauthorized` outcome with no further detail.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_fingerprint: Option<String>,
    ) -> Result<TokenGrant, DomainError> {
        let identity = self
            .verifier
            .verify_credentials(username, password)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let session = Session::new(
            identity.user_id,
            device_fingerprint,
            identity.scope,
            identity.roles,
            self.policy.session_sliding_window(),
            self.policy.max_session_age(),
        );
        let session = self.store.create_session(session).await?;

        let issued = self.issuer.issue(&session)?;

        let record = RefreshTokenRecord::new(
            session.id,
            issued.refresh_token_hash.clone(),
            self.policy.refresh_token_ttl(),
        );
        self.store.insert_refresh_record(record).await?;

        tracing::info!(session_id = %session.id, user_id = %session.user_id, "session created");

        Ok(TokenGrant::new(
            issued.access_token,
            issued.refresh_token,
            session.id,
            issued.access_expires_in,
            issued.refresh_expires_in,
        ))
    }
}

/// Hashes user-agent and network origin into the advisory device fingerprint
pub fn hash_fingerprint(user_agent: &str, origin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(b"\x00");
    hasher.update(origin.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod fingerprint_tests {
    use super::hash_fingerprint;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(
            hash_fingerprint("agent", "10.0.0.0"),
            hash_fingerprint("agent", "10.0.0.0")
        );
    }

    #[test]
    fn test_fingerprint_separates_fields() {
        // The separator prevents ("ab", "c") colliding with ("a", "bc")
        assert_ne!(
            hash_fingerprint("ab", "c"),
            hash_fingerprint("a", "bc")
        );
    }
}
