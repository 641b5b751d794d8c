//! Credential verifier port.
//!
//! Password hashing, TOTP, and account state all live in an external
//! collaborator; this service only consumes its yes/no answer plus the
//! authorization context to stamp into the session.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::DomainError;

/// Identity attributes returned by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// The authenticated user
    pub user_id: Uuid,

    /// Scope string to stamp into the session
    pub scope: String,

    /// Role names to stamp into the session
    pub roles: Vec<String>,
}

/// Port to the external credential-verification collaborator
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify a username/password pair
    ///
    /// # Returns
    /// * `Ok(Some(identity))` - Credentials valid
    /// * `Ok(None)` - Credentials rejected; the caller surfaces the same
    ///   uniform failure as any other authentication error
    /// * `Err(DomainError)` - The collaborator itself failed
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<VerifiedIdentity>, DomainError>;
}

/// In-memory credential verifier for tests and local development
pub struct MockCredentialVerifier {
    accounts: HashMap<String, (String, VerifiedIdentity)>,
}

impl MockCredentialVerifier {
    /// Create an empty verifier that rejects everyone
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Register an account
    pub fn with_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        identity: VerifiedIdentity,
    ) -> Self {
        self.accounts
            .insert(username.into(), (password.into(), identity));
        self
    }
}

impl Default for MockCredentialVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialVerifier for MockCredentialVerifier {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<VerifiedIdentity>, DomainError> {
        Ok(self
            .accounts
            .get(username)
            .filter(|(stored, _)| stored == password)
            .map(|(_, identity)| identity.clone()))
    }
}
