//! Authentication services containing the session-lifecycle logic.

pub mod auth;
pub mod key;
pub mod revocation;
pub mod rotation;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, CredentialVerifier, MockCredentialVerifier, VerifiedIdentity};
pub use key::{KeyManager, PublicKeyEntry};
pub use revocation::RevocationService;
pub use rotation::RotationEngine;
pub use token::{IssuedTokens, TokenIssuer, TokenPolicy};
