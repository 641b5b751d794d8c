//! Domain-specific error types and error handling.
//!
//! Token failures are deliberately coarse: outside this service every
//! token-class error collapses into one uniform "authentication failed"
//! outcome so callers cannot probe why verification failed. The variants
//! exist for internal routing (alerting, forced revocation, 5xx mapping),
//! not for client consumption.

use thiserror::Error;

/// Token and session lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, unsigned, wrong-key, or otherwise unparseable token
    #[error("Invalid token")]
    InvalidToken,

    /// Structurally valid token with violated temporal bounds
    #[error("Token expired")]
    ExpiredToken,

    /// The owning session is no longer valid
    #[error("Session revoked")]
    SessionRevoked,

    /// An already-rotated refresh token was presented.
    ///
    /// Internal-only signal: the rotation engine revokes the owning session
    /// and reports the event to the audit sink; the client sees the same
    /// generic failure as any other invalid token.
    #[error("Refresh token reuse detected")]
    ReuseDetected,

    /// Signing or verification key outside the retention window.
    ///
    /// An operational rotation-scheduling defect, not a client error.
    #[error("Signing key unavailable: {key_id}")]
    KeyUnavailable { key_id: String },

    /// Token could not be generated or signed
    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {message}")]
    Storage { message: String },

    /// A store operation did not complete within its bound. The write may
    /// or may not have happened; callers must treat it as failed and never
    /// assume success.
    #[error("Storage operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to token-specific errors
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether this error belongs to the uniform 401-equivalent class
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Unauthorized
                | DomainError::Token(
                    TokenError::InvalidToken
                        | TokenError::ExpiredToken
                        | TokenError::SessionRevoked
                        | TokenError::ReuseDetected
                )
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_are_authentication_failures() {
        for error in [
            TokenError::InvalidToken,
            TokenError::ExpiredToken,
            TokenError::SessionRevoked,
            TokenError::ReuseDetected,
        ] {
            assert!(DomainError::from(error).is_authentication_failure());
        }
    }

    #[test]
    fn test_operational_errors_are_not_authentication_failures() {
        let key_error = DomainError::from(TokenError::KeyUnavailable {
            key_id: "key-1".to_string(),
        });
        assert!(!key_error.is_authentication_failure());

        let timeout = DomainError::Timeout {
            operation: "consume_refresh_record".to_string(),
        };
        assert!(!timeout.is_authentication_failure());
    }

    #[test]
    fn test_error_messages_stay_opaque() {
        // No variant of the 401 class leaks its specific cause keyword
        // beyond what the internal log line carries.
        let message = TokenError::InvalidToken.to_string();
        assert_eq!(message, "Invalid token");
    }
}
