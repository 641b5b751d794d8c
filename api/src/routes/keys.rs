//! Key-distribution endpoint.
//!
//! Serves the current and overlap-window public keys by key id so any
//! verifier (this service included, plus downstream services verifying
//! access tokens on their own) can resolve a `kid` header without a shared
//! secret. Unauthenticated by design: the payload is public key material.

use actix_web::{web, HttpResponse};

use crate::dto::auth::{PublicKeyResponse, PublicKeysResponse};
use crate::handlers::error::handle_domain_error;
use crate::routes::auth::AppState;

use sentra_core::repositories::{AuditSink, SessionStore};
use sentra_core::services::auth::CredentialVerifier;

/// Handler for GET /api/v1/auth/keys
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "keys": [
///         {
///             "key_id": "...",
///             "algorithm": "EdDSA",
///             "public_key": "base64url...",
///             "retired_at": null
///         }
///     ]
/// }
/// ```
pub async fn public_keys<S, A, V>(state: web::Data<AppState<S, A, V>>) -> HttpResponse
where
    S: SessionStore + 'static,
    A: AuditSink + 'static,
    V: CredentialVerifier + 'static,
{
    match state.key_manager.public_keys() {
        Ok(keys) => HttpResponse::Ok().json(PublicKeysResponse {
            keys: keys.into_iter().map(PublicKeyResponse::from).collect(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
