use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::handle_domain_error;

use sentra_core::repositories::{AuditSink, SessionStore};
use sentra_core::services::auth::{hash_fingerprint, AuthService, CredentialVerifier};
use sentra_core::services::key::KeyManager;
use sentra_core::services::revocation::RevocationService;
use sentra_core::services::rotation::RotationEngine;
use sentra_core::services::token::TokenIssuer;
use sentra_shared::types::ErrorResponse;

/// Shared application state handed to every auth handler
pub struct AppState<S, A, V>
where
    S: SessionStore,
    A: AuditSink,
    V: CredentialVerifier,
{
    pub auth_service: Arc<AuthService<S, V>>,
    pub rotation_engine: Arc<RotationEngine<S, A>>,
    pub revocation_service: Arc<RevocationService<S, A>>,
    pub session_store: Arc<S>,
    pub token_issuer: Arc<TokenIssuer>,
    pub key_manager: Arc<KeyManager>,
}

/// Handler for POST /api/v1/auth/login
///
/// Hands the credentials to the external verifier; on success, opens a
/// session and returns the first token pair. The device fingerprint is
/// derived from the user agent and peer address, advisory only.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "opaque...",
///     "token_type": "Bearer",
///     "expires_in": 900,
///     "session_id": "..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed request body
/// - 401 Unauthorized: Credentials rejected (uniform body)
pub async fn login<S, A, V>(
    req: HttpRequest,
    state: web::Data<AppState<S, A, V>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    A: AuditSink + 'static,
    V: CredentialVerifier + 'static,
{
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("INVALID_REQUEST", errors.to_string()));
    }

    let fingerprint = device_fingerprint(&req);

    match state
        .auth_service
        .login(&request.username, &request.password, fingerprint)
        .await
    {
        Ok(grant) => HttpResponse::Ok().json(AuthResponse::from(grant)),
        Err(error) => handle_domain_error(&error),
    }
}

/// Hash of user-agent plus coarse network origin
fn device_fingerprint(req: &HttpRequest) -> Option<String> {
    let user_agent = req
        .headers()
        .get(actix_web::http::header::USER_AGENT)?
        .to_str()
        .ok()?;
    let origin = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default();

    Some(hash_fingerprint(user_agent, &origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_requires_user_agent() {
        use actix_web::test;

        let req = test::TestRequest::default().to_http_request();
        assert!(device_fingerprint(&req).is_none());

        let req = test::TestRequest::default()
            .insert_header((actix_web::http::header::USER_AGENT, "curl/8.0"))
            .to_http_request();
        let fingerprint = device_fingerprint(&req).unwrap();
        assert_eq!(fingerprint.len(), 64);
    }
}
