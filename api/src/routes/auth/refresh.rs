use actix_web::{web, HttpResponse};

use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;

use sentra_core::repositories::{AuditSink, SessionStore};
use sentra_core::services::auth::CredentialVerifier;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token into a new access/refresh pair. Presenting an
/// already-consumed token revokes the whole session before the uniform
/// failure is returned; the response does not reveal that this happened.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
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
/// - 401 Unauthorized: Invalid, expired, revoked, or reused token (uniform body)
/// - 503 Service Unavailable: Store timeout or key retention defect
pub async fn refresh_token<S, A, V>(
    state: web::Data<AppState<S, A, V>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    A: AuditSink + 'static,
    V: CredentialVerifier + 'static,
{
    match state
        .rotation_engine
        .refresh(&request.refresh_token)
        .await
    {
        Ok(grant) => HttpResponse::Ok().json(AuthResponse::from(grant)),
        Err(error) => handle_domain_error(&error),
    }
}
