use actix_web::{web, HttpResponse};

use crate::dto::auth::LogoutResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use sentra_core::repositories::{AuditSink, SessionStore};
use sentra_core::services::auth::CredentialVerifier;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the caller's current session and its whole refresh-token chain.
/// The access token used to authenticate this call stays valid until its
/// natural expiry; only refresh dies immediately.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
pub async fn logout<S, A, V>(
    state: web::Data<AppState<S, A, V>>,
    auth: AuthContext,
) -> HttpResponse
where
    S: SessionStore + 'static,
    A: AuditSink + 'static,
    V: CredentialVerifier + 'static,
{
    match state
        .revocation_service
        .revoke_session(auth.session_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
