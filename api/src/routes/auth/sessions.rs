use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::auth::{LogoutResponse, SessionListResponse, SessionResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use sentra_core::errors::DomainError;
use sentra_core::repositories::{AuditSink, SessionStore};
use sentra_core::services::auth::CredentialVerifier;

use super::AppState;

/// Handler for GET /api/v1/auth/sessions
///
/// Lists the caller's non-revoked sessions with device metadata. Read-only;
/// no token material is ever included.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "sessions": [
///         {
///             "session_id": "...",
///             "device_fingerprint": "...",
///             "created_at": "...",
///             "last_refreshed_at": "...",
///             "expires_at": "...",
///             "current": true
///         }
///     ]
/// }
/// ```
pub async fn list_sessions<S, A, V>(
    state: web::Data<AppState<S, A, V>>,
    auth: AuthContext,
) -> HttpResponse
where
    S: SessionStore + 'static,
    A: AuditSink + 'static,
    V: CredentialVerifier + 'static,
{
    match state.session_store.find_sessions_by_user(auth.user_id).await {
        Ok(sessions) => {
            let sessions = sessions
                .iter()
                .filter(|s| !s.is_revoked())
                .map(|s| SessionResponse::from_session(s, auth.session_id))
                .collect();

            HttpResponse::Ok().json(SessionListResponse { sessions })
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for DELETE /api/v1/auth/sessions/{sid}
///
/// Revokes one of the caller's sessions, for "sign out that device".
/// A session that does not exist and a session owned by someone else are
/// both reported as not found, so the endpoint cannot be used to probe
/// for session ids.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Session revoked"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 404 Not Found: Unknown session or not owned by the caller
pub async fn revoke_session<S, A, V>(
    state: web::Data<AppState<S, A, V>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    A: AuditSink + 'static,
    V: CredentialVerifier + 'static,
{
    let session_id = path.into_inner();

    // Ownership check before any mutation
    let owned = match state.session_store.find_session(session_id).await {
        Ok(Some(session)) => session.user_id == auth.user_id,
        Ok(None) => false,
        Err(error) => return handle_domain_error(&error),
    };

    if !owned {
        return handle_domain_error(&DomainError::NotFound {
            resource: format!("session {session_id}"),
        });
    }

    match state.revocation_service.revoke_session(session_id).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Session revoked".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
