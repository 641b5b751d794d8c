//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the bearer token from the Authorization header, verifies it
//! through the token issuer (signature, key id, temporal claims), and
//! injects the caller's context into the request. Verification is local:
//! no session-store access on this path.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use sentra_core::domain::entities::token::Claims;
use sentra_core::errors::{DomainError, TokenError};
use sentra_core::services::token::TokenIssuer;

/// Caller context injected into authenticated requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from JWT claims
    pub user_id: Uuid,
    /// Session the access token belongs to
    pub session_id: Uuid,
    /// Scope string from the claims
    pub scope: String,
    /// Role names from the claims
    pub roles: Vec<String>,
    /// JWT ID for tracing
    pub jti: String,
}

impl AuthContext {
    /// Creates an authentication context from verified claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
        let session_id = claims
            .session_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;

        Ok(Self {
            user_id,
            session_id,
            scope: claims.scope,
            roles: claims.roles,
            jti: claims.jti,
        })
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    issuer: Arc<TokenIssuer>,
}

impl JwtAuth {
    /// Creates the middleware around a token issuer
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            issuer: self.issuer.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let issuer = self.issuer.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Err(ErrorUnauthorized("Authentication failed")),
            };

            // One generic rejection regardless of cause; the specific
            // reason stays in the server log.
            let claims = match issuer.verify_access_token(&token) {
                Ok(claims) => claims,
                Err(error) => {
                    log::warn!("access token rejected: {error}");
                    return Err(ErrorUnauthorized("Authentication failed"));
                }
            };

            let auth_context = match AuthContext::from_claims(claims) {
                Ok(context) => context,
                Err(error) => {
                    log::warn!("access token claims rejected: {error}");
                    return Err(ErrorUnauthorized("Authentication failed"));
                }
            };

            req.extensions_mut().insert(auth_context);

            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication failed"));

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }

    #[test]
    fn test_auth_context_from_claims() {
        use chrono::Duration;

        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let claims = Claims::new_access_token(
            user_id,
            session_id,
            "session".to_string(),
            vec!["user".to_string()],
            "sentra",
            "sentra-api",
            Duration::minutes(15),
        );

        let context = AuthContext::from_claims(claims).unwrap();
        assert_eq!(context.user_id, user_id);
        assert_eq!(context.session_id, session_id);
        assert_eq!(context.roles, vec!["user".to_string()]);
    }

    #[test]
    fn test_auth_context_rejects_malformed_subject() {
        use chrono::Duration;

        let mut claims = Claims::new_access_token(
            Uuid::new_v4(),
            Uuid::new_v4(),
            String::new(),
            Vec::new(),
            "sentra",
            "sentra-api",
            Duration::minutes(15),
        );
        claims.sub = "not-a-uuid".to_string();

        assert!(AuthContext::from_claims(claims).is_err());
    }
}
