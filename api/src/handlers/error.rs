//! Mapping from domain errors to HTTP responses.
//!
//! Every authentication-class failure collapses into the same 401 body so
//! the API never acts as an oracle for why a token was rejected. Reuse
//! detection in particular is handled (revocation, audit) before the error
//! reaches this layer; here it is indistinguishable from any other failure.

use actix_web::HttpResponse;

use sentra_core::errors::{DomainError, TokenError};
use sentra_shared::types::ErrorResponse;

/// The single body returned for every authentication failure
fn authentication_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        "AUTHENTICATION_FAILED",
        "Authentication failed",
    ))
}

/// Handle domain errors and convert them to HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    if error.is_authentication_failure() {
        // Internal routing already happened; log the specific cause here
        // and nowhere closer to the client.
        log::warn!("authentication failure: {error}");
        return authentication_failed();
    }

    match error {
        DomainError::Token(TokenError::KeyUnavailable { key_id }) => {
            // Rotation-scheduling defect: a verifier met a key retired
            // longer than the overlap window. Service fault, not client
            // error.
            log::error!("verification key outside retention window: {key_id}");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "SERVICE_UNAVAILABLE",
                "Service temporarily unavailable",
            ))
        }
        DomainError::Timeout { operation } => {
            log::error!("store operation timed out: {operation}");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "SERVICE_UNAVAILABLE",
                "Service temporarily unavailable",
            ))
        }
        DomainError::Storage { message } => {
            log::error!("storage error: {message}");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                "SERVICE_UNAVAILABLE",
                "Service temporarily unavailable",
            ))
        }
        DomainError::NotFound { resource } => {
            log::debug!("not found: {resource}");
            HttpResponse::NotFound().json(ErrorResponse::new("NOT_FOUND", "Resource not found"))
        }
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("INVALID_REQUEST", message))
        }
        _ => {
            log::error!("internal error: {error}");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "INTERNAL_ERROR",
                "An internal error occurred",
            ))
        }
    }
}
