//! # Sentra Core
//!
//! Core domain and session-lifecycle services for the Sentra backend.
//! This crate contains the domain entities, the session-store and audit
//! ports, the token issuance and rotation services, and the error types
//! that form the foundation of the service architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
