//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Login (credential handoff to the external verifier)
//! - Token refresh (rotation)
//! - Logout
//! - Session listing and per-session revocation

pub mod login;
pub mod logout;
pub mod refresh;
pub mod sessions;

pub use login::AppState;
