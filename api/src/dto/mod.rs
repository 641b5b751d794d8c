//! Request and response DTOs for the HTTP surface.

pub mod auth;

pub use auth::{
    AuthResponse, LoginRequest, LogoutResponse, PublicKeyResponse, PublicKeysResponse,
    RefreshTokenRequest, SessionListResponse, SessionResponse,
};
