//! Token issuance module
//!
//! This module handles minting of access/refresh token pairs and local
//! verification of access tokens:
//! - EdDSA-signed access tokens carrying the signing key id in the header
//! - Opaque, high-entropy refresh tokens hashed before storage
//! - Policy configuration for lifetimes and claims

mod config;
mod issuer;


pub use config::{TokenPolicy, DEFAULT_AUDIENCE, DEFAULT_ISSUER};
pub use issuer::{IssuedTokens, TokenIssuer};
