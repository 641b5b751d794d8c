//! Signing-key management for access-token issuance and verification.

mod manager;

#[cfg(test)]
mod tests;

pub use manager::{KeyManager, PublicKeyEntry};
