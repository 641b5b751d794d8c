//! Session revocation module: single-session and account-wide revocation.

mod service;

#[cfg(test)]
mod tests;

pub use service::RevocationService;
