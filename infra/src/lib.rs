//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Sentra service.
//! It provides the concrete, storage-backed implementation of the session
//! store contract defined in the core crate.
//!
//! ## Architecture
//!
//! - **Database**: MySQL implementation using SQLx. The refresh-protocol
//!   compare-and-swap is a conditional `UPDATE`, so correctness holds
//!   across any number of service instances with no shared memory.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlSessionStore};
