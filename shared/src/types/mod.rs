//! Type definitions shared across server crates
//!
//! - `response` - API response wrappers and error payloads

pub mod response;

pub use response::{ApiResponse, ErrorResponse};
