//! Session store module: the durable record of sessions and refresh tokens.

mod r#trait;
pub use r#trait::SessionStore;

pub mod mock;
pub use mock::MockSessionStore;

#[cfg(test)]
mod tests;
