pub mod audit;
pub mod session;

pub use audit::{AuditSink, MockAuditSink, NoopAuditSink};
pub use session::{MockSessionStore, SessionStore};
