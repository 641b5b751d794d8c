//! Audit sink module: the port to the external audit/alerting collaborator.

mod r#trait;
pub use r#trait::AuditSink;

mod noop;
pub use noop::NoopAuditSink;

mod mock;
pub use mock::MockAuditSink;
