//! No-op implementation of AuditSink for when auditing is not wired up.

use async_trait::async_trait;

use crate::domain::entities::audit::SecurityEvent;
use crate::errors::DomainError;

use super::AuditSink;

/// No-op audit sink
///
/// Logs the event at warn level so a misconfigured deployment still leaves
/// a trace, then discards it.
pub struct NoopAuditSink;

impl NoopAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, event: SecurityEvent) -> Result<(), DomainError> {
        tracing::warn!(
            kind = event.kind.as_str(),
            session_id = ?event.session_id,
            "security event dropped: no audit sink configured"
        );
        Ok(())
    }
}
