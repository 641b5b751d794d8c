//! Audit sink trait defining the interface to the audit/alerting pipeline.

use async_trait::async_trait;

use crate::domain::entities::audit::SecurityEvent;
use crate::errors::DomainError;

/// Port to the external audit collaborator
///
/// Reuse detection and revocation must reach the alerting pipeline even
/// though the client only ever sees a generic failure. Implementations
/// should not block authentication flows on slow writes.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Forward a security event to the audit pipeline
    ///
    /// # Returns
    /// * `Ok(())` on successful handoff
    /// * `Err(DomainError)` if the sink rejected the event
    async fn record(&self, event: SecurityEvent) -> Result<(), DomainError>;
}
