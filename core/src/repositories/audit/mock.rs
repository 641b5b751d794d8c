//! Recording implementation of AuditSink for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::audit::{SecurityEvent, SecurityEventKind};
use crate::errors::DomainError;

use super::AuditSink;

/// Audit sink that records every event for later inspection
pub struct MockAuditSink {
    events: Arc<RwLock<Vec<SecurityEvent>>>,
}

impl MockAuditSink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All recorded events in arrival order
    pub async fn events(&self) -> Vec<SecurityEvent> {
        self.events.read().await.clone()
    }

    /// Count of recorded events of a given kind
    pub async fn count_of(&self, kind: SecurityEventKind) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }
}

impl Default for MockAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn record(&self, event: SecurityEvent) -> Result<(), DomainError> {
        self.events.write().await.push(event);
        Ok(())
    }
}
