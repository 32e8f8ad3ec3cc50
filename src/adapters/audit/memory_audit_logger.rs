use std::sync::Mutex;

use crate::core::errors::{Result, ShopkeeperError};
use crate::core::models::audit_entry::AuditEntry;
use crate::core::traits::audit::AuditLogger;

/// Audit log held in memory. Used for tests and `--ephemeral` servers.
#[derive(Default)]
pub struct MemoryAuditLogger {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLogger for MemoryAuditLogger {
    fn log_event(&self, entry: &AuditEntry) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| ShopkeeperError::AuditError {
                detail: "audit log lock poisoned".into(),
            })?
            .push(entry.clone());
        Ok(())
    }

    fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        let entries = self.entries.lock().map_err(|_| ShopkeeperError::AuditError {
            detail: "audit log lock poisoned".into(),
        })?;
        let take = limit.unwrap_or(entries.len());
        Ok(entries.iter().rev().take(take).cloned().collect())
    }
}
