use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditEntry;

/// Port for recording and querying audit events.
pub trait AuditLogger: Send + Sync {
    /// Append an entry to the audit log.
    fn log_event(&self, entry: &AuditEntry) -> Result<()>;

    /// Most recent entries first. `None` returns the whole log.
    fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>>;
}
