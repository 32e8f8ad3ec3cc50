use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::app_config::AuditSection;
use crate::core::errors::{Result, ShopkeeperError};
use crate::core::models::audit_entry::AuditEntry;
use crate::core::traits::audit::AuditLogger;

/// Audit logger that appends entries as JSON lines to a file.
///
/// Each line in the log file is a self-contained JSON object representing
/// one `AuditEntry`. This format supports efficient append operations
/// and line-by-line streaming reads.
pub struct JsonAuditLogger {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonAuditLogger {
    /// Create a logger that writes to `{data_dir}/{log_file}`.
    pub fn new(data_dir: &Path, log_file: &str) -> Self {
        Self {
            log_path: data_dir.join(log_file),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a logger from the `[audit]` section of the configuration.
    pub fn from_config(data_dir: &Path, audit: &AuditSection) -> Self {
        Self::new(data_dir, &audit.log_file)
    }

    fn read_all(&self) -> Result<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.log_path).map_err(|e| ShopkeeperError::AuditError {
            detail: format!("Cannot read audit log: {e}"),
        })?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ShopkeeperError::AuditError {
                detail: format!("Error reading audit log line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let entry: AuditEntry =
                serde_json::from_str(trimmed).map_err(|e| ShopkeeperError::AuditError {
                    detail: format!("Malformed audit entry at line {}: {e}", line_num + 1),
                })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

impl AuditLogger for JsonAuditLogger {
    fn log_event(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry).map_err(|e| ShopkeeperError::AuditError {
            detail: format!("Failed to serialize audit entry: {e}"),
        })?;
        line.push('\n');

        let _guard = self.write_lock.lock().map_err(|_| ShopkeeperError::AuditError {
            detail: "audit log lock poisoned".into(),
        })?;

        // Ensure the parent directory exists
        if let Some(parent) = self.log_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ShopkeeperError::AuditError {
                detail: format!("Cannot open audit log at {}: {e}", self.log_path.display()),
            })?;

        file.write_all(line.as_bytes())
            .map_err(|e| ShopkeeperError::AuditError {
                detail: format!("Failed to write audit entry: {e}"),
            })?;

        Ok(())
    }

    fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        let entries = self.read_all()?;
        let take = limit.unwrap_or(entries.len());
        Ok(entries.into_iter().rev().take(take).collect())
    }
}
