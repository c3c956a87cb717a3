//! Audit-log collaborator.
//!
//! The core emits no log calls of its own; the server records an entry after
//! each successful operation. The trait keeps the sink swappable per
//! deployment without any process-wide singleton.

use chrono::{DateTime, Utc};

/// One successfully completed merge or split.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    /// `"merge"` or `"split"`
    pub action: &'static str,
    /// Uploaded file names, as supplied by the client
    pub files: Vec<String>,
    /// Raw range text for splits
    pub range_text: Option<String>,
    /// Total pages across produced outputs
    pub output_pages: u32,
}

pub trait AuditLog: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

/// Default sink: structured log lines via `tracing`.
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, entry: AuditEntry) {
        tracing::info!(
            action = entry.action,
            files = ?entry.files,
            ranges = entry.range_text.as_deref().unwrap_or("-"),
            output_pages = entry.output_pages,
            at = %entry.at,
            "operation complete"
        );
    }
}

/// Test sink capturing entries in memory.
#[cfg(test)]
pub struct MemoryAuditLog(std::sync::Mutex<Vec<AuditEntry>>);

#[cfg(test)]
impl MemoryAuditLog {
    pub fn new() -> Self {
        Self(std::sync::Mutex::new(Vec::new()))
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.0.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl AuditLog for MemoryAuditLog {
    fn record(&self, entry: AuditEntry) {
        self.0.lock().unwrap().push(entry);
    }
}
