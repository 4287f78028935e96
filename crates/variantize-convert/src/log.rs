//! Append-only record of a conversion run.
//!
//! One [`LogEntry`] per write operation, appended in phase order. The
//! log is owned by a single executor run; appends and status updates go
//! through `&mut self`, which serializes them by construction.

use serde::{Deserialize, Serialize};

/// Lifecycle of one write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Error,
}

/// One write operation and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    pub status: StepStatus,
    pub detail: Option<String>,
}

/// Ordered sequence of log entries for one run. Created fresh per
/// execution; never replayed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionLog {
    entries: Vec<LogEntry>,
}

impl ExecutionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new pending entry.
    pub fn add(&mut self, id: impl Into<String>, message: impl Into<String>) {
        self.entries.push(LogEntry {
            id: id.into(),
            message: message.into(),
            status: StepStatus::Pending,
            detail: None,
        });
    }

    pub fn mark_running(&mut self, id: &str) {
        self.update(id, StepStatus::Running, None);
    }

    pub fn mark_success(&mut self, id: &str, detail: impl Into<String>) {
        self.update(id, StepStatus::Success, Some(detail.into()));
    }

    pub fn mark_error(&mut self, id: &str, detail: impl Into<String>) {
        self.update(id, StepStatus::Error, Some(detail.into()));
    }

    fn update(&mut self, id: &str, status: StepStatus, detail: Option<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.status = status;
            if detail.is_some() {
                entry.detail = detail;
            }
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.count(StepStatus::Success)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(StepStatus::Error)
    }

    fn count(&self, status: StepStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}
