//! Per-resolution decision log.
//!
//! A [`TraceSink`] receives every server selection, reply classification and
//! outcome of a resolution. Sinks observe; they never influence control flow.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub level: TraceLevel,
    pub message: String,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            TraceLevel::Info => "info",
            TraceLevel::Warn => "warn",
            TraceLevel::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

pub trait TraceSink: Send + Sync {
    fn record(&self, level: TraceLevel, message: String);

    fn info(&self, message: String) {
        self.record(TraceLevel::Info, message);
    }

    fn warn(&self, message: String) {
        self.record(TraceLevel::Warn, message);
    }

    fn error(&self, message: String) {
        self.record(TraceLevel::Error, message);
    }
}

/// Collects entries in order. Each entry is also emitted as a `tracing`
/// debug event.
#[derive(Debug, Default)]
pub struct TraceLog {
    entries: Mutex<Vec<TraceEntry>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<TraceEntry> {
        self.lock().clone()
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries.into_inner().unwrap_or_else(|p| p.into_inner())
    }

    pub fn has_errors(&self) -> bool {
        self.lock().iter().any(|e| e.level == TraceLevel::Error)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TraceEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl TraceSink for TraceLog {
    fn record(&self, level: TraceLevel, message: String) {
        tracing::debug!(target: "dnstrace::trace", level = ?level, "{}", message);
        self.lock().push(TraceEntry { level, message });
    }
}
