//! Alert event model.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Alert kinds. Each kind has its own cooldown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// The active backend pool changed.
    Failover,
    /// In-window errors crossed the configured threshold.
    ErrorRate,
    /// The watcher loop itself died.
    Crash,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Failover => write!(f, "failover"),
            AlertKind::ErrorRate => write!(f, "error_rate"),
            AlertKind::Crash => write!(f, "crash"),
        }
    }
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    /// Needs attention, service still serving traffic.
    #[default]
    Warning,
    /// Service health is degraded or the watcher is down.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A single alert, constructed on the ingestion path, handed to the
/// notification sink, and discarded.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    /// Unique event ID
    pub id: Uuid,
    pub kind: AlertKind,
    pub severity: Severity,
    /// Human-readable title, e.g. "Failover Detected".
    pub title: String,
    /// Ordered context fields rendered into the payload.
    pub context: Vec<(String, String)>,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    /// Create a new alert event with empty context.
    pub fn new(kind: AlertKind, severity: Severity, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            title: title.into(),
            context: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Append a context field.
    pub fn with_context(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((name.into(), value.into()));
        self
    }

    /// Failover alert carrying the pools involved.
    pub fn failover(from: &str, to: &str, reporter: &str) -> Self {
        Self::new(AlertKind::Failover, Severity::Warning, "Failover Detected")
            .with_context("From Pool", from)
            .with_context("To Pool", to)
            .with_context("Detected By", reporter)
    }

    /// Crash alert carrying the failure detail. Best-effort by nature: the
    /// process is about to exit when this is built.
    pub fn crash(detail: &str, reporter: &str) -> Self {
        Self::new(AlertKind::Crash, Severity::Critical, "Watcher Crashed")
            .with_context("Error", detail)
            .with_context("Detected By", reporter)
    }
}
