//! Progress reporting for the route planning pipeline. Each stage hands a
//! ProgressEvent to a caller-supplied callback as soon as it finishes, so that
//! a host application can show feedback while the rest of the run continues.

use log::{error, info, warn};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A single message about the state of a route planning run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub message: String,
    pub severity: Severity,
}

impl ProgressEvent {
    /// Create a new event stamped with the current time
    pub fn now(message: impl Into<String>, severity: Severity) -> Self {
        ProgressEvent {
            timestamp: OffsetDateTime::now_utc(),
            message: message.into(),
            severity: severity,
        }
    }
}

/// Collects every event raised during a run, forwarding each one to the log
/// as it arrives. Used by the API to return the full history of a request
/// alongside its result.
#[derive(Debug, Default)]
pub struct ProgressLog {
    pub events: Vec<ProgressEvent>,
}

impl ProgressLog {
    pub fn new() -> Self {
        ProgressLog { events: Vec::new() }
    }

    pub fn record(&mut self, event: &ProgressEvent) {
        match event.severity {
            Severity::Info | Severity::Success => info!("{}", event.message),
            Severity::Warning => warn!("{}", event.message),
            Severity::Error => error!("{}", event.message),
        }
        self.events.push(event.clone());
    }
}
