// ABOUTME: User-facing alerts raised by the request orchestrator on success and failure
// ABOUTME: Alert sink trait plus a queue implementation that the UI layer drains
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alerts
//!
//! The orchestrator never renders anything itself; it hands [`Alert`]s to an
//! injected [`AlertSink`]. [`AlertQueue`] keeps them in arrival order for a
//! renderer (or a test) to drain.

use crate::constants::alerts::DEFAULT_ALERT_DURATION_MS;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Neutral information
    Info,
    /// Something needs attention
    Warning,
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Text shown to the user
    pub message: String,
    /// Severity
    pub kind: AlertKind,
    /// How long the alert stays visible
    pub duration: Duration,
}

impl Alert {
    /// Create an alert with the default display duration
    #[must_use]
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            duration: Duration::from_millis(DEFAULT_ALERT_DURATION_MS),
        }
    }

    /// Success alert
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Success, message)
    }

    /// Error alert
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, message)
    }

    /// Override the display duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Destination for alerts
pub trait AlertSink: Send + Sync {
    /// Show an alert
    fn add_alert(&self, alert: Alert);
}

/// In-order alert buffer
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: Mutex<VecDeque<Alert>>,
}

impl AlertQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every queued alert, oldest first
    pub fn drain(&self) -> Vec<Alert> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Number of queued alerts
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertSink for AlertQueue {
    fn add_alert(&self, alert: Alert) {
        tracing::debug!(kind = ?alert.kind, message = %alert.message, "Alert raised");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order_and_drains() {
        let queue = AlertQueue::new();
        queue.add_alert(Alert::success("Saved"));
        queue.add_alert(Alert::error("Failed").with_duration(Duration::from_secs(5)));
        assert_eq!(queue.len(), 2);

        let alerts = queue.drain();
        assert_eq!(alerts[0].kind, AlertKind::Success);
        assert_eq!(alerts[1].message, "Failed");
        assert_eq!(alerts[1].duration, Duration::from_secs(5));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_default_duration() {
        assert_eq!(Alert::success("ok").duration, Duration::from_millis(3000));
    }
}
