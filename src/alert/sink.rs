//! Notification sink abstraction and best-effort dispatch.

use crate::alert::AlertEvent;
use crate::utils::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Delivery target for alerts.
///
/// Implementations must bound their own send time; the dispatcher never
/// retries and never surfaces a transport failure to the ingestion path.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one alert event.
    async fn send(&self, event: &AlertEvent) -> Result<(), AppError>;
}

/// Best-effort alert delivery.
///
/// An alert that fails to send is logged and dropped, not queued or
/// retried; sustained outages must not build a backlog.
#[derive(Clone)]
pub struct AlertDispatcher {
    sink: Arc<dyn NotificationSink>,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Hand `event` to the sink, swallowing any transport error.
    pub async fn dispatch(&self, event: AlertEvent) {
        match self.sink.send(&event).await {
            Ok(()) => debug!(kind = %event.kind, "alert dispatched"),
            Err(e) => {
                warn!(kind = %event.kind, error = %e, "alert delivery failed, dropping");
            }
        }
    }
}

/// Sink that records events in memory instead of delivering them.
/// Test support.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything dispatched so far.
    pub async fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, event: &AlertEvent) -> Result<(), AppError> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertKind, Severity};

    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn send(&self, _event: &AlertEvent) -> Result<(), AppError> {
            Err(AppError::Notify("endpoint unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn should_swallow_sink_failures() {
        // Arrange
        let dispatcher = AlertDispatcher::new(Arc::new(FailingSink));
        let event = AlertEvent::new(AlertKind::ErrorRate, Severity::Critical, "Test");

        // Act - must not panic or propagate
        dispatcher.dispatch(event).await;
    }

    #[tokio::test]
    async fn should_record_dispatched_events() {
        // Arrange
        let sink = Arc::new(RecordingSink::new());
        let dispatcher = AlertDispatcher::new(sink.clone());

        // Act
        dispatcher
            .dispatch(AlertEvent::failover("blue", "green", "tester"))
            .await;

        // Assert
        let events = sink.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AlertKind::Failover);
    }
}
