//! Slack webhook sink.
//!
//! Renders alert events as Block Kit messages and posts them to an
//! incoming-webhook URL with a bounded send timeout.

use crate::alert::{AlertEvent, AlertKind, NotificationSink};
use crate::utils::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on a single webhook POST, connect included.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Slack webhook message payload
#[derive(Debug, Serialize)]
pub struct SlackMessage {
    pub blocks: Vec<SlackBlock>,
}

/// One Block Kit block (`header` or `section`).
#[derive(Debug, Clone, Serialize)]
pub struct SlackBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SlackText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<SlackText>>,
}

impl SlackBlock {
    fn header(text: impl Into<String>) -> Self {
        Self {
            block_type: "header".to_string(),
            text: Some(SlackText::plain(text)),
            fields: None,
        }
    }

    fn section(text: SlackText) -> Self {
        Self {
            block_type: "section".to_string(),
            text: Some(text),
            fields: None,
        }
    }

    fn field_grid(fields: Vec<SlackText>) -> Self {
        Self {
            block_type: "section".to_string(),
            text: None,
            fields: Some(fields),
        }
    }
}

/// Block Kit text object (`plain_text` or `mrkdwn`).
#[derive(Debug, Clone, Serialize)]
pub struct SlackText {
    #[serde(rename = "type")]
    pub text_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<bool>,
}

impl SlackText {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text_type: "plain_text".to_string(),
            text: text.into(),
            emoji: Some(true),
        }
    }

    fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            text_type: "mrkdwn".to_string(),
            text: text.into(),
            emoji: None,
        }
    }
}

/// Slack alert sink
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    /// Webhook URL
    webhook_url: String,
    /// HTTP client
    client: Client,
    /// Whether alerts are enabled
    enabled: bool,
}

impl SlackNotifier {
    /// Create a new Slack sink for the given webhook URL.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("failed to build webhook HTTP client");

        Self {
            webhook_url: webhook_url.into(),
            client,
            enabled: true,
        }
    }

    /// Create a disabled sink; every send is a silent no-op.
    pub fn disabled() -> Self {
        Self {
            webhook_url: String::new(),
            client: Client::new(),
            enabled: false,
        }
    }

    /// Check if alerts are enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.webhook_url.is_empty()
    }

    /// Get the webhook URL (for testing)
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl NotificationSink for SlackNotifier {
    async fn send(&self, event: &AlertEvent) -> Result<(), AppError> {
        if !self.is_enabled() {
            debug!("slack alerts disabled, skipping");
            return Ok(());
        }

        let payload = build_message(event);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notify(format!("failed to send Slack webhook: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notify(format!(
                "Slack webhook error: {} - {}",
                status, body
            )));
        }

        info!(kind = %event.kind, severity = %event.severity, "slack alert sent");
        Ok(())
    }
}

/// Render an alert into Block Kit blocks: a header with a kind-specific
/// emoji, a severity + context field grid, and an action checklist where
/// one exists for the kind.
fn build_message(event: &AlertEvent) -> SlackMessage {
    let emoji = match event.kind {
        AlertKind::Failover => "🔄",
        AlertKind::ErrorRate => "⚠️",
        AlertKind::Crash => "🔥",
    };

    let mut blocks = vec![SlackBlock::header(format!("{} {}", emoji, event.title))];

    let mut fields = vec![SlackText::mrkdwn(format!(
        "*Severity:*\n{}",
        event.severity.to_string().to_uppercase()
    ))];
    fields.extend(
        event
            .context
            .iter()
            .map(|(name, value)| SlackText::mrkdwn(format!("*{}:*\n{}", name, value))),
    );
    fields.push(SlackText::mrkdwn(format!(
        "*At:*\n{}",
        event.timestamp.to_rfc3339()
    )));
    blocks.push(SlackBlock::field_grid(fields));

    if let Some(action) = action_text(event.kind) {
        blocks.push(SlackBlock::section(SlackText::mrkdwn(action)));
    }

    SlackMessage { blocks }
}

/// Fixed operator checklist per alert kind.
fn action_text(kind: AlertKind) -> Option<&'static str> {
    match kind {
        AlertKind::Failover => Some(
            "*Action Required:*\n\
             • Check health of the previous pool's containers\n\
             • Review application logs\n\
             • Verify the new pool is handling traffic correctly",
        ),
        AlertKind::ErrorRate => Some(
            "*Action Required:*\n\
             • Check upstream application health\n\
             • Review error logs\n\
             • Consider toggling pools if the issue persists",
        ),
        AlertKind::Crash => None,
    }
}
