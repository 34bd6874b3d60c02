//! Per-line ingestion pipeline.

use crate::alert::{AlertDispatcher, AlertEvent, AlertKind, Severity};
use crate::config::{AlertPolicy, AppConfig};
use crate::watcher::{CooldownGate, LineParser, PoolTracker, SlidingWindow};
use chrono::{Duration, Utc};
use tracing::{debug, info};

/// Tunables for the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Percent (percentage policy) or count (count policy).
    pub error_threshold: f64,
    pub alert_policy: AlertPolicy,
    /// Low end of the status range counted as an error.
    pub error_status_floor: u16,
    pub window_seconds: u64,
    pub cooldown_seconds: u64,
    pub reporter: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            error_threshold: 5.0,
            alert_policy: AlertPolicy::Percentage,
            error_status_floor: 400,
            window_seconds: 60,
            cooldown_seconds: 300,
            reporter: "poolwatch".to_string(),
        }
    }
}

impl From<&AppConfig> for MonitorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            error_threshold: config.error_threshold,
            alert_policy: config.alert_policy,
            error_status_floor: config.error_status_floor,
            window_seconds: config.window_seconds,
            cooldown_seconds: config.cooldown_seconds,
            reporter: config.reporter.clone(),
        }
    }
}

/// Owns all per-process monitoring state and runs the
/// parse → pool → window → cooldown → dispatch pipeline for each line.
///
/// One instance exists per process, created at startup and owned by the
/// tail loop; a restarted monitor starts from empty state.
pub struct Monitor {
    config: MonitorConfig,
    parser: LineParser,
    window: SlidingWindow,
    pools: PoolTracker,
    cooldown: CooldownGate,
    dispatcher: AlertDispatcher,
}

impl Monitor {
    pub fn new(config: MonitorConfig, dispatcher: AlertDispatcher) -> Self {
        let window = SlidingWindow::new(Duration::seconds(config.window_seconds as i64));
        let cooldown = CooldownGate::new(Duration::seconds(config.cooldown_seconds as i64));

        Self {
            parser: LineParser::new(),
            window,
            pools: PoolTracker::new(),
            cooldown,
            config,
            dispatcher,
        }
    }

    /// Feed one raw log line through the pipeline.
    pub async fn handle_line(&mut self, line: &str) {
        let Some(record) = self.parser.parse(line) else {
            return;
        };
        // Lines whose pool cannot be determined are excluded from pool and
        // window tracking alike.
        let Some(pool) = record.pool else {
            debug!("line has no determinable pool, skipping");
            return;
        };

        let now = Utc::now();

        if let Some(change) = self.pools.observe(&pool) {
            info!(from = %change.from, to = %change.to, "pool failover observed");
            if self.cooldown.try_fire(AlertKind::Failover, now) {
                let event =
                    AlertEvent::failover(&change.from, &change.to, &self.config.reporter);
                self.dispatcher.dispatch(event).await;
            }
        }

        self.window.record_request(now);

        if !self.is_error_status(record.status) {
            return;
        }
        self.window.record_error(now);

        match self.config.alert_policy {
            AlertPolicy::Percentage => {
                let Some(rate) = self.window.error_rate() else {
                    return;
                };
                if rate < self.config.error_threshold {
                    return;
                }
                if !self.cooldown.try_fire(AlertKind::ErrorRate, now) {
                    return;
                }
                let event = AlertEvent::new(
                    AlertKind::ErrorRate,
                    Severity::Critical,
                    "High Error Rate Detected",
                )
                .with_context(
                    "Error Rate",
                    format!(
                        "{:.2}% ({}/{} requests)",
                        rate,
                        self.window.error_count(),
                        self.window.request_count()
                    ),
                )
                .with_context("Threshold", format!("{}%", self.config.error_threshold))
                .with_context("Window", format!("{} seconds", self.config.window_seconds))
                .with_context("Current Pool", pool.as_str())
                .with_context("Detected By", self.config.reporter.as_str());
                self.dispatcher.dispatch(event).await;
            }
            AlertPolicy::Count => {
                let errors = self.window.error_count();
                if (errors as f64) < self.config.error_threshold {
                    return;
                }
                if !self.cooldown.try_fire(AlertKind::ErrorRate, now) {
                    return;
                }
                let event = AlertEvent::new(
                    AlertKind::ErrorRate,
                    Severity::Critical,
                    "High Error Rate Detected",
                )
                .with_context("Error Count", format!("{} in window", errors))
                .with_context("Threshold", format!("{} errors", self.config.error_threshold))
                .with_context("Window", format!("{} seconds", self.config.window_seconds))
                .with_context("Current Pool", pool.as_str())
                .with_context("Detected By", self.config.reporter.as_str());
                self.dispatcher.dispatch(event).await;
            }
        }
    }

    fn is_error_status(&self, status: u16) -> bool {
        (self.config.error_status_floor..=599).contains(&status)
    }

    /// The currently active pool, if any has been observed.
    pub fn current_pool(&self) -> Option<&str> {
        self.pools.current()
    }
}
