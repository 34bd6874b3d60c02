use std::process::ExitCode;
use std::sync::Arc;

use poolwatch::alert::{AlertDispatcher, AlertEvent, SlackNotifier};
use poolwatch::config::AppConfig;
use poolwatch::utils::logging::init_logging;
use poolwatch::watcher::{LogTailer, Monitor, MonitorConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(reporter = %config.reporter, "log watcher started");
    info!(
        path = %config.log_path.display(),
        threshold = config.error_threshold,
        policy = ?config.alert_policy,
        window_seconds = config.window_seconds,
        cooldown_seconds = config.cooldown_seconds,
        "monitoring configuration loaded"
    );

    let notifier = match config.webhook_url.as_deref() {
        Some(url) => SlackNotifier::new(url),
        None => SlackNotifier::disabled(),
    };
    let dispatcher = AlertDispatcher::new(Arc::new(notifier));
    let mut monitor = Monitor::new(MonitorConfig::from(&config), dispatcher.clone());
    let tailer = LogTailer::new(config.log_path.clone());
    let reporter = config.reporter.clone();

    let watcher = tokio::spawn(async move { tailer.run(&mut monitor).await });

    tokio::select! {
        result = watcher => {
            // The loop only exits on failure: an Err from the tailer, or a
            // JoinError when the task panicked.
            let detail = match result {
                Ok(Ok(())) => return ExitCode::SUCCESS,
                Ok(Err(e)) => e.to_string(),
                Err(join_error) => join_error.to_string(),
            };
            error!(error = %detail, "watcher loop failed");
            dispatcher
                .dispatch(AlertEvent::crash(&detail, &reporter))
                .await;
            ExitCode::FAILURE
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            ExitCode::SUCCESS
        }
    }
}
