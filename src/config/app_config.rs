use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Access-log location when `NGINX_LOG_PATH` is unset.
const DEFAULT_LOG_PATH: &str = "/var/log/nginx/access.log";

/// How in-window errors are compared against the threshold.
///
/// Exactly one policy is active per process; the two are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertPolicy {
    /// Fire when the error percentage reaches the threshold and the
    /// minimum sample count is in the window.
    #[default]
    Percentage,
    /// Fire when the raw in-window error count reaches the threshold.
    Count,
}

impl FromStr for AlertPolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percentage" => Ok(AlertPolicy::Percentage),
            "count" => Ok(AlertPolicy::Count),
            _ => Err("invalid alert policy: expected 'percentage' or 'count'"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Webhook target; `None` disables alert delivery entirely.
    pub webhook_url: Option<String>,
    /// File to tail.
    pub log_path: PathBuf,
    /// Percent (percentage policy) or count (count policy).
    pub error_threshold: f64,
    pub alert_policy: AlertPolicy,
    /// Low end of the status range counted as an error (400 or 500).
    pub error_status_floor: u16,
    /// Sliding window size in seconds.
    pub window_seconds: u64,
    /// Minimum gap between two alerts of the same kind, in seconds.
    pub cooldown_seconds: u64,
    /// Identity string included in alert context.
    pub reporter: String,
}

impl AppConfig {
    /// Load configuration from environment variables, applying defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = env::var("SLACK_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty());
        if webhook_url.is_none() {
            tracing::warn!("SLACK_WEBHOOK_URL not configured, alert delivery disabled");
        }

        let log_path = env::var("NGINX_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_PATH));

        let error_threshold = env::var("ERROR_THRESHOLD")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidThreshold)?;

        let alert_policy = match env::var("ERROR_ALERT_POLICY") {
            Ok(value) => value
                .parse::<AlertPolicy>()
                .map_err(|_| ConfigError::InvalidPolicy)?,
            Err(_) => AlertPolicy::default(),
        };

        let error_status_floor: u16 = env::var("ERROR_STATUS_FLOOR")
            .unwrap_or_else(|_| "400".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidStatusFloor)?;
        if !matches!(error_status_floor, 400 | 500) {
            return Err(ConfigError::InvalidStatusFloor);
        }

        let window_seconds = env::var("CHECK_WINDOW_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidWindow)?;

        let cooldown_seconds = env::var("ALERT_COOLDOWN_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidCooldown)?;

        let reporter = env::var("REPORTER").unwrap_or_else(|_| "poolwatch".to_string());

        Ok(Self {
            webhook_url,
            log_path,
            error_threshold,
            alert_policy,
            error_status_floor,
            window_seconds,
            cooldown_seconds,
            reporter,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ERROR_THRESHOLD must be a number")]
    InvalidThreshold,
    #[error("ERROR_ALERT_POLICY must be 'percentage' or 'count'")]
    InvalidPolicy,
    #[error("ERROR_STATUS_FLOOR must be 400 or 500")]
    InvalidStatusFloor,
    #[error("CHECK_WINDOW_SECONDS must be a whole number of seconds")]
    InvalidWindow,
    #[error("ALERT_COOLDOWN_SECONDS must be a whole number of seconds")]
    InvalidCooldown,
}
