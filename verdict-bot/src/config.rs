//! Bot configuration
//!
//! Defines the credentials, endpoints and timing parameters of the bot.
//! Values come from environment variables (optionally seeded from a
//! `.env` file).

use std::time::Duration;
use verdict_core::StatusError;

/// Default homework status endpoint
pub const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Pause between poll cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(600);

/// How far back the first (and every) fetch window reaches: 30 days
pub const DEFAULT_LOOKBACK_PERIOD: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Bot configuration
#[derive(Clone)]
pub struct Config {
    /// OAuth token for the status API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Status API endpoint
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// How long to sleep after each poll cycle
    pub poll_interval: Duration,

    /// Distance between startup time and the fetch cursor
    pub lookback_period: Duration,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
}

// Tokens never reach the logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_interval", &self.poll_interval)
            .field("lookback_period", &self.lookback_period)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Creates a new configuration with default endpoints and timings
    pub fn new(practicum_token: String, telegram_token: String, telegram_chat_id: String) -> Self {
        Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            practicum_endpoint: DEFAULT_PRACTICUM_ENDPOINT.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            lookback_period: DEFAULT_LOOKBACK_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PRACTICUM_TOKEN (required)
    /// - TELEGRAM_TOKEN (required)
    /// - TELEGRAM_CHAT_ID (required)
    /// - PRACTICUM_ENDPOINT (optional)
    /// - TELEGRAM_API_URL (optional)
    /// - POLL_INTERVAL (optional, seconds, default: 600)
    /// - LOOKBACK_PERIOD (optional, seconds, default: 2592000)
    /// - REQUEST_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> Result<Self, StatusError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates configuration from an arbitrary variable lookup
    ///
    /// Every absent required variable is reported in one error. Empty values
    /// count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StatusError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|&&name| get(name).is_none())
            .map(|name| name.to_string())
            .collect();

        let [practicum_token, telegram_token, telegram_chat_id] = REQUIRED_VARS.map(&get);
        let (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) =
            (practicum_token, telegram_token, telegram_chat_id)
        else {
            return Err(StatusError::Configuration { missing });
        };

        let seconds = |name: &str, default: Duration| {
            get(name)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let mut config = Self::new(practicum_token, telegram_token, telegram_chat_id);
        if let Some(endpoint) = get("PRACTICUM_ENDPOINT") {
            config.practicum_endpoint = endpoint;
        }
        if let Some(api_url) = get("TELEGRAM_API_URL") {
            config.telegram_api_url = api_url;
        }
        config.poll_interval = seconds("POLL_INTERVAL", DEFAULT_POLL_INTERVAL);
        config.lookback_period = seconds("LOOKBACK_PERIOD", DEFAULT_LOOKBACK_PERIOD);
        config.request_timeout = seconds("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("practicum_endpoint", &self.practicum_endpoint),
            ("telegram_api_url", &self.telegram_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}
