use crate::scraper::RetryPolicy;
use std::env;
use std::time::Duration;

pub const PROXY_ENV: &str = "PRICE_FETCHER_PROXY";
pub const TIMEOUT_ENV: &str = "PRICE_FETCHER_TIMEOUT_SECS";
pub const SESSION_COOKIE_ENV: &str = "POINT130_SESSION_COOKIE";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// Used when no cookie is configured. The site only checks that one is present.
pub const DEFAULT_SESSION_COOKIE: &str = "cookieconsent_status=dismiss; timezone=America/New_York";

/// Process-wide HTTP settings, read once at start-up and passed down by reference.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub session_cookie: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: None,
            retry: RetryPolicy::default(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = get(TIMEOUT_ENV).and_then(|v| match v.parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                tracing::warn!("ignoring {TIMEOUT_ENV}={v}: not a whole number of seconds");
                None
            }
        });

        Self {
            proxy: get(PROXY_ENV),
            timeout,
            retry: RetryPolicy::default(),
            session_cookie: get(SESSION_COOKIE_ENV)
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
        }
    }
}
