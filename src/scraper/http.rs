// http.rs
use crate::config::HttpConfig;
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

/// Statuses worth another attempt on an idempotent request.
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The network seam every marketplace adapter talks through.
pub trait Transport {
    /// GET; implementations apply the retry policy.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ScraperError>;

    /// Form-encoded POST. Sent exactly once.
    fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, ScraperError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(status: u16) -> bool {
        RETRY_STATUSES.contains(&status)
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = self
            .base_backoff
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)));
        let base = std::cmp::min(exp, self.max_backoff);
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        base + Duration::from_millis(jitter)
    }

    /// Runs `send` until it yields a non-retryable status or attempts run out.
    /// Transport errors are returned straight away.
    pub fn run<F>(&self, url: &str, mut send: F) -> Result<HttpResponse, ScraperError>
    where
        F: FnMut() -> Result<HttpResponse, ScraperError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_status = 0;

        for attempt in 1..=attempts {
            let resp = send()?;
            if !Self::is_retryable(resp.status) {
                return Ok(resp);
            }

            last_status = resp.status;
            warn!(
                url,
                status = resp.status,
                "attempt {attempt}/{attempts} got a retryable status"
            );

            if attempt < attempts {
                std::thread::sleep(self.backoff(attempt));
            }
        }

        Err(ScraperError::RetriesExhausted {
            url: url.to_string(),
            status: last_status,
            attempts,
        })
    }
}

/// reqwest-backed transport, built once per process.
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, ScraperError> {
        let mut builder = Client::builder();

        if let Some(proxy) = &config.proxy {
            // Same proxy for http and https.
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| ScraperError::Config(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    fn header_map(headers: &[(&str, &str)]) -> Result<HeaderMap, ScraperError> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ScraperError::Config(format!("bad header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ScraperError::Config(format!("bad header value for {name}: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn read(resp: reqwest::blocking::Response) -> Result<HttpResponse, ScraperError> {
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for HttpClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ScraperError> {
        let headers = Self::header_map(headers)?;
        debug!(url, "GET");

        self.retry.run(url, || {
            let resp = self.client.get(url).headers(headers.clone()).send()?;
            Self::read(resp)
        })
    }

    fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, ScraperError> {
        let mut headers = Self::header_map(headers)?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        debug!(url, body, "POST");

        let resp = self
            .client
            .post(url)
            .headers(headers)
            .body(body.to_string())
            .send()?;
        Self::read(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    fn respond(status: u16) -> Result<HttpResponse, ScraperError> {
        Ok(HttpResponse {
            status,
            body: String::new(),
        })
    }

    #[test]
    fn retries_transient_statuses_up_to_the_limit() {
        let calls = Cell::new(0);
        let result = instant_policy().run("https://example.test", || {
            calls.set(calls.get() + 1);
            respond(503)
        });

        assert_eq!(calls.get(), 3);
        match result {
            Err(ScraperError::RetriesExhausted {
                status, attempts, ..
            }) => {
                assert_eq!(status, 503);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[test]
    fn stops_once_a_retry_succeeds() {
        let calls = Cell::new(0);
        let resp = instant_policy()
            .run("https://example.test", || {
                calls.set(calls.get() + 1);
                respond(if calls.get() == 1 { 429 } else { 200 })
            })
            .unwrap();

        assert_eq!(calls.get(), 2);
        assert!(resp.is_ok());
    }

    #[test]
    fn other_statuses_are_returned_as_is() {
        let calls = Cell::new(0);
        let resp = instant_policy()
            .run("https://example.test", || {
                calls.set(calls.get() + 1);
                respond(404)
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(resp.status, 404);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(300),
            jitter: Duration::ZERO,
        };

        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(300));
        assert_eq!(policy.backoff(4), Duration::from_millis(300));
    }
}
