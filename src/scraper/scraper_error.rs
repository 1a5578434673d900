#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gave up on {url} after {attempts} attempts (last status {status})")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("{platform} answered HTTP {status}; please retry the run later")]
    RetryNeeded { platform: &'static str, status: u16 },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("Config error: {0}")]
    Config(String),
}
