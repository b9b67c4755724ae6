use configuration::ProviderSettings;
use reqwest::StatusCode;
use std::time::Duration;

/// Exponential backoff for transient failures of the company info service.
///
/// Attempt `n` (zero-based) waits `base_delay * 2^n` before the next try, so the
/// defaults (2s, 6 retries) wait 2, 4, 8, 16, 32 and 64 seconds.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(settings.max_retries, settings.retry_base_delay())
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Server errors, request timeouts and throttling are worth another try.
    pub fn is_retryable_status(status: StatusCode) -> bool {
        status.is_server_error()
            || status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
    }

    pub fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(6, Duration::from_secs(2))
    }
}
