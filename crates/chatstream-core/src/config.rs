//! Client configuration

use std::time::Duration;

/// Configuration for the backend client.
///
/// The base URL is injected at construction so the client can be pointed at
/// a mock endpoint in tests; the core crate carries no baked-in default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Delay between status poll attempts.
    pub poll_interval: Duration,
    /// Give up polling after this long. `None` polls until terminal status.
    pub poll_deadline: Option<Duration>,
    /// Per-request timeout applied by the transport. `None` leaves requests
    /// unbounded (streaming turns can legitimately run long).
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            poll_interval: Duration::from_millis(1000),
            poll_deadline: Some(Duration::from_secs(600)),
            request_timeout: None,
        }
    }

    /// Set the delay between status poll attempts
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set or disable the polling deadline
    pub fn with_poll_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.poll_deadline = deadline;
        self
    }

    /// Set a per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_stripped() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000");

        let config = ClientConfig::new("http://localhost:8000///");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("http://localhost:8000")
            .with_poll_interval(Duration::from_millis(50))
            .with_poll_deadline(None)
            .with_request_timeout(Duration::from_secs(30));

        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert!(config.poll_deadline.is_none());
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }
}
