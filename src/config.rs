//! Configuration for the intake controller and conversion client.
//!
//! All behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The defaults describe the stock setup: a
//! local endpoint, a 10 MiB limit, and a progress bar that climbs 10 % every
//! 200 ms up to 90 % while a 2 s pre-submit pause runs.

use crate::error::Doc2SpeechError;
use crate::progress::{IntakeObserver, NoopObserver, ObserverHandle};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Conversion endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/convert";

/// 10 MiB. Files of exactly this size are accepted.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for an [`crate::IntakeController`].
///
/// # Example
/// ```rust
/// use doc2speech::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("http://localhost:9000/convert")
///     .submit_delay_ms(0)
///     .request_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.progress_cap, 90);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// URL the multipart upload is POSTed to. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Largest accepted file, inclusive. Default: 10 MiB.
    pub max_file_size: u64,

    /// Percentage added per ticker interval. Default: 10.
    pub progress_step: u8,

    /// Ticker interval in milliseconds. Default: 200.
    pub progress_interval_ms: u64,

    /// Highest value the ticker may reach before the call settles. Default: 90.
    pub progress_cap: u8,

    /// Pause between starting a submission and issuing the request. Default: 2000.
    pub submit_delay_ms: u64,

    /// Request timeout in seconds; a timeout is reported as a transport
    /// failure. Default: 300.
    pub request_timeout_secs: u64,

    /// Receives notifications and progress. Default: [`NoopObserver`].
    pub observer: ObserverHandle,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            progress_step: 10,
            progress_interval_ms: 200,
            progress_cap: 90,
            submit_delay_ms: 2000,
            request_timeout_secs: 300,
            observer: Arc::new(NoopObserver),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("max_file_size", &self.max_file_size)
            .field("progress_step", &self.progress_step)
            .field("progress_interval_ms", &self.progress_interval_ms)
            .field("progress_cap", &self.progress_cap)
            .field("submit_delay_ms", &self.submit_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("observer", &"<dyn IntakeObserver>")
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn progress_step(mut self, step: u8) -> Self {
        self.config.progress_step = step;
        self
    }

    pub fn progress_interval_ms(mut self, ms: u64) -> Self {
        self.config.progress_interval_ms = ms;
        self
    }

    pub fn progress_cap(mut self, cap: u8) -> Self {
        self.config.progress_cap = cap;
        self
    }

    pub fn submit_delay_ms(mut self, ms: u64) -> Self {
        self.config.submit_delay_ms = ms;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn IntakeObserver>) -> Self {
        self.config.observer = observer;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, Doc2SpeechError> {
        let c = &self.config;
        let url = reqwest::Url::parse(&c.endpoint).map_err(|e| {
            Doc2SpeechError::InvalidConfig(format!("endpoint '{}' is not a URL: {}", c.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Doc2SpeechError::InvalidConfig(format!(
                "endpoint must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.max_file_size == 0 {
            return Err(Doc2SpeechError::InvalidConfig(
                "max file size must be > 0".into(),
            ));
        }
        if c.progress_step == 0 {
            return Err(Doc2SpeechError::InvalidConfig(
                "progress step must be > 0".into(),
            ));
        }
        if c.progress_interval_ms == 0 {
            return Err(Doc2SpeechError::InvalidConfig(
                "progress interval must be > 0 ms".into(),
            ));
        }
        if c.progress_cap >= 100 {
            return Err(Doc2SpeechError::InvalidConfig(format!(
                "progress cap must be below 100, got {}",
                c.progress_cap
            )));
        }
        if c.request_timeout_secs == 0 {
            return Err(Doc2SpeechError::InvalidConfig(
                "request timeout must be >= 1s".into(),
            ));
        }
        Ok(self.config)
    }
}
