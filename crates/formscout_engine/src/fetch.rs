use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use scout_logging::{scout_debug, scout_trace};
use tokio_retry::RetryIf;

use crate::decode::decode_body;
use crate::retry::{is_retryable, is_retryable_status, retry_note, RetryPolicy};
use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Applies to each attempt, body included.
    pub request_timeout: Duration,
    /// When false the first response is final, even if it is a redirect.
    pub follow_redirects: bool,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            follow_redirects: true,
            redirect_limit: 10,
            max_bytes: 10 * 1024 * 1024,
            user_agent: concat!("formscout/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// Fetcher backed by one `reqwest::Client`, built up front and reused for every URL.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let policy = if settings.follow_redirects {
            reqwest::redirect::Policy::limited(settings.redirect_limit)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(policy)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if is_retryable_status(status.as_u16()) {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_body(&bytes, content_type.as_deref());
        scout_trace!(
            "{} -> {} ({} bytes, {})",
            url,
            status.as_u16(),
            bytes.len(),
            decoded.encoding_label
        );

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            encoding_label: decoded.encoding_label,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput {
            body: decoded.text,
            metadata,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let parsed =
            Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let fetcher = self;
        let target = &parsed;
        let schedule = self.settings.retry.backoff();
        let mut retries_left = schedule.len();
        RetryIf::spawn(
            schedule,
            move || fetcher.fetch_once(target),
            |err: &FetchError| {
                let retry = is_retryable(err);
                if let Some(note) = retry_note(url, err, retries_left) {
                    scout_debug!("{}", note);
                }
                if retry {
                    retries_left = retries_left.saturating_sub(1);
                }
                retry
            },
        )
        .await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    if err.is_body() || err.is_decode() {
        return FetchError::new(FailureKind::Body, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
