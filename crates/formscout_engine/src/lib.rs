//! Formscout engine: fetching and the per-URL pipeline.
mod decode;
mod fetch;
mod pipeline;
mod retry;
mod types;

pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use pipeline::{FetchErrorPolicy, Pipeline, RunSummary, UrlOutcome};
pub use retry::{is_retryable, is_retryable_status, RetryPolicy};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
