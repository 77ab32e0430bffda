use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use formscout_engine::{FetchErrorPolicy, FetchSettings, RetryPolicy};

/// Report which URLs serve an HTML form, skipping Cloudflare challenge pages.
///
/// URLs are read one per line from `--file` or standard input. Matching URLs
/// are printed to standard output as soon as they are found.
#[derive(Parser, Debug, Clone)]
#[command(name = "formscout", version, about, long_about = None)]
pub struct Cli {
    /// Path to a file containing URLs (default: standard input).
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Whether to follow HTTP redirects.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub follow_redirects: bool,

    /// Retries for transient failures (connection errors, timeouts, 429, 5xx).
    #[arg(long, default_value_t = 4, value_name = "N")]
    pub retries: usize,

    /// Timeout for each request attempt in seconds.
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// Largest response body to read, in bytes.
    #[arg(long, default_value_t = 10 * 1024 * 1024, value_name = "BYTES")]
    pub max_bytes: u64,

    /// Print a line to standard error for every URL that could not be fetched.
    #[arg(long)]
    pub report_fetch_errors: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.timeout),
            follow_redirects: self.follow_redirects,
            max_bytes: self.max_bytes,
            retry: RetryPolicy {
                max_retries: self.retries,
                ..RetryPolicy::default()
            },
            ..FetchSettings::default()
        }
    }

    pub fn fetch_error_policy(&self) -> FetchErrorPolicy {
        if self.report_fetch_errors {
            FetchErrorPolicy::Report
        } else {
            FetchErrorPolicy::Suppress
        }
    }
}
