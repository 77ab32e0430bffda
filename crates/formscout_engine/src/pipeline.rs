use std::io::{self, Write};

use formscout_core::{classify, normalize_url, Verdict, BLOCK_PAGE_BRAND};
use scout_logging::{scout_debug, scout_info};

use crate::fetch::Fetcher;

/// What to do with fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchErrorPolicy {
    /// Skip the URL without a diagnostic. Dead URLs are the common case.
    #[default]
    Suppress,
    /// Write one diagnostic line per failed URL.
    Report,
}

/// Final state of one input URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOutcome {
    FetchFailed,
    Blocked,
    Form,
    NoForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub fetch_failed: usize,
    pub blocked: usize,
    pub with_form: usize,
    pub without_form: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: UrlOutcome) {
        self.processed += 1;
        match outcome {
            UrlOutcome::FetchFailed => self.fetch_failed += 1,
            UrlOutcome::Blocked => self.blocked += 1,
            UrlOutcome::Form => self.with_form += 1,
            UrlOutcome::NoForm => self.without_form += 1,
        }
    }
}

/// Sequential normalize -> fetch -> classify -> report loop.
///
/// Result lines go to `out`, diagnostics to `diag`. Both are written as soon
/// as a URL is classified.
pub struct Pipeline<F> {
    fetcher: F,
    fetch_errors: FetchErrorPolicy,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            fetch_errors: FetchErrorPolicy::default(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn with_fetch_error_policy(mut self, policy: FetchErrorPolicy) -> Self {
        self.fetch_errors = policy;
        self
    }

    /// Processes `urls` in order. Only failures to write `out` or `diag` are errors.
    pub async fn run<I, S, O, E>(&self, urls: I, out: &mut O, diag: &mut E) -> io::Result<RunSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        O: Write,
        E: Write,
    {
        let mut summary = RunSummary::default();
        for raw in urls {
            let outcome = self.process(raw.as_ref(), out, diag).await?;
            summary.record(outcome);
        }

        scout_info!(
            "processed={} with_form={} blocked={} fetch_failed={} without_form={}",
            summary.processed,
            summary.with_form,
            summary.blocked,
            summary.fetch_failed,
            summary.without_form
        );
        Ok(summary)
    }

    pub async fn process<O: Write, E: Write>(
        &self,
        raw: &str,
        out: &mut O,
        diag: &mut E,
    ) -> io::Result<UrlOutcome> {
        let url = normalize_url(raw);

        let fetched = match self.fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(err) => {
                scout_debug!("fetch failed for {}: {}", url, err);
                if self.fetch_errors == FetchErrorPolicy::Report {
                    writeln!(diag, "fetch failed for {url}: {err}")?;
                }
                return Ok(UrlOutcome::FetchFailed);
            }
        };

        let outcome = match classify(&fetched.body) {
            Verdict::Blocked => {
                writeln!(diag, "Blocked by {BLOCK_PAGE_BRAND} detected for {url} skipping.")?;
                UrlOutcome::Blocked
            }
            Verdict::Form => {
                writeln!(out, "{url}")?;
                out.flush()?;
                UrlOutcome::Form
            }
            Verdict::NoForm => UrlOutcome::NoForm,
        };
        scout_debug!(
            "{} classified as {:?} (status {}, final {})",
            url,
            outcome,
            fetched.metadata.status,
            fetched.metadata.final_url
        );
        Ok(outcome)
    }
}
