mod cli;

use std::io::{self, BufRead, ErrorKind, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use formscout_core::{read_urls_from_file, read_urls_from_stream};
use formscout_engine::{Pipeline, ReqwestFetcher};
use scout_logging::{scout_debug, scout_info};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    scout_logging::initialize(scout_logging::level_for_verbosity(cli.verbose));

    let result = run(&cli);
    finish(result, &mut io::stderr().lock())
}

/// Maps the run result to the process status, reporting fatal errors on `diag`.
fn finish<E: Write>(result: Result<()>, diag: &mut E) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(diag, "formscout error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Loads URLs from `file`, or from `stdin` when no file is given.
///
/// A file that cannot be read is fatal. A failing stdin is reported on
/// `diag` and the lines read so far are kept.
fn load_urls<R: BufRead, E: Write>(
    file: Option<&Path>,
    stdin: R,
    diag: &mut E,
) -> Result<Vec<String>> {
    match file {
        Some(path) => Ok(read_urls_from_file(path).context("error reading file")?),
        None => {
            let read = read_urls_from_stream(stdin);
            if let Some(err) = read.error {
                writeln!(diag, "reading standard input: {err}")?;
            }
            Ok(read.urls)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let urls = load_urls(cli.file.as_deref(), io::stdin().lock(), &mut io::stderr().lock())?;
    scout_info!("loaded {} urls", urls.len());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let _guard = runtime.enter();

    let fetcher = ReqwestFetcher::new(cli.fetch_settings()).context("failed to build http client")?;
    scout_debug!("fetch settings: {:?}", fetcher.settings());
    let pipeline = Pipeline::new(fetcher).with_fetch_error_policy(cli.fetch_error_policy());

    let mut out = io::stdout().lock();
    let mut diag = io::stderr().lock();
    match runtime.block_on(pipeline.run(urls, &mut out, &mut diag)) {
        Ok(_) => Ok(()),
        // The consumer of stdout went away (e.g. `| head`); nothing left to do.
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("failed to write output"),
    }
}
