use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use scout_logging::scout_debug;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// URLs collected from a stream, plus the error that cut the stream short, if any.
#[derive(Debug, Default)]
pub struct StreamUrls {
    pub urls: Vec<String>,
    pub error: Option<io::Error>,
}

/// Reads every non-blank, trimmed line of the file at `path`.
///
/// Any open or read failure fails the whole call; partial content is discarded.
pub fn read_urls_from_file(path: &Path) -> Result<Vec<String>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let collected = collect_lines(BufReader::new(file));
    match collected.error {
        Some(source) => Err(SourceError::Read {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            scout_debug!("read {} urls from {}", collected.urls.len(), path.display());
            Ok(collected.urls)
        }
    }
}

/// Reads every non-blank, trimmed line of `reader`.
///
/// A read error stops collection but keeps what was read before it.
pub fn read_urls_from_stream<R: BufRead>(reader: R) -> StreamUrls {
    collect_lines(reader)
}

fn collect_lines<R: BufRead>(mut reader: R) -> StreamUrls {
    let mut collected = StreamUrls::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                // Lossy so a stray non-UTF-8 byte costs one line at most.
                let line = String::from_utf8_lossy(&buf);
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    collected.urls.push(trimmed.to_string());
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                collected.error = Some(err);
                break;
            }
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    /// Yields `data`, then fails every further read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(out)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"));
            }
            Ok(n)
        }
    }

    #[test]
    fn stream_error_keeps_collected_lines() {
        let reader = BufReader::new(FailingReader {
            data: Cursor::new(b"a.example\nb.example\n".to_vec()),
        });
        let result = read_urls_from_stream(reader);

        assert_eq!(result.urls, vec!["a.example", "b.example"]);
        let err = result.error.expect("stream error is reported");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn handles_crlf_and_missing_trailing_newline() {
        let result = read_urls_from_stream(Cursor::new("one\r\ntwo\r\n\r\nthree"));
        assert_eq!(result.urls, vec!["one", "two", "three"]);
        assert!(result.error.is_none());
    }

    #[test]
    fn invalid_utf8_does_not_abort() {
        let result = read_urls_from_stream(Cursor::new(b"ok.example\n\xff\xfe\nnext.example\n".to_vec()));
        assert_eq!(result.urls.len(), 3);
        assert_eq!(result.urls[0], "ok.example");
        assert_eq!(result.urls[2], "next.example");
        assert!(result.error.is_none());
    }
}
