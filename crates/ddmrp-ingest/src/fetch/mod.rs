//! Resilient retrieval of the trade matrix.
//!
//! The fetcher validates and rewrites the pasted link, then downloads the
//! CSV export with a bounded number of attempts. Timeouts, connection errors
//! and unexpected HTTP statuses are retried with exponential backoff;
//! 403, 404 and unusable content fail immediately.

mod source_url;
mod transport;

use std::cell::RefCell;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::table::RawTable;

pub use source_url::{SHEETS_HOST, export_url};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};

/// Default number of attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default exponential backoff base in seconds.
pub const DEFAULT_BACKOFF_BASE: u32 = 2;

/// Call-time retrieval tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Total attempts, including the first one. Zero is treated as one.
    pub max_retries: u32,
    /// Timeout of a single attempt.
    pub timeout: Duration,
    /// Failed attempt `i` (0-based) is followed by `backoff_base^i` seconds of sleep.
    pub backoff_base: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_backoff_base(mut self, backoff_base: u32) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Delay after failed attempt `attempt` (0-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(u64::from(self.backoff_base).saturating_pow(attempt))
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Blocking wait between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// [`Sleeper`] that only records the requested delays.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}

fn looks_like_html(body: &[u8]) -> bool {
    let head: String = String::from_utf8_lossy(&body[..body.len().min(512)])
        .trim_start_matches('\u{feff}')
        .trim_start()
        .chars()
        .take(15)
        .collect::<String>()
        .to_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Turns one HTTP response into a table or a classified failure.
fn interpret_response(url: &str, response: &HttpResponse) -> Result<RawTable, FetchError> {
    match response.status {
        403 => {
            return Err(FetchError::PermissionDenied {
                url: url.to_string(),
                reason: "HTTP 403".to_string(),
            });
        }
        404 => {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        200..=299 => {}
        status => {
            return Err(FetchError::Transient {
                attempts: 1,
                reason: format!("HTTP {status}"),
            });
        }
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::Parse("empty response body".to_string()));
    }
    if looks_like_html(&response.body) {
        return Err(FetchError::PermissionDenied {
            url: url.to_string(),
            reason: "received an HTML page instead of CSV".to_string(),
        });
    }
    let table = RawTable::from_csv_bytes(&response.body)?;
    if table.is_empty() {
        return Err(FetchError::Parse("sheet has a header but no data rows".to_string()));
    }
    Ok(table)
}

/// Downloads the trade matrix with retry and backoff.
pub struct MatrixFetcher<T = ReqwestTransport, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    options: FetchOptions,
}

impl MatrixFetcher {
    /// Fetcher using the network and real sleeps.
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        Ok(Self::with_parts(ReqwestTransport::new()?, ThreadSleeper, options))
    }
}

impl<T: HttpTransport, S: Sleeper> MatrixFetcher<T, S> {
    pub fn with_parts(transport: T, sleeper: S, options: FetchOptions) -> Self {
        Self {
            transport,
            sleeper,
            options,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Validates `url`, derives the export link, and downloads the table.
    ///
    /// Invalid links fail before any request is made. After the attempt
    /// budget is spent the last transient failure is returned.
    pub fn fetch(&self, url: &str) -> Result<RawTable, FetchError> {
        let export = export_url(url)?;
        let attempts = self.options.attempts();
        let mut last_reason = String::new();
        for attempt in 0..attempts {
            debug!(attempt, url = %export, "requesting trade matrix");
            let outcome = self
                .transport
                .get(&export, self.options.timeout)
                .map_err(|err| FetchError::Transient {
                    attempts: 1,
                    reason: err.to_string(),
                })
                .and_then(|response| interpret_response(&export, &response));
            match outcome {
                Ok(table) => {
                    info!(
                        rows = table.row_count(),
                        columns = table.headers.len(),
                        attempt,
                        "trade matrix downloaded"
                    );
                    return Ok(table);
                }
                Err(err) if err.is_retryable() => {
                    let reason = match err {
                        FetchError::Transient { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    if attempt + 1 < attempts {
                        let delay = self.options.backoff_delay(attempt);
                        warn!(
                            attempt,
                            delay_secs = delay.as_secs(),
                            error = %reason,
                            "trade matrix fetch failed, retrying"
                        );
                        self.sleeper.sleep(delay);
                    }
                    last_reason = reason;
                }
                Err(err) => return Err(err),
            }
        }
        Err(FetchError::Transient {
            attempts,
            reason: last_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_one_second() {
        let options = FetchOptions::default();
        let delays: Vec<u64> = (0..4).map(|i| options.backoff_delay(i).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8]);
    }

    #[test]
    fn zero_retries_still_makes_one_attempt() {
        assert_eq!(FetchOptions::default().with_max_retries(0).attempts(), 1);
    }

    #[test]
    fn html_bodies_are_detected() {
        assert!(looks_like_html(b"  <!DOCTYPE html><html>"));
        assert!(looks_like_html(b"<HTML><body>"));
        assert!(!looks_like_html(b"Article,Store_ID\n"));
    }

    #[test]
    fn server_errors_are_transient() {
        let err = interpret_response(
            "u",
            &HttpResponse {
                status: 503,
                body: Vec::new(),
            },
        )
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn header_only_sheet_is_a_parse_error() {
        let err = interpret_response(
            "u",
            &HttpResponse {
                status: 200,
                body: b"Article,Store_ID\n".to_vec(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
