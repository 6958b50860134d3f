use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use ddmrp_ingest::{
    FetchError, FetchOptions, HttpResponse, HttpTransport, MatrixFetcher, RecordingSleeper,
    TransportError,
};

const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/sheet-id/edit?gid=5#gid=5";

/// Replays scripted outcomes, repeating the last one when the script runs out.
struct ScriptedTransport {
    script: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Cell<usize>,
    urls: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: Cell::new(0),
            urls: RefCell::new(Vec::new()),
        }
    }
}

impl HttpTransport for &ScriptedTransport {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.calls.set(self.calls.get() + 1);
        self.urls.borrow_mut().push(url.to_string());
        let mut script = self.script.borrow_mut();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

fn ok(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status: 200,
        body: body.as_bytes().to_vec(),
    })
}

fn status(code: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status: code,
        body: b"error".to_vec(),
    })
}

fn timeout() -> Result<HttpResponse, TransportError> {
    Err(TransportError::Timeout("operation timed out".to_string()))
}

#[test]
fn persistent_timeout_exhausts_budget_with_exponential_backoff() {
    let transport = ScriptedTransport::new(vec![timeout()]);
    let fetcher = MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), FetchOptions::default());

    let err = fetcher.fetch(SHEET_URL).unwrap_err();

    assert!(matches!(err, FetchError::Transient { attempts: 3, .. }));
    assert!(err.to_string().contains("timed out"));
    assert_eq!(transport.calls.get(), 3);
    assert_eq!(
        fetcher.sleeper().delays(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[test]
fn larger_budget_keeps_doubling() {
    let transport = ScriptedTransport::new(vec![status(500)]);
    let options = FetchOptions::default().with_max_retries(5);
    let fetcher = MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), options);

    let err = fetcher.fetch(SHEET_URL).unwrap_err();

    assert!(matches!(err, FetchError::Transient { attempts: 5, .. }));
    let secs: Vec<u64> = fetcher.sleeper().delays().iter().map(Duration::as_secs).collect();
    assert_eq!(secs, vec![1, 2, 4, 8]);
}

#[test]
fn forbidden_and_not_found_are_not_retried() {
    for (code, expected_permission) in [(403, true), (404, false)] {
        let transport = ScriptedTransport::new(vec![status(code)]);
        let fetcher =
            MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), FetchOptions::default());

        let err = fetcher.fetch(SHEET_URL).unwrap_err();

        assert_eq!(transport.calls.get(), 1);
        assert!(fetcher.sleeper().delays().is_empty());
        if expected_permission {
            assert!(matches!(err, FetchError::PermissionDenied { .. }));
        } else {
            assert!(matches!(err, FetchError::NotFound { .. }));
        }
    }
}

#[test]
fn recovers_after_transient_failure() {
    let transport = ScriptedTransport::new(vec![
        Err(TransportError::Connection("reset".to_string())),
        ok(" Art , Magazin \nA1,6\n"),
    ]);
    let fetcher = MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), FetchOptions::default());

    let table = fetcher.fetch(SHEET_URL).expect("second attempt succeeds");

    assert_eq!(table.headers, vec!["Art", "Magazin"]);
    assert_eq!(table.row_count(), 1);
    assert_eq!(fetcher.sleeper().delays(), vec![Duration::from_secs(1)]);
    assert_eq!(
        transport.urls.borrow()[0],
        "https://docs.google.com/spreadsheets/d/sheet-id/export?format=csv&gid=5"
    );
}

#[test]
fn invalid_link_makes_no_request() {
    let transport = ScriptedTransport::new(vec![ok("A\n1\n")]);
    let fetcher = MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), FetchOptions::default());

    let err = fetcher.fetch("https://example.com/sheet").unwrap_err();

    assert!(matches!(err, FetchError::InvalidSource(_)));
    assert_eq!(transport.calls.get(), 0);
}

#[test]
fn unusable_content_is_terminal() {
    for body in ["", "   \n", "Article,Store_ID\n", "<!DOCTYPE html><html></html>"] {
        let transport = ScriptedTransport::new(vec![ok(body)]);
        let fetcher =
            MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), FetchOptions::default());

        let err = fetcher.fetch(SHEET_URL).unwrap_err();

        assert!(!err.is_retryable(), "{body:?} should not be retried");
        assert_eq!(transport.calls.get(), 1);
    }
}

#[test]
fn undecodable_csv_is_a_parse_error() {
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse {
        status: 200,
        body: b"Article,Store_ID\n\xff\xfe,6\n".to_vec(),
    })]);
    let fetcher = MatrixFetcher::with_parts(&transport, RecordingSleeper::new(), FetchOptions::default());

    let err = fetcher.fetch(SHEET_URL).unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
    assert_eq!(transport.calls.get(), 1);
}
