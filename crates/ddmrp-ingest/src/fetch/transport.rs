//! HTTP transport seam for the trade matrix fetcher.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use thiserror::Error;

use crate::error::FetchError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failure before a status line was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Blocking GET with a per-request timeout.
pub trait HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|err| FetchError::ClientSetup(err.to_string()))?;
        Ok(Self { client })
    }
}

fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, concat!("ddmrp/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "text/csv, */*")
            .send()
            .map_err(|err| classify(&err))?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|err| classify(&err))?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
