//! Error types for ingestion.

use ddmrp_model::SourceRole;
use thiserror::Error;

/// Malformed or empty delimited content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// No header row could be read.
    #[error("table is empty: no header row")]
    Empty,

    /// The delimited content could not be decoded.
    #[error("malformed table content{}: {message}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Malformed {
        line: Option<u64>,
        message: String,
    },

    /// The table file could not be read.
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

/// A required canonical column is absent after header normalization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{role} table is missing required column(s): {}; available columns: {}", missing.join(", "), available.join(", "))]
pub struct SchemaError {
    pub role: SourceRole,
    pub missing: Vec<String>,
    pub available: Vec<String>,
}

/// Errors from retrieving the trade matrix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// The link is empty or does not point at a spreadsheet.
    #[error("invalid source URL: {0}")]
    InvalidSource(String),

    /// HTTP 403, or a login page served instead of the sheet.
    #[error("access denied for {url}: {reason}")]
    PermissionDenied { url: String, reason: String },

    /// HTTP 404.
    #[error("spreadsheet not found: {url}")]
    NotFound { url: String },

    /// Timeout, connection failure, or an unexpected HTTP status.
    #[error("fetch failed after {attempts} attempt(s): {reason}")]
    Transient { attempts: u32, reason: String },

    /// Empty body, empty table, or undecodable delimited content.
    #[error("cannot parse trade matrix: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl FetchError {
    /// Returns whether another attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Returns a message suitable for showing to the person who pasted the link.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidSource(_) => {
                "The link does not look like a Google Sheets link. Copy it from the browser address bar."
            }
            Self::PermissionDenied { .. } => {
                "The spreadsheet is not accessible. Share it as \"Anyone with the link can view\"."
            }
            Self::NotFound { .. } => "The spreadsheet was not found. Check that the link is complete.",
            Self::Transient { .. } => {
                "Could not download the spreadsheet. Check the internet connection and try again."
            }
            Self::Parse(_) => "The downloaded sheet is empty or is not a valid table.",
            Self::ClientSetup(_) => "An unexpected error occurred.",
        }
    }
}

impl From<TableError> for FetchError {
    fn from(err: TableError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(
            FetchError::Transient {
                attempts: 1,
                reason: "timeout".to_string()
            }
            .is_retryable()
        );
        assert!(
            !FetchError::NotFound {
                url: "u".to_string()
            }
            .is_retryable()
        );
        assert!(!FetchError::Parse("empty".to_string()).is_retryable());
    }

    #[test]
    fn schema_error_names_missing_columns() {
        let err = SchemaError {
            role: SourceRole::Stock,
            missing: vec!["Article".to_string(), "Current_Stock".to_string()],
            available: vec!["Foo".to_string()],
        };
        let message = err.to_string();
        assert!(message.starts_with("stock table"));
        assert!(message.contains("Article, Current_Stock"));
    }

    #[test]
    fn malformed_error_mentions_line() {
        let err = TableError::Malformed {
            line: Some(3),
            message: "bad quote".to_string(),
        };
        assert_eq!(err.to_string(), "malformed table content at line 3: bad quote");
        let err = TableError::Malformed {
            line: None,
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "malformed table content: bad");
    }

    #[test]
    fn user_messages_guide_sharing() {
        let err = FetchError::PermissionDenied {
            url: "u".to_string(),
            reason: "HTTP 403".to_string(),
        };
        assert!(err.user_message().contains("Anyone with the link"));
    }
}
