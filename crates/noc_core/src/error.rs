use serde::{Deserialize, Serialize};
use std::fmt;

pub const WINDOW_INVERTED: &str = "WINDOW_INVERTED";
pub const WINDOW_UNPARSEABLE: &str = "WINDOW_UNPARSEABLE";
pub const INGEST_JSON_INVALID: &str = "INGEST_JSON_INVALID";
pub const INGEST_CSV_INVALID: &str = "INGEST_CSV_INVALID";
pub const INGEST_MISSING_COLUMN: &str = "INGEST_MISSING_COLUMN";
pub const INGEST_READ_FAILED: &str = "INGEST_READ_FAILED";

/// Structured error shared by the engine, the ingest layer and the CLI shell.
///
/// Data-quality problems inside incident records are never reported through this type;
/// they degrade to zero downtime and surface as [`crate::domain::ValidationWarning`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {} ({details})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
