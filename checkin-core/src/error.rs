//! Error types for the check-in workflows.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from talking to the attendee backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with a non-success status.
    #[error("{}", rejection_message(.status, .detail))]
    Rejected {
        status: u16,
        /// `detail` field of the error body, when the backend sent one
        detail: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

fn rejection_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Backend returned status {}", status),
    }
}

impl ClientError {
    /// Backend-provided detail message, if this is a rejection that carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::ResponseParseFailed(e.to_string())
        } else {
            ClientError::RequestFailed(e.to_string())
        }
    }
}

/// Errors from a per-day status operation.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Attendee not found")]
    AttendeeNotFound,

    #[error("{0}")]
    UpdateRejected(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Errors that abort a roster import before anything is submitted.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Error parsing CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("Failed to read roster file '{}': {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),
}

/// Errors from the on-disk roster cache.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Failed to parse cached roster {}: {}", .0.display(), .1)]
    Parse(PathBuf, serde_json::Error),

    #[error("Failed to serialize roster: {0}")]
    Serialize(serde_json::Error),
}

/// Errors from CSV export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Exported CSV is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Errors from QR image rendering.
#[derive(Error, Debug)]
pub enum QrError {
    #[error("Failed to encode QR code: {0}")]
    Encode(String),

    #[error("Failed to write QR image: {0}")]
    Image(#[from] image::ImageError),
}
