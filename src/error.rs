//! Error types for the doc2speech library.
//!
//! Two layers reflect two distinct moments of failure:
//!
//! * [`ValidationError`]: raised synchronously by intake or by the
//!   preconditions of a submission. Nothing has been mutated and no network
//!   traffic has happened.
//!
//! * [`Doc2SpeechError`]: everything the library can return, including the
//!   outcome of the conversion call itself (service-reported failure or a
//!   transport problem) and local I/O around loading and saving files.
//!
//! Every error has exactly one user-facing notification text, available via
//! [`Doc2SpeechError::user_message`]. Front ends show that string; the
//! `Display` impl carries the more detailed, log-friendly description.

use std::path::PathBuf;
use thiserror::Error;

/// Notification text for a rejected media type (also used when submitting
/// with nothing selected).
pub const MSG_SELECT_FILE: &str = "Please select a PDF or PowerPoint file";
/// Notification text for an oversized file.
pub const MSG_TOO_LARGE: &str = "File size must be less than 10MB";
/// Notification text for a second submit while one is in flight.
pub const MSG_IN_PROGRESS: &str = "An upload is already in progress";
/// Notification text for transport failures.
pub const MSG_UPLOAD_FAILED: &str = "Upload failed. Please try again.";

/// A candidate file or submission was rejected before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Declared media type is neither PDF nor PowerPoint OOXML.
    #[error("Unsupported media type '{media_type}': expected a PDF or PowerPoint file")]
    UnsupportedType { media_type: String },

    /// File exceeds the configured size limit.
    #[error("File is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// Submit was requested with no file selected.
    #[error("No file selected")]
    NoFileSelected,

    /// Submit was requested while another submission is in flight.
    #[error("A submission is already in progress")]
    SubmissionInProgress,
}

impl ValidationError {
    /// Text shown to the user for this rejection.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedType { .. } | ValidationError::NoFileSelected => {
                MSG_SELECT_FILE
            }
            ValidationError::TooLarge { .. } => MSG_TOO_LARGE,
            ValidationError::SubmissionInProgress => MSG_IN_PROGRESS,
        }
    }
}

/// All errors returned by the doc2speech library.
#[derive(Debug, Error)]
pub enum Doc2SpeechError {
    // ── Intake ────────────────────────────────────────────────────────────
    /// Candidate or submission rejected; state is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Conversion endpoint ───────────────────────────────────────────────
    /// The service answered with a non-2xx status and a JSON `detail`.
    #[error("Conversion service returned HTTP {status}: {detail}")]
    Service { status: u16, detail: String },

    /// Network failure or a response that could not be read or parsed.
    #[error("Upload to '{endpoint}' failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// The request did not settle within the configured timeout.
    #[error("Upload to '{endpoint}' timed out after {secs}s")]
    Timeout { endpoint: String, secs: u64 },

    // ── Local files ───────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the file failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output audio file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Doc2SpeechError {
    /// The notification a front end should display for this error.
    ///
    /// Service errors surface the server-supplied detail verbatim; transport
    /// problems collapse into one generic message.
    pub fn user_message(&self) -> String {
        match self {
            Doc2SpeechError::Validation(v) => v.user_message().to_string(),
            Doc2SpeechError::Service { detail, .. } => format!("Failed to convert file: {detail}"),
            Doc2SpeechError::Transport { .. } => MSG_UPLOAD_FAILED.to_string(),
            Doc2SpeechError::Timeout { secs, .. } => {
                format!("Upload timed out after {secs}s. Please try again.")
            }
            other => other.to_string(),
        }
    }

    /// `true` for errors raised before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Doc2SpeechError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_surfaces_detail() {
        let e = Doc2SpeechError::Service {
            status: 400,
            detail: "bad format".into(),
        };
        assert_eq!(e.user_message(), "Failed to convert file: bad format");
        assert!(e.to_string().contains("400"));
    }

    #[test]
    fn transport_error_is_generic_for_users() {
        let e = Doc2SpeechError::Transport {
            endpoint: "http://127.0.0.1:8000/convert".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(e.user_message(), MSG_UPLOAD_FAILED);
        assert!(e.to_string().contains("connection refused"));
    }

    #[test]
    fn validation_messages() {
        let wrong = ValidationError::UnsupportedType {
            media_type: "text/plain".into(),
        };
        assert_eq!(wrong.user_message(), MSG_SELECT_FILE);
        let big = ValidationError::TooLarge {
            size: 20,
            limit: 10,
        };
        assert_eq!(big.user_message(), MSG_TOO_LARGE);
        assert_eq!(ValidationError::NoFileSelected.user_message(), MSG_SELECT_FILE);
    }

    #[test]
    fn validation_converts_into_library_error() {
        let e: Doc2SpeechError = ValidationError::NoFileSelected.into();
        assert!(e.is_validation());
        assert_eq!(e.user_message(), MSG_SELECT_FILE);
    }

    #[test]
    fn timeout_display() {
        let e = Doc2SpeechError::Timeout {
            endpoint: "http://x".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.user_message().contains("30s"));
    }
}
