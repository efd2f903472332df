//! Intake: everything that happens to a file before it is submitted.
//!
//! ## Data Flow
//!
//! ```text
//! path / drop / picker ──▶ file ──▶ media check ──▶ size check ──▶ SelectedFile
//! ```
//!
//! 1. [`file`]: load a candidate from disk (or accept one built in memory
//!    by a front end) into a [`file::SelectedFile`]
//! 2. [`media`]: the closed set of accepted document kinds and their media
//!    types; also maps file extensions for the picker filter
//!
//! Validation itself is [`validate`]: type first, then size, so a candidate
//! that is both the wrong type and oversized produces a single
//! "wrong type" rejection.

pub mod file;
pub mod media;

use crate::error::ValidationError;
use file::SelectedFile;
use media::DocumentKind;

/// Check a candidate against the accepted types and the size limit.
///
/// Returns the recognised [`DocumentKind`] on success. The size boundary is
/// inclusive: a file of exactly `max_size` bytes is accepted.
pub fn validate(candidate: &SelectedFile, max_size: u64) -> Result<DocumentKind, ValidationError> {
    check(&candidate.media_type, candidate.size(), max_size)
}

/// [`validate`] on a declared media type and size, before any content exists.
pub fn check(media_type: &str, size: u64, max_size: u64) -> Result<DocumentKind, ValidationError> {
    let kind =
        DocumentKind::from_media_type(media_type).ok_or_else(|| ValidationError::UnsupportedType {
            media_type: media_type.to_string(),
        })?;

    if size > max_size {
        return Err(ValidationError::TooLarge {
            size,
            limit: max_size,
        });
    }

    Ok(kind)
}
