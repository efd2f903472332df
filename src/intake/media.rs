//! Accepted document kinds.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media type of a PDF document.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Media type of a PowerPoint (OOXML) presentation.
pub const PPTX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Extensions offered by the file picker, in the order they are listed.
pub const PICKER_EXTENSIONS: [&str; 2] = [".pdf", ".pptx"];

/// The closed set of documents the conversion service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    PowerPoint,
}

impl DocumentKind {
    /// Exact match on the declared media type. No case folding or
    /// parameter stripping: browsers report these verbatim.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            PDF_MEDIA_TYPE => Some(DocumentKind::Pdf),
            PPTX_MEDIA_TYPE => Some(DocumentKind::PowerPoint),
            _ => None,
        }
    }

    /// Infer the kind from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "pptx" => Some(DocumentKind::PowerPoint),
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MEDIA_TYPE,
            DocumentKind::PowerPoint => PPTX_MEDIA_TYPE,
        }
    }

    /// Whether the view can render an inline preview for this kind.
    pub fn has_inline_preview(self) -> bool {
        matches!(self, DocumentKind::Pdf)
    }
}

/// Media type to declare for a file on disk.
///
/// Mirrors what a browser does for a picked file: the extension decides.
/// Unknown extensions fall back to `application/octet-stream`, which intake
/// will then reject.
pub fn media_type_for_path(path: &Path) -> &'static str {
    DocumentKind::from_path(path)
        .map(DocumentKind::media_type)
        .unwrap_or("application/octet-stream")
}

/// File extension to use when saving audio of the given content type.
pub fn audio_extension(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|s| s.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("audio/mpeg") | Some("audio/mp3") => "mp3",
        Some("audio/wav") | Some("audio/x-wav") | Some("audio/wave") => "wav",
        Some("audio/ogg") => "ogg",
        Some("audio/aac") => "aac",
        Some("audio/flac") => "flac",
        _ => "bin",
    }
}
