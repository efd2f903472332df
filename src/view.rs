//! Render model derived from [`IntakeState`].
//!
//! [`IntakeView`] says *what* should be on screen (labels, which sections
//! are visible, which handles feed which widgets) without saying how. A GUI
//! binds widgets to it; the CLI prints its [`Display`](std::fmt::Display)
//! rendering or serialises it as JSON.

use crate::blob::BlobUrl;
use crate::intake::media::{DocumentKind, PICKER_EXTENSIONS};
use crate::state::IntakeState;
use serde::Serialize;
use std::fmt;

pub const TITLE: &str = "Doc2Speech";
pub const TAGLINE: &str = "Upload your PDF or PowerPoint file to convert it to speech";
pub const DROP_PROMPT: &str = "Drop your PDF or PowerPoint here, or browse";
pub const DROP_HINT: &str = "Supports PDF and PowerPoint files up to 10MB";
pub const REMOVE_LABEL: &str = "Remove file";
pub const UPLOADING_LABEL: &str = "Uploading...";
pub const SUBMIT_LABEL: &str = "Upload PDF or PPTX";
pub const PPTX_NO_PREVIEW: &str = "Preview not available for PowerPoint files.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeView {
    pub title: &'static str,
    pub tagline: &'static str,
    pub drop_zone: DropZoneView,
    /// Present only while submitting.
    pub progress: Option<ProgressView>,
    pub submit_button: ButtonView,
    pub audio: Option<AudioView>,
    pub preview: Option<PreviewView>,
    /// Present when a file is selected and no submission is running.
    pub details: Option<FileDetailsView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropZoneView {
    /// Drag is hovering over the zone.
    pub highlighted: bool,
    /// Picker filter, e.g. `.pdf, .pptx`.
    pub accept: String,
    pub content: DropZoneContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DropZoneContent {
    Empty {
        prompt: &'static str,
        hint: &'static str,
    },
    Selected {
        name: String,
        size: String,
        remove_label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub label: &'static str,
    pub percent: u8,
    pub percent_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioView {
    pub heading: &'static str,
    pub src: BlobUrl,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewView {
    /// Inline document frame fed by the preview handle.
    Pdf { heading: &'static str, src: BlobUrl },
    PowerPoint {
        heading: &'static str,
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetailsView {
    pub name: String,
    pub size: String,
    pub media_type: String,
    pub last_modified: String,
}

impl IntakeView {
    pub fn from_state(state: &IntakeState) -> Self {
        let submitting = state.is_submitting();

        let content = match &state.selected {
            None => DropZoneContent::Empty {
                prompt: DROP_PROMPT,
                hint: DROP_HINT,
            },
            Some(f) => DropZoneContent::Selected {
                name: f.name.clone(),
                size: f.size_label(),
                remove_label: REMOVE_LABEL,
            },
        };

        let progress = submitting.then(|| ProgressView {
            label: UPLOADING_LABEL,
            percent: state.progress,
            percent_label: format!("{}%", state.progress),
        });

        let submit_button = ButtonView {
            label: if submitting { UPLOADING_LABEL } else { SUBMIT_LABEL },
            enabled: state.can_submit(),
        };

        let audio = state.result.as_ref().map(|r| AudioView {
            heading: "Audio Preview",
            src: r.url.clone(),
            content_type: r.content_type.clone(),
        });

        let preview = match (&state.selected, &state.preview) {
            (Some(_), Some(p)) => Some(match p.kind {
                DocumentKind::Pdf => PreviewView::Pdf {
                    heading: "PDF Preview",
                    src: p.url.clone(),
                },
                DocumentKind::PowerPoint => PreviewView::PowerPoint {
                    heading: "PPTX Preview",
                    message: PPTX_NO_PREVIEW,
                },
            }),
            _ => None,
        };

        let details = state
            .selected
            .as_ref()
            .filter(|_| !submitting)
            .map(|f| FileDetailsView {
                name: f.name.clone(),
                size: f.size_label(),
                media_type: f.media_type.clone(),
                last_modified: f.last_modified_label(),
            });

        Self {
            title: TITLE,
            tagline: TAGLINE,
            drop_zone: DropZoneView {
                highlighted: state.drag_active,
                accept: PICKER_EXTENSIONS.join(", "),
                content,
            },
            progress,
            submit_button,
            audio,
            preview,
            details,
        }
    }
}

impl fmt::Display for IntakeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.tagline)?;
        writeln!(f)?;

        let marker = if self.drop_zone.highlighted { "▶" } else { " " };
        match &self.drop_zone.content {
            DropZoneContent::Empty { prompt, hint } => {
                writeln!(f, "{marker} {prompt}")?;
                writeln!(f, "  {hint}")?;
            }
            DropZoneContent::Selected {
                name,
                size,
                remove_label,
            } => {
                writeln!(f, "{marker} {name}  ({size})  [{remove_label}]")?;
            }
        }

        if let Some(p) = &self.progress {
            writeln!(f, "{}  {}", p.label, p.percent_label)?;
        }

        let state = if self.submit_button.enabled { "" } else { " (disabled)" };
        writeln!(f, "[{}]{}", self.submit_button.label, state)?;

        if let Some(a) = &self.audio {
            writeln!(f)?;
            writeln!(f, "{}: {}", a.heading, a.src)?;
        }

        match &self.preview {
            Some(PreviewView::Pdf { heading, src }) => {
                writeln!(f)?;
                writeln!(f, "{heading}: {src}")?;
            }
            Some(PreviewView::PowerPoint { heading, message }) => {
                writeln!(f)?;
                writeln!(f, "{heading}: {message}")?;
            }
            None => {}
        }

        if let Some(d) = &self.details {
            writeln!(f)?;
            writeln!(f, "File Details")?;
            writeln!(f, "  Name:          {}", d.name)?;
            writeln!(f, "  Size:          {}", d.size)?;
            writeln!(f, "  Type:          {}", d.media_type)?;
            writeln!(f, "  Last Modified: {}", d.last_modified)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobRegistry;
    use crate::intake::file::SelectedFile;
    use crate::intake::media::{PDF_MEDIA_TYPE, PPTX_MEDIA_TYPE};
    use crate::state::{AudioResult, Preview};
    use bytes::Bytes;

    fn with_file(media_type: &str, kind: DocumentKind) -> IntakeState {
        let reg = BlobRegistry::new();
        let mut s = IntakeState::default();
        let file = SelectedFile::from_bytes("doc", media_type, vec![0u8; 2 * 1024 * 1024]);
        let url = reg.create(media_type, file.content().clone());
        s.select(file, Preview { url, kind });
        s
    }

    #[test]
    fn empty_state() {
        let v = IntakeView::from_state(&IntakeState::default());
        assert!(matches!(v.drop_zone.content, DropZoneContent::Empty { .. }));
        assert_eq!(v.drop_zone.accept, ".pdf, .pptx");
        assert!(!v.submit_button.enabled);
        assert_eq!(v.submit_button.label, SUBMIT_LABEL);
        assert!(v.progress.is_none());
        assert!(v.preview.is_none());
        assert!(v.details.is_none());
        assert!(v.to_string().contains(DROP_HINT));
    }

    #[test]
    fn pdf_selected_shows_inline_preview_and_details() {
        let s = with_file(PDF_MEDIA_TYPE, DocumentKind::Pdf);
        let v = IntakeView::from_state(&s);
        assert!(v.submit_button.enabled);
        assert!(matches!(v.preview, Some(PreviewView::Pdf { .. })));
        let d = v.details.as_ref().unwrap();
        assert_eq!(d.size, "2.00 MB");
        assert_eq!(d.media_type, PDF_MEDIA_TYPE);
        assert!(v.to_string().contains("Last Modified"));
    }

    #[test]
    fn pptx_has_no_inline_preview() {
        let s = with_file(PPTX_MEDIA_TYPE, DocumentKind::PowerPoint);
        let v = IntakeView::from_state(&s);
        assert_eq!(
            v.preview,
            Some(PreviewView::PowerPoint {
                heading: "PPTX Preview",
                message: PPTX_NO_PREVIEW
            })
        );
    }

    #[test]
    fn submitting_hides_details_and_shows_progress() {
        let mut s = with_file(PDF_MEDIA_TYPE, DocumentKind::Pdf);
        s.begin_submit().unwrap();
        s.progress = 40;
        let v = IntakeView::from_state(&s);
        assert!(v.details.is_none());
        assert!(!v.submit_button.enabled);
        assert_eq!(v.submit_button.label, UPLOADING_LABEL);
        assert_eq!(v.progress.as_ref().unwrap().percent_label, "40%");
        assert!(v.to_string().contains("Uploading...  40%"));
    }

    #[test]
    fn result_shows_audio_section() {
        let reg = BlobRegistry::new();
        let mut s = IntakeState::default();
        s.complete(AudioResult {
            url: reg.create("audio/mpeg", Bytes::from_static(b"ID3")),
            content_type: Some("audio/mpeg".into()),
            size: 3,
        });
        s.settle();
        let v = IntakeView::from_state(&s);
        assert!(v.audio.is_some());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["audio"]["heading"], "Audio Preview");
        assert_eq!(json["drop_zone"]["content"]["state"], "empty");
    }

    #[test]
    fn drag_highlight() {
        let s = IntakeState {
            drag_active: true,
            ..Default::default()
        };
        assert!(IntakeView::from_state(&s).drop_zone.highlighted);
    }
}
