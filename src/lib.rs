//! # doc2speech
//!
//! Headless client for a document-to-speech service: select a PDF or
//! PowerPoint file, validate it, upload it, and get the audio back.
//!
//! The crate models what a single-page upload form does, without the page.
//! [`IntakeController`] owns the state for one file (selection, drag flag,
//! preview handle, submission progress, result handle) and exposes the
//! operations a front end binds its events to. [`IntakeView`] describes what
//! should be rendered for the current state.
//!
//! ## Flow
//!
//! ```text
//! pick / drop
//!  │
//!  ├─ 1. Intake    media type ∈ {PDF, PPTX}, size ≤ 10 MiB
//!  ├─ 2. Preview   blob handle over the file (inline frame for PDF)
//!  ├─ 3. Submit    multipart POST `file` → conversion endpoint
//!  │               progress ticker 0→90 while the call runs
//!  └─ 4. Result    blob handle over the returned audio; selection cleared
//!                  (also on a service rejection, kept when no answer arrived)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2speech::{ClientConfig, IntakeController, SelectedFile, DEFAULT_MAX_FILE_SIZE};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = IntakeController::new(ClientConfig::default())?;
//!     let path = Path::new("slides.pptx");
//!     let file = SelectedFile::load(path, None, DEFAULT_MAX_FILE_SIZE).await?;
//!     controller.accept(file)?;
//!
//!     let result = controller.submit().await?;
//!     let audio = controller.blobs().resolve(&result.url).expect("live handle");
//!     std::fs::write("slides.mp3", &audio.data[..])?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2speech` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod blob;
pub mod config;
pub mod controller;
pub mod error;
pub mod intake;
pub mod progress;
pub mod service;
pub mod state;
mod ticker;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use blob::{Blob, BlobRegistry, BlobUrl};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_ENDPOINT, DEFAULT_MAX_FILE_SIZE};
pub use controller::{DragEvent, DragResponse, IntakeController};
pub use error::{Doc2SpeechError, ValidationError};
pub use intake::file::SelectedFile;
pub use intake::media::{DocumentKind, PDF_MEDIA_TYPE, PPTX_MEDIA_TYPE};
pub use progress::{IntakeObserver, NoopObserver, Notification, NotificationKind, ObserverHandle};
pub use service::{ConversionService, ConvertedAudio, HttpConversionService};
pub use state::{AudioResult, IntakeState, Preview, SubmissionPhase, SubmitOutcome};
pub use view::IntakeView;
