//! The intake and submission controller.
//!
//! [`IntakeController`] owns all client-side state for one in-flight file
//! and exposes the operations a front end binds its events to:
//!
//! | Event                 | Operation                          |
//! |-----------------------|------------------------------------|
//! | drag enter/over/leave | [`IntakeController::handle_drag`]  |
//! | drop                  | [`IntakeController::handle_drag`]  |
//! | file picker change    | [`IntakeController::pick`]         |
//! | "Remove file"         | [`IntakeController::remove`]       |
//! | form submit           | [`IntakeController::submit`]       |
//!
//! Rendering reads [`IntakeController::view`]; nothing else mutates state.
//!
//! ## Submission flow
//!
//! ```text
//! Idle ──submit──▶ Submitting ──┬─ 2xx ──────▶ Succeeded ──▶ Idle   (file cleared)
//!                               ├─ non-2xx ──▶ Failed ─────▶ Idle   (file cleared)
//!                               └─ no answer ▶ Failed ─────▶ Idle   (file kept)
//! ```
//!
//! While submitting, a [`ProgressTicker`] animates the bar up to the cap and
//! the request runs after the configured pre-submit delay. The request's
//! outcome is authoritative: the ticker is cancelled and joined before the
//! final progress values are written. A drop guard returns the phase to
//! `Idle` on every exit path, including the submit future being dropped.

use crate::blob::{Blob, BlobRegistry, BlobUrl};
use crate::config::ClientConfig;
use crate::error::{Doc2SpeechError, ValidationError};
use crate::intake::{self, file::SelectedFile};
use crate::progress::Notification;
use crate::service::{ConversionService, ConvertedAudio, HttpConversionService};
use crate::state::{self, AudioResult, IntakeState, Preview};
use crate::ticker::{ProgressTicker, TickerSettings};
use crate::view::IntakeView;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Drag-and-drop events delivered by the front end.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    /// Files dropped on the zone, in the order the platform reports them.
    Drop(Vec<SelectedFile>),
}

/// What the front end should do with the platform event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragResponse {
    /// Suppress the platform's default handling (e.g. opening the file).
    pub prevent_default: bool,
    /// Result of intake when a drop carried a file.
    pub intake: Option<Result<(), ValidationError>>,
}

/// Client-side state machine for selecting and converting one document.
pub struct IntakeController {
    config: ClientConfig,
    service: Arc<dyn ConversionService>,
    blobs: BlobRegistry,
    state: Arc<Mutex<IntakeState>>,
}

impl IntakeController {
    /// Controller talking to `config.endpoint` over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, Doc2SpeechError> {
        let service = HttpConversionService::new(&config)?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    /// Controller using a caller-supplied conversion service.
    pub fn with_service(config: ClientConfig, service: Arc<dyn ConversionService>) -> Self {
        Self {
            config,
            service,
            blobs: BlobRegistry::new(),
            state: Arc::new(Mutex::new(IntakeState::default())),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Registry resolving preview and result handles.
    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> IntakeState {
        state::lock(&self.state).clone()
    }

    /// Render model for the current state.
    pub fn view(&self) -> IntakeView {
        IntakeView::from_state(&state::lock(&self.state))
    }

    /// Content behind the current result handle.
    pub fn result_audio(&self) -> Option<Blob> {
        let url = state::lock(&self.state).result.as_ref()?.url.clone();
        self.blobs.resolve(&url)
    }

    // ── Intake ───────────────────────────────────────────────────────────

    /// Validate and select a candidate file.
    ///
    /// On rejection the state is untouched and exactly one notification is
    /// emitted. On success the candidate replaces any prior selection and
    /// the prior preview handle is released.
    pub fn accept(&self, candidate: SelectedFile) -> Result<(), ValidationError> {
        let kind = match intake::validate(&candidate, self.config.max_file_size) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Rejected '{}': {}", candidate.name, e);
                self.config.observer.on_notification(&(&e).into());
                return Err(e);
            }
        };

        let url = self
            .blobs
            .create(candidate.media_type.clone(), candidate.content().clone());
        info!("Selected '{}' ({})", candidate.name, candidate.size_label());

        let replaced = state::lock(&self.state).select(candidate, Preview { url, kind });
        if let Some(old) = replaced {
            self.blobs.revoke(&old.url);
        }
        Ok(())
    }

    /// File-picker path: remember the control's value, then [`accept`](Self::accept).
    ///
    /// The recorded value is only kept when intake succeeds.
    pub fn pick(&self, candidate: SelectedFile) -> Result<(), ValidationError> {
        let value = candidate.name.clone();
        self.accept(candidate)?;
        state::lock(&self.state).picker_value = Some(value);
        Ok(())
    }

    /// Apply a drag-and-drop event.
    ///
    /// A drop hands the first file to intake; any further files are ignored.
    pub fn handle_drag(&self, event: DragEvent) -> DragResponse {
        let intake = match event {
            DragEvent::Enter | DragEvent::Over => {
                state::lock(&self.state).drag_active = true;
                None
            }
            DragEvent::Leave => {
                state::lock(&self.state).drag_active = false;
                None
            }
            DragEvent::Drop(files) => {
                state::lock(&self.state).drag_active = false;
                if files.len() > 1 {
                    debug!("Ignoring {} extra dropped files", files.len() - 1);
                }
                files.into_iter().next().map(|f| self.accept(f))
            }
        };
        DragResponse {
            prevent_default: true,
            intake,
        }
    }

    /// Clear the selection, release its preview, and reset the picker.
    pub fn remove(&self) {
        let released = state::lock(&self.state).clear_selection();
        if let Some(preview) = released {
            self.blobs.revoke(&preview.url);
        }
        debug!("Selection removed");
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Upload the selected file and expose the returned audio.
    ///
    /// Fails fast with a [`ValidationError`] (and no network traffic) when
    /// nothing is selected or a submission is already running.
    pub async fn submit(&self) -> Result<AudioResult, Doc2SpeechError> {
        let observer = self.config.observer.clone();

        let begun = state::lock(&self.state).begin_submit();
        let file = match begun {
            Ok(file) => file,
            Err(e) => {
                observer.on_notification(&(&e).into());
                return Err(e.into());
            }
        };

        let _settle = SettleGuard {
            state: self.state.clone(),
        };
        info!("Submitting '{}' to {}", file.name, self.config.endpoint);
        observer.on_submit_start(&file.name, file.size());
        observer.on_progress(0);

        let ticker = ProgressTicker::spawn(
            self.state.clone(),
            observer.clone(),
            TickerSettings {
                interval: self.config.progress_interval(),
                step: self.config.progress_step,
                cap: self.config.progress_cap,
            },
        );

        let outcome = self.convert_after_delay(&file).await;
        ticker.stop().await;

        match outcome {
            Ok(audio) => {
                let result = self.finish_success(&file, audio);
                info!("Received {} bytes of audio for '{}'", result.size, file.name);
                observer.on_submit_finished(true);
                Ok(result)
            }
            Err(e) => {
                let released = {
                    let mut s = state::lock(&self.state);
                    let released = match e {
                        Doc2SpeechError::Service { .. } => s.reject(&file),
                        _ => {
                            s.fail();
                            None
                        }
                    };
                    s.settle();
                    released
                };
                if let Some(preview) = released {
                    self.blobs.revoke(&preview.url);
                }
                observer.on_progress(0);
                warn!("Submission of '{}' failed: {}", file.name, e);
                observer.on_notification(&Notification::from_error(&e));
                observer.on_submit_finished(false);
                Err(e)
            }
        }
    }

    async fn convert_after_delay(&self, file: &SelectedFile) -> Result<ConvertedAudio, Doc2SpeechError> {
        let delay = self.config.submit_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.service.convert(file).await
    }

    fn finish_success(&self, submitted: &SelectedFile, audio: ConvertedAudio) -> AudioResult {
        let size = audio.data.len() as u64;
        let media_type = audio
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let url = self.blobs.create(media_type, audio.data);
        let result = AudioResult {
            url,
            content_type: audio.content_type,
            size,
        };

        let observer = &self.config.observer;
        let superseded = state::lock(&self.state).complete(result.clone());
        observer.on_progress(100);

        let mut released: Vec<BlobUrl> = superseded.into_iter().map(|r| r.url).collect();
        {
            let mut s = state::lock(&self.state);
            released.extend(s.clear_submitted(submitted).map(|p| p.url));
            s.settle();
        }
        observer.on_progress(0);

        for url in &released {
            self.blobs.revoke(url);
        }
        result
    }
}

impl Drop for IntakeController {
    fn drop(&mut self) {
        let handles = state::lock(&self.state).take_handles();
        for url in &handles {
            self.blobs.revoke(url);
        }
        if !handles.is_empty() {
            debug!("Released {} handles on teardown", handles.len());
        }
    }
}

/// Returns the phase to `Idle` however `submit` exits.
struct SettleGuard {
    state: Arc<Mutex<IntakeState>>,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        state::lock(&self.state).settle();
    }
}
