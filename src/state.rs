//! The single state struct behind the intake controller.
//!
//! Every field lives in [`IntakeState`] and changes only through the
//! transition methods below, which the controller calls under one lock.
//! Transitions that drop a handle return it so the caller can revoke it
//! from the [`crate::blob::BlobRegistry`].

use crate::blob::BlobUrl;
use crate::error::ValidationError;
use crate::intake::file::SelectedFile;
use crate::intake::media::DocumentKind;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Submission state machine: `Idle → Submitting → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

/// How the most recent submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitOutcome {
    Succeeded,
    Failed,
}

/// Preview reference for the selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub url: BlobUrl,
    pub kind: DocumentKind,
}

/// Result reference over the returned audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioResult {
    pub url: BlobUrl,
    pub content_type: Option<String>,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct IntakeState {
    pub selected: Option<SelectedFile>,
    pub drag_active: bool,
    pub phase: SubmissionPhase,
    /// Percentage in `[0, 100]`.
    pub progress: u8,
    pub preview: Option<Preview>,
    pub result: Option<AudioResult>,
    /// Value of the file-picker control; cleared by remove so the same file
    /// can be chosen again.
    pub picker_value: Option<String>,
    pub last_outcome: Option<SubmitOutcome>,
}

impl IntakeState {
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Whether a submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_submitting()
    }

    /// Install a validated file and its preview. Returns the preview it replaced.
    pub(crate) fn select(&mut self, file: SelectedFile, preview: Preview) -> Option<Preview> {
        self.selected = Some(file);
        self.preview.replace(preview)
    }

    /// Drop the selection. Returns the preview to release.
    pub(crate) fn clear_selection(&mut self) -> Option<Preview> {
        self.selected = None;
        self.picker_value = None;
        self.preview.take()
    }

    /// Clear the selection only if it is still `submitted`; a file chosen
    /// while the request ran is a new selection and stays.
    pub(crate) fn clear_submitted(&mut self, submitted: &SelectedFile) -> Option<Preview> {
        let still_selected = self
            .selected
            .as_ref()
            .is_some_and(|f| f.same_content(submitted));
        if still_selected {
            self.clear_selection()
        } else {
            None
        }
    }

    /// `Idle → Submitting`. Returns the file to upload.
    pub(crate) fn begin_submit(&mut self) -> Result<SelectedFile, ValidationError> {
        if self.is_submitting() {
            return Err(ValidationError::SubmissionInProgress);
        }
        let file = self
            .selected
            .clone()
            .ok_or(ValidationError::NoFileSelected)?;
        self.phase = SubmissionPhase::Submitting;
        self.progress = 0;
        Ok(file)
    }

    /// One ticker step: add `step`, clamp at `cap`. Returns the new value
    /// only if it changed and a submission is still running.
    pub(crate) fn advance_progress(&mut self, step: u8, cap: u8) -> Option<u8> {
        if !self.is_submitting() || self.progress >= cap {
            return None;
        }
        self.progress = self.progress.saturating_add(step).min(cap);
        Some(self.progress)
    }

    /// Audio arrived. Installs the result and completes the bar; returns the
    /// result it superseded.
    pub(crate) fn complete(&mut self, result: AudioResult) -> Option<AudioResult> {
        self.progress = 100;
        self.last_outcome = Some(SubmitOutcome::Succeeded);
        self.result.replace(result)
    }

    /// No answer arrived; the selection is kept for a retry.
    pub(crate) fn fail(&mut self) {
        self.progress = 0;
        self.last_outcome = Some(SubmitOutcome::Failed);
    }

    /// The service answered with a rejection. The submission completed, so
    /// the submitted file is cleared as on success. Returns its preview.
    pub(crate) fn reject(&mut self, submitted: &SelectedFile) -> Option<Preview> {
        self.fail();
        self.clear_submitted(submitted)
    }

    /// `Submitting → Idle`. Safe to call more than once.
    pub(crate) fn settle(&mut self) {
        self.phase = SubmissionPhase::Idle;
        self.progress = 0;
    }

    /// Every handle still referenced, for teardown.
    pub(crate) fn take_handles(&mut self) -> Vec<BlobUrl> {
        let mut urls = Vec::new();
        if let Some(p) = self.preview.take() {
            urls.push(p.url);
        }
        if let Some(r) = self.result.take() {
            urls.push(r.url);
        }
        urls
    }
}

/// Lock shared state, recovering from a poisoned mutex: every transition
/// leaves the struct consistent, so a panic elsewhere cannot corrupt it.
pub(crate) fn lock(state: &Mutex<IntakeState>) -> MutexGuard<'_, IntakeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
