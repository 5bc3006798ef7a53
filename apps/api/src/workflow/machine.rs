//! Upload workflow state machine.
//!
//! One tagged-union state, updated only through the transition methods
//! below; service calls never happen here. Transitions that require I/O
//! return an [`Effect`] for the session driver to execute, and the matching
//! completion is fed back with the epoch the effect carried. A completion
//! whose epoch is no longer current belongs to a superseded request and is
//! discarded.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::ServiceError;
use crate::models::upload::SelectedFile;
use crate::profile::editor::{CorrectionEditor, EditorError};
use crate::profile::models::{EditableProfile, ProfileField, RawParseResult};
use crate::profile::normalize::normalize;

pub const MSG_NO_FILE: &str = "Please select a file";
pub const MSG_FILE_TYPE_NOT_ALLOWED: &str =
    "File type not allowed. Please upload a PDF, DOC, or DOCX file.";
pub const MSG_PARSE_OK: &str = "Resume uploaded and parsed successfully!";
pub const MSG_PARSE_TRANSPORT: &str = "Error uploading resume. Please try again.";
pub const MSG_SAVE_OK: &str = "Resume information saved successfully!";
pub const MSG_SAVE_TRANSPORT: &str = "Error saving information. Please try again.";

/// Action rejected at the acceptance boundary. Distinguishable kinds exist
/// for logging and tests even though the user-visible handling is a message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("an upload or save request is already in flight")]
    Busy,

    #[error("a parsed resume is awaiting review; cancel it or select a new file first")]
    ReviewInProgress,

    #[error("no parsed resume is awaiting review")]
    NoActiveReview,

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Outbound request the session driver must issue. Carries the epoch the
/// matching completion has to present.
#[derive(Debug)]
pub enum Effect {
    Parse { epoch: u64, file: SelectedFile },
    Persist { epoch: u64, profile: Arc<EditableProfile> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Error,
}

/// Informational or error text attached to any state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Uploading,
    AwaitingReview,
    Saving,
}

enum State {
    Idle { selected: Option<SelectedFile> },
    Uploading,
    AwaitingReview { editor: CorrectionEditor },
    Saving { profile: Arc<EditableProfile> },
}

/// Serializable view of the workflow for the HTTP surface and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSnapshot {
    pub phase: Phase,
    pub selected_file: Option<String>,
    pub profile: Option<EditableProfile>,
    pub message: Option<StatusMessage>,
}

pub struct UploadWorkflow {
    state: State,
    message: Option<StatusMessage>,
    /// Request generation. Bumped on every issued effect and on every new
    /// file selection, so superseded responses can never apply.
    epoch: u64,
}

impl Default for UploadWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self {
            state: State::Idle { selected: None },
            message: None,
            epoch: 0,
        }
    }

    /// Selecting a file is accepted in any state: it clears the message and
    /// any held profile, and supersedes an in-flight request. A file with a
    /// disallowed extension is refused with a validation message and no
    /// state change.
    pub fn select_file(&mut self, file: SelectedFile) {
        if !file.has_allowed_extension() {
            self.message = Some(StatusMessage::error(MSG_FILE_TYPE_NOT_ALLOWED));
            return;
        }

        info!("File selected: {}", file.file_name);
        self.epoch += 1;
        self.state = State::Idle {
            selected: Some(file),
        };
        self.message = None;
    }

    /// Submits the selected file for parsing. With no file selected this is
    /// a local validation failure (message set, no effect). While a request
    /// is in flight or a review is open the action is rejected.
    pub fn submit_upload(&mut self) -> Result<Option<Effect>, WorkflowError> {
        match &mut self.state {
            State::Uploading | State::Saving { .. } => Err(WorkflowError::Busy),
            State::AwaitingReview { .. } => Err(WorkflowError::ReviewInProgress),
            State::Idle { selected } => match selected.take() {
                None => {
                    self.message = Some(StatusMessage::error(MSG_NO_FILE));
                    Ok(None)
                }
                // The file moves into the effect so it cannot be resubmitted
                // while assumed in flight.
                Some(file) => {
                    self.state = State::Uploading;
                    self.epoch += 1;
                    info!("Uploading '{}' for parsing (epoch {})", file.file_name, self.epoch);
                    Ok(Some(Effect::Parse {
                        epoch: self.epoch,
                        file,
                    }))
                }
            },
        }
    }

    /// Applies the parse service's response. Ignored unless the epoch is
    /// current and the machine is still `Uploading`.
    pub fn complete_parse(&mut self, epoch: u64, outcome: Result<RawParseResult, ServiceError>) {
        if epoch != self.epoch || !matches!(self.state, State::Uploading) {
            debug!("Discarding stale parse response (epoch {epoch}, current {})", self.epoch);
            return;
        }

        match outcome {
            Ok(raw) => {
                let mut editor = CorrectionEditor::new();
                editor.initialize(normalize(Some(&raw)));
                self.state = State::AwaitingReview { editor };
                self.message = Some(StatusMessage::info(MSG_PARSE_OK));
                info!("Parse succeeded; profile ready for review");
            }
            Err(ServiceError::Rejected { reason }) => {
                self.state = State::Idle { selected: None };
                self.message = Some(StatusMessage::error(format!("Error: {reason}")));
                warn!("Parse service rejected the upload: {reason}");
            }
            Err(ServiceError::Transport(detail)) => {
                self.state = State::Idle { selected: None };
                self.message = Some(StatusMessage::error(MSG_PARSE_TRANSPORT));
                warn!("Parse request failed in transit: {detail}");
            }
        }
    }

    pub fn edit_field(&mut self, field: ProfileField, value: &str) -> Result<(), WorkflowError> {
        self.editor_mut()?.set_field(field, value)?;
        Ok(())
    }

    pub fn edit_skills(&mut self, text: &str) -> Result<(), WorkflowError> {
        self.editor_mut()?.set_skills(text)?;
        Ok(())
    }

    pub fn edit_programming_languages(&mut self, text: &str) -> Result<(), WorkflowError> {
        self.editor_mut()?.set_programming_languages(text)?;
        Ok(())
    }

    /// Hands the corrected profile off for persistence.
    pub fn submit_review(&mut self) -> Result<Option<Effect>, WorkflowError> {
        match &self.state {
            State::Uploading | State::Saving { .. } => Err(WorkflowError::Busy),
            State::Idle { .. } => Err(WorkflowError::NoActiveReview),
            State::AwaitingReview { editor } => {
                let profile = editor.submit()?;
                self.state = State::Saving {
                    profile: profile.clone(),
                };
                self.epoch += 1;
                info!("Persisting corrected profile (epoch {})", self.epoch);
                Ok(Some(Effect::Persist {
                    epoch: self.epoch,
                    profile,
                }))
            }
        }
    }

    /// Abandons the review. Safe to call in any state.
    pub fn cancel_review(&mut self) {
        if matches!(self.state, State::AwaitingReview { .. }) {
            info!("Review cancelled; discarding profile");
            self.state = State::Idle { selected: None };
            self.message = None;
        }
    }

    /// Applies the persistence service's response. On failure the profile is
    /// retained and the machine returns to review so the user can retry.
    pub fn complete_save(&mut self, epoch: u64, outcome: Result<(), ServiceError>) {
        if epoch != self.epoch || !matches!(self.state, State::Saving { .. }) {
            debug!("Discarding stale save response (epoch {epoch}, current {})", self.epoch);
            return;
        }

        let State::Saving { profile } = std::mem::replace(
            &mut self.state,
            State::Idle { selected: None },
        ) else {
            unreachable!("matched above");
        };

        match outcome {
            Ok(()) => {
                self.message = Some(StatusMessage::info(MSG_SAVE_OK));
                info!("Profile persisted; workflow reset");
            }
            Err(err) => {
                let text = match &err {
                    ServiceError::Rejected { reason } => format!("Error: {reason}"),
                    ServiceError::Transport(_) => MSG_SAVE_TRANSPORT.to_string(),
                };
                warn!("Persist failed, keeping profile for retry: {err}");
                let mut editor = CorrectionEditor::new();
                editor.initialize((*profile).clone());
                self.state = State::AwaitingReview { editor };
                self.message = Some(StatusMessage::error(text));
            }
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let (phase, selected_file, profile) = match &self.state {
            State::Idle { selected } => (
                Phase::Idle,
                selected.as_ref().map(|f| f.file_name.clone()),
                None,
            ),
            State::Uploading => (Phase::Uploading, None, None),
            State::AwaitingReview { editor } => (
                Phase::AwaitingReview,
                None,
                editor.profile().map(|p| (*p).clone()),
            ),
            State::Saving { profile } => (Phase::Saving, None, Some((**profile).clone())),
        };
        WorkflowSnapshot {
            phase,
            selected_file,
            profile,
            message: self.message.clone(),
        }
    }

    fn editor_mut(&mut self) -> Result<&mut CorrectionEditor, WorkflowError> {
        match &mut self.state {
            State::AwaitingReview { editor } => Ok(editor),
            State::Uploading | State::Saving { .. } => Err(WorkflowError::Busy),
            State::Idle { .. } => Err(WorkflowError::NoActiveReview),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    fn ada() -> RawParseResult {
        RawParseResult {
            name: Some("Ada Lovelace".to_string()),
            skills: Some(vec!["Python".to_string(), "Leadership".to_string()]),
            ..Default::default()
        }
    }

    fn parse_effect(wf: &mut UploadWorkflow) -> (u64, SelectedFile) {
        match wf.submit_upload().unwrap() {
            Some(Effect::Parse { epoch, file }) => (epoch, file),
            other => panic!("expected a parse effect, got {other:?}"),
        }
    }

    fn persist_effect(wf: &mut UploadWorkflow) -> (u64, Arc<EditableProfile>) {
        match wf.submit_review().unwrap() {
            Some(Effect::Persist { epoch, profile }) => (epoch, profile),
            other => panic!("expected a persist effect, got {other:?}"),
        }
    }

    fn reviewing(wf: &mut UploadWorkflow) {
        wf.select_file(pdf("resume.pdf"));
        let (epoch, _) = parse_effect(wf);
        wf.complete_parse(epoch, Ok(ada()));
        assert_eq!(wf.snapshot().phase, Phase::AwaitingReview);
    }

    #[test]
    fn test_new_workflow_is_idle_with_nothing_selected() {
        let wf = UploadWorkflow::new();
        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.selected_file, None);
        assert_eq!(snap.profile, None);
        assert_eq!(snap.message, None);
    }

    #[test]
    fn test_select_file_clears_message_and_holds_file() {
        let mut wf = UploadWorkflow::new();
        wf.submit_upload().unwrap(); // produces the no-file message
        assert!(wf.snapshot().message.is_some());

        wf.select_file(pdf("resume.pdf"));
        let snap = wf.snapshot();
        assert_eq!(snap.selected_file.as_deref(), Some("resume.pdf"));
        assert_eq!(snap.message, None);
    }

    #[test]
    fn test_select_file_rejects_disallowed_extension() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("resume.txt"));
        let snap = wf.snapshot();
        assert_eq!(snap.selected_file, None);
        assert_eq!(
            snap.message,
            Some(StatusMessage::error(MSG_FILE_TYPE_NOT_ALLOWED))
        );
    }

    #[test]
    fn test_submit_without_file_stays_idle_with_message_and_no_effect() {
        let mut wf = UploadWorkflow::new();
        let effect = wf.submit_upload().unwrap();
        assert!(effect.is_none());
        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.message, Some(StatusMessage::error(MSG_NO_FILE)));
    }

    #[test]
    fn test_submit_moves_file_into_effect_and_enters_uploading() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("resume.pdf"));
        let (_, file) = parse_effect(&mut wf);
        assert_eq!(file.file_name, "resume.pdf");

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Uploading);
        // The selected-file slot is cleared the instant the upload begins.
        assert_eq!(snap.selected_file, None);
    }

    #[test]
    fn test_second_submit_while_uploading_is_rejected_without_effect() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("resume.pdf"));
        let _ = parse_effect(&mut wf);
        assert_eq!(wf.submit_upload().unwrap_err(), WorkflowError::Busy);
        assert_eq!(wf.snapshot().phase, Phase::Uploading);
    }

    #[test]
    fn test_parse_success_enters_review_with_normalized_profile() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("resume.pdf"));
        let (epoch, _) = parse_effect(&mut wf);
        wf.complete_parse(epoch, Ok(ada()));

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::AwaitingReview);
        assert_eq!(snap.message, Some(StatusMessage::info(MSG_PARSE_OK)));
        let profile = snap.profile.unwrap();
        assert_eq!(profile, normalize(Some(&ada())));
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.programming_languages, vec!["Python"]);
        assert_eq!(profile.skills, vec!["Python", "Leadership"]);
    }

    #[test]
    fn test_parse_rejection_returns_to_idle_with_reason() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("resume.pdf"));
        let (epoch, _) = parse_effect(&mut wf);
        wf.complete_parse(
            epoch,
            Err(ServiceError::Rejected {
                reason: "Could not extract text".to_string(),
            }),
        );

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.selected_file, None);
        assert_eq!(
            snap.message,
            Some(StatusMessage::error("Error: Could not extract text"))
        );
    }

    #[test]
    fn test_parse_transport_failure_uses_generic_message() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("resume.pdf"));
        let (epoch, _) = parse_effect(&mut wf);
        wf.complete_parse(
            epoch,
            Err(ServiceError::Transport("connection refused".to_string())),
        );

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.message, Some(StatusMessage::error(MSG_PARSE_TRANSPORT)));
    }

    #[test]
    fn test_stale_parse_response_is_discarded_after_new_selection() {
        let mut wf = UploadWorkflow::new();
        wf.select_file(pdf("first.pdf"));
        let (epoch, _) = parse_effect(&mut wf);

        // A newer selection supersedes the in-flight request.
        wf.select_file(pdf("second.pdf"));
        wf.complete_parse(epoch, Ok(ada()));

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.selected_file.as_deref(), Some("second.pdf"));
        assert_eq!(snap.profile, None);
        assert_eq!(snap.message, None);
    }

    #[test]
    fn test_edits_require_an_active_review() {
        let mut wf = UploadWorkflow::new();
        assert_eq!(
            wf.edit_field(ProfileField::Cgpa, "8.5").unwrap_err(),
            WorkflowError::NoActiveReview
        );
        assert_eq!(
            wf.edit_skills("go, rust").unwrap_err(),
            WorkflowError::NoActiveReview
        );
    }

    #[test]
    fn test_edit_field_flows_through_to_the_profile() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        wf.edit_field(ProfileField::Cgpa, "8.5").unwrap();
        assert_eq!(wf.snapshot().profile.unwrap().cgpa, "8.5");
    }

    #[test]
    fn test_invalid_count_edit_is_surfaced_as_editor_error() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        let err = wf.edit_field(ProfileField::Backlogs, "many").unwrap_err();
        assert!(matches!(err, WorkflowError::Editor(_)));
    }

    #[test]
    fn test_cancel_review_returns_to_idle_and_clears_message() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        wf.cancel_review();
        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.profile, None);
        assert_eq!(snap.message, None);

        // Idempotent-safe with no active review.
        wf.cancel_review();
        assert_eq!(wf.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn test_submit_review_emits_persist_effect_with_current_profile() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        wf.edit_field(ProfileField::Cgpa, "8.5").unwrap();

        let (_, profile) = persist_effect(&mut wf);
        assert_eq!(profile.cgpa, "8.5");
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(wf.snapshot().phase, Phase::Saving);
    }

    #[test]
    fn test_submit_review_rejected_while_saving() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        let _ = persist_effect(&mut wf);
        assert_eq!(wf.submit_review().unwrap_err(), WorkflowError::Busy);
    }

    #[test]
    fn test_save_success_resets_to_idle_with_message() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        let (epoch, _) = persist_effect(&mut wf);
        wf.complete_save(epoch, Ok(()));

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.profile, None);
        assert_eq!(snap.message, Some(StatusMessage::info(MSG_SAVE_OK)));
    }

    #[test]
    fn test_save_failure_retains_profile_for_retry() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        wf.edit_field(ProfileField::Cgpa, "8.5").unwrap();
        let (epoch, _) = persist_effect(&mut wf);
        wf.complete_save(
            epoch,
            Err(ServiceError::Rejected {
                reason: "No data provided".to_string(),
            }),
        );

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::AwaitingReview);
        assert_eq!(snap.profile.unwrap().cgpa, "8.5");
        assert_eq!(
            snap.message,
            Some(StatusMessage::error("Error: No data provided"))
        );

        // The retained review can be resubmitted.
        let (epoch, _) = persist_effect(&mut wf);
        wf.complete_save(epoch, Ok(()));
        assert_eq!(wf.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn test_save_transport_failure_uses_generic_message() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        let (epoch, _) = persist_effect(&mut wf);
        wf.complete_save(epoch, Err(ServiceError::Transport("timeout".to_string())));

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::AwaitingReview);
        assert_eq!(snap.message, Some(StatusMessage::error(MSG_SAVE_TRANSPORT)));
    }

    #[test]
    fn test_stale_save_response_is_discarded_after_new_selection() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        let (epoch, _) = persist_effect(&mut wf);

        wf.select_file(pdf("fresh.pdf"));
        wf.complete_save(epoch, Ok(()));

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.selected_file.as_deref(), Some("fresh.pdf"));
        assert_eq!(snap.message, None);
    }

    #[test]
    fn test_selecting_a_new_file_implicitly_cancels_a_review() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        wf.select_file(pdf("another.pdf"));

        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.selected_file.as_deref(), Some("another.pdf"));
        assert_eq!(snap.profile, None);
    }

    #[test]
    fn test_upload_submit_rejected_while_review_open() {
        let mut wf = UploadWorkflow::new();
        reviewing(&mut wf);
        assert_eq!(
            wf.submit_upload().unwrap_err(),
            WorkflowError::ReviewInProgress
        );
    }

    #[test]
    fn test_end_to_end_transition_sequence() {
        let mut wf = UploadWorkflow::new();

        wf.select_file(pdf("resume.pdf"));
        let (epoch, file) = parse_effect(&mut wf);
        assert_eq!(file.file_name, "resume.pdf");

        wf.complete_parse(epoch, Ok(ada()));
        let profile = wf.snapshot().profile.unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.programming_languages, vec!["Python"]);

        wf.edit_field(ProfileField::Cgpa, "8.5").unwrap();
        let (epoch, payload) = persist_effect(&mut wf);
        assert_eq!(payload.cgpa, "8.5");
        assert_eq!(payload.skills, vec!["Python", "Leadership"]);

        wf.complete_save(epoch, Ok(()));
        let snap = wf.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.message, Some(StatusMessage::info(MSG_SAVE_OK)));
    }
}
