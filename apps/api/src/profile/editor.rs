//! Correction Editor — in-memory holder of the profile under review.
//!
//! The editor performs no I/O. Edits are copy-on-write: the held profile
//! lives behind an `Arc`, and every mutation swaps in a freshly cloned and
//! updated record, so a snapshot taken earlier never observes a partial
//! write.

use std::sync::Arc;

use thiserror::Error;

use crate::profile::models::{EditableProfile, ProfileField};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("no profile is being edited")]
    NoActiveProfile,

    #[error("{field} must be a non-negative integer, got '{value}'")]
    InvalidCount { field: &'static str, value: String },
}

/// Holds the profile for the duration of one correction session.
#[derive(Debug, Default)]
pub struct CorrectionEditor {
    profile: Option<Arc<EditableProfile>>,
}

impl CorrectionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire held profile. Re-running this with a new profile
    /// discards unsaved edits; there is no partial merge.
    pub fn initialize(&mut self, profile: EditableProfile) {
        self.profile = Some(Arc::new(profile));
    }

    /// Current snapshot of the profile, if a session is active. The returned
    /// `Arc` stays consistent across later edits.
    pub fn profile(&self) -> Option<Arc<EditableProfile>> {
        self.profile.clone()
    }

    /// Single-key replacement of one scalar field. Count fields only accept
    /// strings that parse as non-negative integers.
    pub fn set_field(&mut self, field: ProfileField, value: &str) -> Result<(), EditorError> {
        let current = self.profile.as_ref().ok_or(EditorError::NoActiveProfile)?;

        if field.is_count() && value.parse::<u32>().is_err() {
            return Err(EditorError::InvalidCount {
                field: field.as_str(),
                value: value.to_string(),
            });
        }

        let mut next = (**current).clone();
        let slot = match field {
            ProfileField::Name => &mut next.name,
            ProfileField::Email => &mut next.email,
            ProfileField::Phone => &mut next.phone,
            ProfileField::YearOfPassing => &mut next.year_of_passing,
            ProfileField::BranchOfEngineering => &mut next.branch_of_engineering,
            ProfileField::Cgpa => &mut next.cgpa,
            ProfileField::Backlogs => &mut next.backlogs,
            ProfileField::LiveBacklogs => &mut next.live_backlogs,
            ProfileField::Internships => &mut next.internships,
            ProfileField::Projects => &mut next.projects,
        };
        *slot = value.to_string();

        self.profile = Some(Arc::new(next));
        Ok(())
    }

    /// Replaces the skills list with the comma-split input, verbatim.
    pub fn set_skills(&mut self, text: &str) -> Result<(), EditorError> {
        let current = self.profile.as_ref().ok_or(EditorError::NoActiveProfile)?;
        let mut next = (**current).clone();
        next.skills = split_comma_list(text);
        self.profile = Some(Arc::new(next));
        Ok(())
    }

    /// Replaces the programming-languages list with the comma-split input,
    /// verbatim. No vocabulary check is applied here; the vocabulary only
    /// drives the normalizer's initial derivation.
    pub fn set_programming_languages(&mut self, text: &str) -> Result<(), EditorError> {
        let current = self.profile.as_ref().ok_or(EditorError::NoActiveProfile)?;
        let mut next = (**current).clone();
        next.programming_languages = split_comma_list(text);
        self.profile = Some(Arc::new(next));
        Ok(())
    }

    /// Returns the current profile unchanged, signalling "ready to persist".
    pub fn submit(&self) -> Result<Arc<EditableProfile>, EditorError> {
        self.profile.clone().ok_or(EditorError::NoActiveProfile)
    }

    /// Discards the held profile. Safe to call with no active session.
    pub fn cancel(&mut self) {
        self.profile = None;
    }
}

/// Splits on commas and trims each token. Empty tokens from stray commas are
/// kept; no dedup or case normalization.
pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',').map(|token| token.trim().to_string()).collect()
}
