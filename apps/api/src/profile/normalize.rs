//! Normalizer — maps the untrusted parse result onto a complete, edit-ready
//! profile with every field defined.
//!
//! The mapping is total: any absent or null member degrades to its default
//! instead of failing, so downstream consumers never see an optional field.

use crate::profile::models::{EditableProfile, RawParseResult};

/// Fixed vocabulary used to auto-classify skills as programming languages.
/// Matching is case-insensitive; the skill's original casing is kept.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "python",
    "java",
    "c++",
    "javascript",
    "c#",
    "php",
    "ruby",
    "swift",
];

/// Converts a raw parse result into a fully-populated [`EditableProfile`].
///
/// `None` yields the all-defaults profile (used before any parse exists).
/// `backlogs`, `live_backlogs`, `internships` and `projects` are never
/// present in the parse result and always start at their defaults.
pub fn normalize(raw: Option<&RawParseResult>) -> EditableProfile {
    let Some(raw) = raw else {
        return EditableProfile::default();
    };

    let education = raw.education.clone().unwrap_or_default();
    let skills = raw.skills.clone().unwrap_or_default();

    EditableProfile {
        name: raw.name.clone().unwrap_or_default(),
        email: raw.email.clone().unwrap_or_default(),
        phone: raw.phone.clone().unwrap_or_default(),
        year_of_passing: education.year_of_passing.unwrap_or_default(),
        branch_of_engineering: education.branch_of_engineering.unwrap_or_default(),
        cgpa: education.cgpa.unwrap_or_default(),
        backlogs: "0".to_string(),
        live_backlogs: "0".to_string(),
        internships: String::new(),
        programming_languages: known_language_subset(&skills, KNOWN_LANGUAGES),
        projects: String::new(),
        skills,
    }
}

/// Returns the subsequence of `skills` whose lower-cased value is a member of
/// `vocabulary`. Relative order is preserved and duplicates are kept.
pub fn known_language_subset(skills: &[String], vocabulary: &[&str]) -> Vec<String> {
    skills
        .iter()
        .filter(|skill| vocabulary.contains(&skill.to_lowercase().as_str()))
        .cloned()
        .collect()
}
