use serde::{Deserialize, Serialize};

/// Raw output of the external document-parsing service.
///
/// Every field may be absent or null; the service makes no promises about
/// casing or formatting of `skills`. Unknown members in the payload are
/// ignored. Nothing downstream consumes this type directly; it exists only
/// as input to [`crate::profile::normalize::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParseResult {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Option<RawEducation>,
    pub skills: Option<Vec<String>>,
}

/// Nested education block of the raw parse result. Wire names are
/// snake_case, matching the parse service contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEducation {
    pub year_of_passing: Option<String>,
    pub branch_of_engineering: Option<String>,
    pub cgpa: Option<String>,
}

/// Fully-defaulted, user-editable resume record used during a correction
/// session. Every field always has a defined value; the normalizer
/// guarantees totality. Wire names are camelCase and form the byte-for-byte
/// contract of the persistence service.
///
/// `backlogs` and `live_backlogs` hold non-negative integers encoded as
/// strings; the editor rejects anything else. List fields preserve
/// user-typed order and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub year_of_passing: String,
    pub branch_of_engineering: String,
    pub cgpa: String,
    pub backlogs: String,
    pub live_backlogs: String,
    pub internships: String,
    pub programming_languages: Vec<String>,
    pub projects: String,
    pub skills: Vec<String>,
}

impl Default for EditableProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            year_of_passing: String::new(),
            branch_of_engineering: String::new(),
            cgpa: String::new(),
            backlogs: "0".to_string(),
            live_backlogs: "0".to_string(),
            internships: String::new(),
            programming_languages: Vec::new(),
            projects: String::new(),
            skills: Vec::new(),
        }
    }
}

/// Closed set of scalar profile fields addressable by a single-key edit.
/// The two list fields (`skills`, `programmingLanguages`) are edited through
/// their own comma-split operations and are deliberately absent here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    YearOfPassing,
    BranchOfEngineering,
    Cgpa,
    Backlogs,
    LiveBacklogs,
    Internships,
    Projects,
}

impl ProfileField {
    /// Wire name of the field, as it appears in the persistence payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::YearOfPassing => "yearOfPassing",
            ProfileField::BranchOfEngineering => "branchOfEngineering",
            ProfileField::Cgpa => "cgpa",
            ProfileField::Backlogs => "backlogs",
            ProfileField::LiveBacklogs => "liveBacklogs",
            ProfileField::Internships => "internships",
            ProfileField::Projects => "projects",
        }
    }

    /// True for the numeric-as-text fields that only accept non-negative
    /// integer strings.
    pub fn is_count(&self) -> bool {
        matches!(self, ProfileField::Backlogs | ProfileField::LiveBacklogs)
    }
}
