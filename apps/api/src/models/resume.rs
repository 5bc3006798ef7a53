use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-owned listing row returned by the storage backend. Read-only on
/// this side; the workflow only produces the payload that becomes one of
/// these records server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    /// Years of experience.
    pub experience: f64,
    /// Degree summary string, e.g. "Bachelor of Computer Science".
    pub education: String,
    pub location: String,
    pub uploaded_at: DateTime<Utc>,
}
