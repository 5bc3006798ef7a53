//! Storage backend client — persists corrected profiles and proxies the
//! read-only listing and download endpoints.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::clients::{build_http_client, ServiceError};
use crate::models::resume::ResumeRecord;
use crate::profile::models::EditableProfile;

#[derive(Debug, Deserialize)]
struct SaveEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    /// Record id assigned by the backend. Informational only.
    #[serde(default)]
    id: Option<i64>,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Persists one corrected profile. Exactly one outbound request.
    async fn save(&self, profile: &EditableProfile) -> Result<(), ServiceError>;

    /// Lists the records the backend holds.
    async fn list(&self) -> Result<Vec<ResumeRecord>, ServiceError>;

    /// Fetches the original document body for one record.
    async fn download(&self, id: i64) -> Result<Bytes, ServiceError>;
}

/// HTTP implementation against the storage backend's JSON API.
pub struct HttpResumeStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResumeStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResumeStore for HttpResumeStore {
    async fn save(&self, profile: &EditableProfile) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(format!("{}/save-resume/", self.base_url))
            .json(profile)
            .send()
            .await?;

        let envelope: SaveEnvelope = response.json().await?;
        if envelope.success {
            debug!("Profile persisted (record id {:?})", envelope.id);
            Ok(())
        } else {
            Err(ServiceError::Rejected {
                reason: envelope
                    .error
                    .unwrap_or_else(|| "storage backend reported a failure".to_string()),
            })
        }
    }

    async fn list(&self) -> Result<Vec<ResumeRecord>, ServiceError> {
        let records = self
            .client
            .get(format!("{}/resumes/", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(records)
    }

    async fn download(&self, id: i64) -> Result<Bytes, ServiceError> {
        let body = self
            .client
            .get(format!("{}/resumes/{}/download/", self.base_url, id))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_envelope_success() {
        let json = r#"{"success": true, "message": "Resume information saved successfully", "id": 1}"#;
        let envelope: SaveEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.id, Some(1));
    }

    #[test]
    fn test_save_envelope_failure() {
        let json = r#"{"success": false, "error": "No data provided"}"#;
        let envelope: SaveEnvelope = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("No data provided"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let store = HttpResumeStore::new("http://localhost:5000/api/");
        assert_eq!(store.base_url, "http://localhost:5000/api");
    }
}
