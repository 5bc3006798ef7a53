//! Parse service client — submits one binary document and receives the raw
//! structured extraction.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::clients::{build_http_client, ServiceError};
use crate::models::upload::SelectedFile;
use crate::profile::models::RawParseResult;

/// Response envelope of the parse service. The service answers with this
/// shape on every status code, so the flag is authoritative, not the status.
#[derive(Debug, Deserialize)]
struct ParseEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<RawParseResult>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
pub trait ParseService: Send + Sync {
    /// Sends the document for extraction. Exactly one outbound request.
    async fn parse(&self, file: &SelectedFile) -> Result<RawParseResult, ServiceError>;
}

/// HTTP implementation posting `multipart/form-data` with one part named
/// `resume` to `{base}/upload/`.
pub struct HttpParseService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpParseService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ParseService for HttpParseService {
    async fn parse(&self, file: &SelectedFile) -> Result<RawParseResult, ServiceError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("resume", part);

        debug!("Submitting '{}' to parse service", file.file_name);
        let response = self
            .client
            .post(format!("{}/upload/", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let envelope: ParseEnvelope = response.json().await?;
        if envelope.success {
            Ok(envelope.data.unwrap_or_default())
        } else {
            Err(ServiceError::Rejected {
                reason: envelope
                    .error
                    .unwrap_or_else(|| "parse service reported a failure".to_string()),
            })
        }
    }
}
