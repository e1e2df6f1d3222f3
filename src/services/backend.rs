use crate::config::AppSettings;
use crate::models::ResumeDocument;
use crate::services::enhancement::EnhancementSection;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const ENHANCE_PATH: &str = "/enhance";
pub const GENERATE_PATH: &str = "/generate_resume";
pub const DOWNLOAD_DOCX_PATH: &str = "/download";
pub const DOWNLOAD_PDF_PATH: &str = "/download_pdf";

/// Failures talking to the backend, before any application-level result exists.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the body's `error` field when it had one.
    #[error("Backend returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhanceRequest {
    pub section: EnhancementSection,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnhanceResponse {
    pub success: bool,
    #[serde(alias = "enhanced_content")]
    pub enhanced: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: Option<String>,
    pub filename: Option<String>,
    pub error: Option<String>,
}

/// The remote text-enhancement and document-generation service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// `POST /enhance`. Any non-2xx status is a transport error.
    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhanceResponse, TransportError>;

    /// `POST /generate_resume` with the whole document.
    async fn generate(&self, document: &ResumeDocument)
    -> Result<GenerateResponse, TransportError>;
}

/// [`BackendClient`] over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Without a timeout the transport's own default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, TransportError> {
        Self::new(
            &settings.backend_url,
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhanceResponse, TransportError> {
        let url = self.endpoint(ENHANCE_PATH);
        debug!("POST {} (section: {})", url, request.section);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Enhance returned {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: None,
            });
        }

        Ok(response.json::<EnhanceResponse>().await?)
    }

    async fn generate(
        &self,
        document: &ResumeDocument,
    ) -> Result<GenerateResponse, TransportError> {
        let url = self.endpoint(GENERATE_PATH);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(document).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Generate returned {}: {}", status, body);
            let message = serde_json::from_str::<GenerateResponse>(&body)
                .ok()
                .and_then(|r| r.error);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_request_wire_shape() {
        let request = EnhanceRequest {
            section: EnhancementSection::Summary,
            content: "Writes Rust".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"section": "summary", "content": "Writes Rust"})
        );
    }

    #[test]
    fn test_enhance_response_accepts_enhanced_content_alias() {
        let response: EnhanceResponse =
            serde_json::from_str(r#"{"success": true, "enhanced_content": "Better"}"#).unwrap();

        assert!(response.success);
        assert_eq!(response.enhanced.as_deref(), Some("Better"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_failure_response_defaults() {
        let response: EnhanceResponse =
            serde_json::from_str(r#"{"error": "Missing section name"}"#).unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Missing section name"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:5002/", None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5002");
        assert_eq!(
            backend.endpoint(GENERATE_PATH),
            "http://localhost:5002/generate_resume"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let backend =
            HttpBackend::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let request = EnhanceRequest {
            section: EnhancementSection::Skills,
            content: "Rust".to_string(),
        };

        let result = backend.enhance(&request).await;
        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
