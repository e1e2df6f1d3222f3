use crate::metrics::Metrics;
use crate::models::ResumeDocument;
use crate::services::backend::{
    BackendClient, DOWNLOAD_DOCX_PATH, DOWNLOAD_PDF_PATH, TransportError,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

pub const DEFAULT_DOWNLOAD_DELAY: Duration = Duration::from_millis(1000);

const SERVER_FAILURE_MESSAGE: &str = "Failed to generate resume on the server.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Please fill in at least your Name and Email before generating.")]
    Validation,

    #[error("Failed to connect to backend. Make sure the server is running.")]
    Connectivity { detail: String },

    #[error("{0}")]
    ServerReported(String),
}

impl From<TransportError> for GenerationError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { message, .. } => GenerationError::ServerReported(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SERVER_FAILURE_MESSAGE.to_string()),
            ),
            other => GenerationError::Connectivity {
                detail: other.to_string(),
            },
        }
    }
}

/// Where the host sends the user to fetch a generated file.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, url: &str) -> anyhow::Result<()>;
}

/// One navigation of the download sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadStep {
    pub url: String,
    /// Wait before navigating
    pub delay: Duration,
}

/// The DOCX download, then the PDF download after a fixed delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    steps: Vec<DownloadStep>,
}

impl DownloadPlan {
    pub fn new(base_url: &str, pdf_delay: Duration) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            steps: vec![
                DownloadStep {
                    url: format!("{}{}", base_url, DOWNLOAD_DOCX_PATH),
                    delay: Duration::ZERO,
                },
                DownloadStep {
                    url: format!("{}{}", base_url, DOWNLOAD_PDF_PATH),
                    delay: pdf_delay,
                },
            ],
        }
    }

    pub fn steps(&self) -> &[DownloadStep] {
        &self.steps
    }

    /// Run every step in order. A failed navigation is logged and the
    /// sequence continues.
    pub async fn run(&self, navigator: &dyn Navigator) {
        for step in &self.steps {
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }

            info!("Navigating to {}", step.url);
            if let Err(e) = navigator.navigate(&step.url).await {
                error!("Download navigation to {} failed: {:#}", step.url, e);
            }
        }
    }
}

/// Submits the document for server-side generation.
pub struct GenerationService {
    backend: Arc<dyn BackendClient>,
    base_url: String,
    download_delay: Duration,
    metrics: Arc<Metrics>,
}

impl GenerationService {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        base_url: impl Into<String>,
        download_delay: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            backend,
            base_url: base_url.into(),
            download_delay,
            metrics,
        }
    }

    /// Name and email are the minimum for generation.
    pub fn validate(document: &ResumeDocument) -> Result<(), GenerationError> {
        if document.has_required_identity() {
            Ok(())
        } else {
            warn!("Generation rejected: name or email missing");
            Err(GenerationError::Validation)
        }
    }

    /// Send the document and, on success, return the downloads to perform.
    pub async fn generate(&self, document: &ResumeDocument) -> Result<DownloadPlan, GenerationError> {
        Self::validate(document)?;

        info!("Requesting resume generation");
        self.metrics.record_generation_request();

        let start = Instant::now();
        let result = self.backend.generate(document).await;
        self.metrics.record_backend_time(start.elapsed());

        let response = result.inspect_err(|e| error!("Generation request failed: {}", e))?;

        if !response.success {
            let message = response
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| SERVER_FAILURE_MESSAGE.to_string());
            warn!("Backend reported generation failure: {}", message);
            return Err(GenerationError::ServerReported(message));
        }

        if let Some(filename) = &response.filename {
            info!("Backend generated {}", filename);
        }

        Ok(DownloadPlan::new(&self.base_url, self.download_delay))
    }
}
