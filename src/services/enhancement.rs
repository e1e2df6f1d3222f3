use crate::collections::RowKey;
use crate::metrics::Metrics;
use crate::models::{EditorState, ExperienceField, ProjectPatch};
use crate::services::backend::{BackendClient, EnhanceRequest, TransportError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const DEFAULT_FAILURE_MESSAGE: &str = "Enhancement failed";

static FIELD_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(title|description):(.*)$").expect("field prefix pattern is valid")
});

/// Sections the backend knows how to enhance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementSection {
    Summary,
    Skills,
    Experience,
    Projects,
}

impl EnhancementSection {
    pub fn name(self) -> &'static str {
        match self {
            EnhancementSection::Summary => "summary",
            EnhancementSection::Skills => "skills",
            EnhancementSection::Experience => "experience",
            EnhancementSection::Projects => "projects",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            EnhancementSection::Summary => "Summary enhanced successfully!",
            EnhancementSection::Skills => "Skills enhanced successfully!",
            EnhancementSection::Experience => "Experience description enhanced!",
            EnhancementSection::Projects => "Projects enhanced successfully!",
        }
    }
}

impl fmt::Display for EnhancementSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnhancementSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(EnhancementSection::Summary),
            "skills" => Ok(EnhancementSection::Skills),
            "experience" => Ok(EnhancementSection::Experience),
            "projects" => Ok(EnhancementSection::Projects),
            other => Err(format!("Unknown enhancement section: {}", other)),
        }
    }
}

/// What an enhancement request rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhancementTarget {
    Summary,
    Skills,
    /// The description of one experience row
    Experience(RowKey),
    Projects,
}

impl EnhancementTarget {
    pub fn section(self) -> EnhancementSection {
        match self {
            EnhancementTarget::Summary => EnhancementSection::Summary,
            EnhancementTarget::Skills => EnhancementSection::Skills,
            EnhancementTarget::Experience(_) => EnhancementSection::Experience,
            EnhancementTarget::Projects => EnhancementSection::Projects,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnhancementError {
    /// Rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error("Please wait for current enhancement to complete")]
    InFlight,

    #[error("Failed to connect to backend. Make sure the server is running.")]
    Connectivity { detail: String },

    /// `success: false` from the backend, message verbatim
    #[error("{0}")]
    ServerReported(String),

    #[error("Error parsing enhanced projects. Try again.")]
    Parse { detail: String },
}

impl EnhancementError {
    fn empty_content(section: EnhancementSection) -> Self {
        match section {
            EnhancementSection::Experience => {
                EnhancementError::Validation("Please add experience description first".to_string())
            }
            other => EnhancementError::Validation(format!("Please add {} content first", other)),
        }
    }

    fn no_projects() -> Self {
        EnhancementError::Validation("Please add at least one project first".to_string())
    }
}

impl From<TransportError> for EnhancementError {
    fn from(err: TransportError) -> Self {
        EnhancementError::Connectivity {
            detail: err.to_string(),
        }
    }
}

/// Enhanced project text, by detected format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectsPayload {
    /// JSON array of record objects
    Structured(Vec<ProjectPatch>),
    /// `---`-separated blocks of `Title:`/`Description:` lines
    Delimited(Vec<ProjectPatch>),
}

impl ProjectsPayload {
    /// Pick the decoder from the first non-blank character: `[` or `{`
    /// selects JSON, anything else the delimited text form.
    ///
    /// Structured payloads must be an array of record objects. A bare object
    /// (a single record or a wrapper such as `{"projects": [...]}`) is a
    /// parse error.
    pub fn decode(raw: &str) -> Result<Self, EnhancementError> {
        let trimmed = raw.trim();

        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            let records = serde_json::from_str::<Vec<ProjectPatch>>(trimmed).map_err(|e| {
                EnhancementError::Parse {
                    detail: e.to_string(),
                }
            })?;
            Ok(ProjectsPayload::Structured(records))
        } else {
            Ok(ProjectsPayload::Delimited(parse_delimited(raw)))
        }
    }

    pub fn into_patches(self) -> Vec<ProjectPatch> {
        match self {
            ProjectsPayload::Structured(records) | ProjectsPayload::Delimited(records) => records,
        }
    }
}

fn parse_delimited(raw: &str) -> Vec<ProjectPatch> {
    raw.split("---")
        .map(|block| {
            let mut title = String::new();
            let mut description = String::new();

            for line in block.trim().split('\n') {
                if let Some(caps) = FIELD_PREFIX.captures(line) {
                    let value = caps[2].trim().to_string();
                    if caps[1].eq_ignore_ascii_case("title") {
                        title = value;
                    } else {
                        description = value;
                    }
                } else if !description.is_empty() {
                    description.push(' ');
                    description.push_str(line.trim());
                }
            }

            ProjectPatch {
                title: (!title.is_empty()).then_some(title),
                description: (!description.is_empty()).then_some(description),
            }
        })
        .filter(|record| !record.is_empty())
        .collect()
}

/// A decoded enhancement, ready to be applied to the editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancementMerge {
    Summary(String),
    Skills(String),
    ExperienceDescription(RowKey, String),
    Projects(Vec<ProjectPatch>),
}

impl EnhancementMerge {
    /// Build the merge for `target` from the backend's enhanced text.
    pub fn plan(target: EnhancementTarget, enhanced: String) -> Result<Self, EnhancementError> {
        Ok(match target {
            EnhancementTarget::Summary => EnhancementMerge::Summary(enhanced),
            EnhancementTarget::Skills => EnhancementMerge::Skills(enhanced),
            EnhancementTarget::Experience(key) => {
                EnhancementMerge::ExperienceDescription(key, enhanced)
            }
            EnhancementTarget::Projects => {
                EnhancementMerge::Projects(ProjectsPayload::decode(&enhanced)?.into_patches())
            }
        })
    }

    /// Write the enhanced values into their fields, resyncing and
    /// re-projecting. Returns false when the target row no longer exists.
    pub fn apply(self, state: &mut EditorState) -> bool {
        use crate::models::PersonalField;

        match self {
            EnhancementMerge::Summary(text) => {
                state.set_personal(PersonalField::Summary, text);
                true
            }
            EnhancementMerge::Skills(text) => {
                state.set_skills(text);
                true
            }
            EnhancementMerge::ExperienceDescription(key, text) => {
                state.edit_experience(key, ExperienceField::Description, text)
            }
            EnhancementMerge::Projects(patches) => {
                let applied = state.apply_project_patches(&patches);
                if applied < patches.len() {
                    debug!(
                        "Discarded {} enhanced project records beyond the row count",
                        patches.len() - applied
                    );
                }
                true
            }
        }
    }
}

/// Held while a request is in flight; clears the flag on drop.
#[must_use]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Sends field text to the backend for rewriting, one request at a time.
pub struct EnhancementGateway {
    backend: Arc<dyn BackendClient>,
    in_flight: AtomicBool,
    metrics: Arc<Metrics>,
}

impl EnhancementGateway {
    pub fn new(backend: Arc<dyn BackendClient>, metrics: Arc<Metrics>) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
            metrics,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the single-flight slot.
    pub fn begin(&self) -> Result<InFlightGuard<'_>, EnhancementError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                self.metrics.record_enhancement_rejection();
                warn!("Enhancement rejected: another request is in flight");
                EnhancementError::InFlight
            })?;

        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }

    /// Collect and validate the text to send for `target`.
    pub fn content_for(
        &self,
        target: EnhancementTarget,
        state: &EditorState,
    ) -> Result<String, EnhancementError> {
        let content = match target {
            EnhancementTarget::Summary => state.document.personal.summary.trim().to_string(),
            EnhancementTarget::Skills => state.document.skills.trim().to_string(),
            EnhancementTarget::Experience(key) => state
                .experience_rows
                .row(key)
                .map(|row| row.view.description.trim().to_string())
                .unwrap_or_default(),
            EnhancementTarget::Projects => {
                if state.document.projects.is_empty() {
                    self.metrics.record_enhancement_rejection();
                    return Err(EnhancementError::no_projects());
                }
                state.projects_enhancement_text()
            }
        };

        if content.is_empty() {
            self.metrics.record_enhancement_rejection();
            return Err(EnhancementError::empty_content(target.section()));
        }

        Ok(content)
    }

    /// Send one request and return the enhanced text.
    pub async fn request(
        &self,
        section: EnhancementSection,
        content: String,
    ) -> Result<String, EnhancementError> {
        let request = EnhanceRequest { section, content };
        info!("Requesting {} enhancement", section);
        self.metrics.record_enhancement_request();

        let start = Instant::now();
        let result = self.backend.enhance(&request).await;
        self.metrics.record_backend_time(start.elapsed());

        let response = result.inspect_err(|e| error!("Enhancement request failed: {}", e))?;

        if !response.success {
            let message = response
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            warn!("Backend reported enhancement failure: {}", message);
            return Err(EnhancementError::ServerReported(message));
        }

        match response.enhanced {
            Some(enhanced) => Ok(enhanced),
            None if section == EnhancementSection::Projects => Err(EnhancementError::Parse {
                detail: "response has no enhanced text".to_string(),
            }),
            None => Err(EnhancementError::ServerReported(
                DEFAULT_FAILURE_MESSAGE.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionKind, ProjectField};
    use crate::services::backend::{EnhanceResponse, MockBackendClient};

    fn gateway(mock: MockBackendClient) -> EnhancementGateway {
        EnhancementGateway::new(Arc::new(mock), Arc::new(Metrics::new()))
    }

    #[test]
    fn test_decode_delimited_projects() {
        let raw = "Title: Engine\nDescription: Fast parser\n---\nTITLE: Cache";
        let payload = ProjectsPayload::decode(raw).unwrap();

        assert_eq!(
            payload,
            ProjectsPayload::Delimited(vec![
                ProjectPatch {
                    title: Some("Engine".to_string()),
                    description: Some("Fast parser".to_string()),
                },
                ProjectPatch {
                    title: Some("Cache".to_string()),
                    description: None,
                },
            ])
        );
    }

    #[test]
    fn test_delimited_continuation_lines_join_description() {
        let raw = "Description: First line\n  second line\nthird";
        let patches = ProjectsPayload::decode(raw).unwrap().into_patches();

        assert_eq!(
            patches[0].description.as_deref(),
            Some("First line second line third")
        );
    }

    #[test]
    fn test_delimited_drops_empty_records() {
        let raw = "just prose\n---\n---\nTitle: Kept";
        let patches = ProjectsPayload::decode(raw).unwrap().into_patches();

        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_decode_structured_array() {
        let array = ProjectsPayload::decode(r#" [{"title": "A"}, {"description": "B"}]"#).unwrap();
        assert!(matches!(array, ProjectsPayload::Structured(ref v) if v.len() == 2));
    }

    #[test]
    fn test_structured_object_is_parse_error() {
        for raw in [r#"{"title": "Solo"}"#, r#"{"projects": [{"title": "Renamed"}]}"#] {
            let err = ProjectsPayload::decode(raw).unwrap_err();
            assert!(matches!(err, EnhancementError::Parse { .. }), "{raw}");
        }

        let err = ProjectsPayload::decode(r#"["just a string"]"#).unwrap_err();
        assert!(matches!(err, EnhancementError::Parse { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ProjectsPayload::decode("[{\"title\": ").unwrap_err();
        assert!(matches!(err, EnhancementError::Parse { .. }));
        assert_eq!(err.to_string(), "Error parsing enhanced projects. Try again.");
    }

    #[test]
    fn test_content_validation_messages() {
        let gateway = gateway(MockBackendClient::new());
        let state = EditorState::default();

        let err = gateway
            .content_for(EnhancementTarget::Summary, &state)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please add summary content first");

        let err = gateway
            .content_for(EnhancementTarget::Projects, &state)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please add at least one project first");
    }

    #[test]
    fn test_experience_content_uses_row_description() {
        let gateway = gateway(MockBackendClient::new());
        let mut state = EditorState::default();
        let key = state.add_row(CollectionKind::Experience);

        let err = gateway
            .content_for(EnhancementTarget::Experience(key), &state)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please add experience description first");

        state.edit_experience(key, ExperienceField::Description, "  Led team ".to_string());
        assert_eq!(
            gateway
                .content_for(EnhancementTarget::Experience(key), &state)
                .unwrap(),
            "Led team"
        );
    }

    #[test]
    fn test_projects_content_with_blank_rows_is_accepted() {
        let gateway = gateway(MockBackendClient::new());
        let mut state = EditorState::default();
        let key = state.add_row(CollectionKind::Projects);
        state.edit_project(key, ProjectField::Title, "Parser".to_string());

        let content = gateway
            .content_for(EnhancementTarget::Projects, &state)
            .unwrap();
        assert_eq!(content, "Title: Parser\nDescription: ");
    }

    #[test]
    fn test_single_flight_guard() {
        let gateway = gateway(MockBackendClient::new());

        let guard = gateway.begin().unwrap();
        assert!(gateway.is_in_flight());
        assert_eq!(gateway.begin().err(), Some(EnhancementError::InFlight));

        drop(guard);
        assert!(!gateway.is_in_flight());
        assert!(gateway.begin().is_ok());
    }

    #[tokio::test]
    async fn test_request_returns_enhanced_text() {
        let mut mock = MockBackendClient::new();
        mock.expect_enhance()
            .withf(|req| req.section == EnhancementSection::Skills && req.content == "rust")
            .times(1)
            .returning(|_| {
                Ok(EnhanceResponse {
                    success: true,
                    enhanced: Some("Rust, Tokio".to_string()),
                    error: None,
                })
            });

        let result = gateway(mock)
            .request(EnhancementSection::Skills, "rust".to_string())
            .await;
        assert_eq!(result, Ok("Rust, Tokio".to_string()));
    }

    #[tokio::test]
    async fn test_server_reported_failure_falls_back() {
        let mut mock = MockBackendClient::new();
        mock.expect_enhance().returning(|_| Ok(EnhanceResponse::default()));

        let err = gateway(mock)
            .request(EnhancementSection::Summary, "x".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, EnhancementError::ServerReported("Enhancement failed".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_connectivity_error() {
        let mut mock = MockBackendClient::new();
        mock.expect_enhance().returning(|_| {
            Err(TransportError::Status {
                status: 500,
                message: None,
            })
        });

        let err = gateway(mock)
            .request(EnhancementSection::Summary, "x".to_string())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to connect to backend. Make sure the server is running."
        );
    }

    #[test]
    fn test_merge_projects_discards_extra_records() {
        let mut state = EditorState::default();
        state.add_row(CollectionKind::Projects);

        let merge = EnhancementMerge::plan(
            EnhancementTarget::Projects,
            "Title: One\n---\nTitle: Two".to_string(),
        )
        .unwrap();
        assert!(merge.apply(&mut state));

        assert_eq!(state.document.projects.len(), 1);
        assert_eq!(state.document.projects[0].title, "One");
    }
}
