//! Services module - the editor's two outward seams.
//!
//! The services hold no editor state of their own. They take what they need
//! from an [`EditorState`](crate::models::EditorState) snapshot or a
//! [`ResumeDocument`](crate::models::ResumeDocument) and hand results back for
//! the controller to apply.
//!
//! # Components
//!
//! - [`BackendClient`]: request/response contract of the remote service, with
//!   [`HttpBackend`] as the reqwest implementation.
//! - [`EnhancementGateway`]: validates and sends one enhancement request at a
//!   time, and decodes the enhanced project payload (JSON or delimited text)
//!   into an [`EnhancementMerge`].
//! - [`GenerationService`]: gates on name and email, submits the document, and
//!   returns the [`DownloadPlan`] the host runs through its [`Navigator`].
//!
//! # Usage Example
//!
//! ```ignore
//! use resume_builder::services::{EnhancementGateway, EnhancementMerge, EnhancementTarget};
//!
//! let _guard = gateway.begin()?;
//! let content = gateway.content_for(EnhancementTarget::Summary, &snapshot)?;
//! let enhanced = gateway.request(EnhancementTarget::Summary.section(), content).await?;
//! let merge = EnhancementMerge::plan(EnhancementTarget::Summary, enhanced)?;
//! state_manager.update(|state| {
//!     merge.apply(state);
//! });
//! ```

pub mod backend;
pub mod enhancement;
pub mod generation;

pub use backend::{
    BackendClient, EnhanceRequest, EnhanceResponse, GenerateResponse, HttpBackend, TransportError,
};
pub use enhancement::{
    EnhancementError, EnhancementGateway, EnhancementMerge, EnhancementSection, EnhancementTarget,
    InFlightGuard, ProjectsPayload,
};
pub use generation::{
    DEFAULT_DOWNLOAD_DELAY, DownloadPlan, DownloadStep, GenerationError, GenerationService,
    Navigator,
};
