//! Data models for the resume editor.
//!
//! - [`ResumeDocument`]: the canonical resume content and its entries
//! - [`rows`]: editable-row view models for the experience, education and project collections
//! - [`DesignConfig`]: presentation parameters of the customizable template surface
//! - [`EditorState`]: the owned session object holding the document, rows and all derived values
//! - [`Notification`]: transient user-visible messages
//!
//! # Architecture Note
//!
//! - **Serializable**: the document and design configuration derive `Serialize`/`Deserialize`
//!   with the wire names used by the backend and the persisted design blob
//! - **Derived, not edited**: preview surfaces, completion and custom styling are recomputed
//!   by [`EditorState`] after every mutation
//! - **Shared through the state manager**: [`StateManager`](crate::state::StateManager) wraps
//!   `EditorState` in `Arc<RwLock<>>` and emits change events

pub mod design;
pub mod document;
pub mod editor_state;
pub mod notification;
pub mod rows;

pub use design::{DesignConfig, DesignParamError, SurfaceStyle};
pub use document::{
    EducationEntry, ExperienceEntry, PersonalField, PersonalInfo, ProjectEntry, ResumeDocument,
};
pub use editor_state::EditorState;
pub use notification::{Notification, NotificationKind};
pub use rows::{
    CollectionKind, EducationField, EducationRow, ExperienceField, ExperienceRow, ProjectField,
    ProjectPatch, ProjectRow,
};
