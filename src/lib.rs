// Resume Builder - editor core for a live-preview resume builder
//
// This is the library crate: the resume document, its editable collections,
// the preview projection, the design store and the backend seams. A host
// shell drives it through ui::EditorController.

pub mod collections;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod preview;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use collections::{RowKey, RowList};
pub use config::{AppSettings, ConfigManager};
pub use models::{DesignConfig, EditorState, Notification, ResumeDocument};
pub use preview::TemplateId;
pub use state::{StateChange, StateManager};
pub use ui::{Command, CommandOutcome, EditorController};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
