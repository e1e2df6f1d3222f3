// Editor Controller - Dispatches host commands onto the editor state
//
// This module contains the EditorController which coordinates between:
// - the host UI (whatever shell renders the editor)
// - StateManager (editor state and change events)
// - EnhancementGateway / GenerationService (backend seams)
// - DesignStore (persisted custom design)
//
// Every failure is caught here and turned into an error notification.

use crate::collections::RowKey;
use crate::config::{AppSettings, BlobStore, ConfigManager, DesignExport, DesignStore, FileBlobStore};
use crate::models::{
    CollectionKind, EducationField, ExperienceField, Notification, PersonalField, ProjectField,
};
use crate::preview::TemplateId;
use crate::services::{
    BackendClient, EnhancementGateway, EnhancementMerge, EnhancementTarget, GenerationService,
    HttpBackend, Navigator,
};
use crate::state::{StateChange, StateManager};
use crate::ui::feedback::{LoadingGuard, report_error};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// One host action, keyed by the field or action it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPersonal { field: PersonalField, value: String },
    SetSkills(String),
    AddRow(CollectionKind),
    RemoveRow { kind: CollectionKind, key: RowKey },
    EditExperience { key: RowKey, field: ExperienceField, value: String },
    /// The "currently employed" checkbox of one experience row
    ToggleCurrent { key: RowKey, current: bool },
    EditEducation { key: RowKey, field: EducationField, value: String },
    EditProject { key: RowKey, field: ProjectField, value: String },
    SwitchTemplate(TemplateId),
    UpdateDesign { name: String, value: Value },
    SaveDesign,
    ResetDesign,
    ExportDesign,
    ClearAll,
}

impl Command {
    /// Command for a top-level input by its element id (`fullName`,
    /// `summary`, `skills`, ...).
    pub fn for_field(id: &str, value: String) -> Option<Command> {
        if id == "skills" {
            return Some(Command::SetSkills(value));
        }
        id.parse::<PersonalField>()
            .ok()
            .map(|field| Command::SetPersonal { field, value })
    }
}

/// What a dispatched command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    RowAdded(RowKey),
    Exported(DesignExport),
    /// The command targeted a row that no longer exists or a disabled input,
    /// or it failed and was reported as a notification
    Ignored,
}

/// Coordinates host commands, the editor state and the backend services.
///
/// # Example
/// ```ignore
/// let config_manager = ConfigManager::new("Resume Builder Data")?;
/// let settings = config_manager.load_settings()?;
/// let controller = EditorController::from_settings(&config_manager, &settings, navigator)?;
///
/// let mut events = controller.subscribe();
/// controller.dispatch(Command::for_field("fullName", "Ada".into()).unwrap());
/// controller.enhance(EnhancementTarget::Summary).await;
/// ```
pub struct EditorController<S: BlobStore> {
    state_manager: Arc<StateManager>,
    enhancement: EnhancementGateway,
    generation: GenerationService,
    designs: DesignStore<S>,
    navigator: Arc<dyn Navigator>,
}

impl EditorController<FileBlobStore> {
    /// Controller talking HTTP to the configured backend, with designs stored
    /// under the config directory.
    pub fn from_settings(
        config_manager: &ConfigManager,
        settings: &AppSettings,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let backend =
            HttpBackend::from_settings(settings).context("Failed to build HTTP backend client")?;
        let designs = config_manager.design_store(settings)?;

        Ok(Self::new(
            Arc::new(StateManager::new()),
            Arc::new(backend),
            designs,
            navigator,
            settings,
        ))
    }
}

impl<S: BlobStore> EditorController<S> {
    /// Create a controller. The saved design, if any, becomes the initial
    /// design configuration.
    pub fn new(
        state_manager: Arc<StateManager>,
        backend: Arc<dyn BackendClient>,
        designs: DesignStore<S>,
        navigator: Arc<dyn Navigator>,
        settings: &AppSettings,
    ) -> Self {
        let metrics = Arc::clone(state_manager.metrics());
        let enhancement = EnhancementGateway::new(Arc::clone(&backend), Arc::clone(&metrics));
        let generation = GenerationService::new(
            backend,
            settings.backend_url.clone(),
            Duration::from_millis(settings.download_delay_ms),
            metrics,
        );

        let controller = Self {
            state_manager,
            enhancement,
            generation,
            designs,
            navigator,
        };
        controller.load_saved_design();

        tracing::info!("Editor controller initialized");
        controller
    }

    pub fn state(&self) -> &Arc<StateManager> {
        &self.state_manager
    }

    pub fn designs(&self) -> &DesignStore<S> {
        &self.designs
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_manager.subscribe()
    }

    /// Write the session counters to the log (hosts call this on shutdown).
    pub fn log_metrics(&self) {
        self.state_manager.metrics().log_summary();
    }

    fn load_saved_design(&self) {
        let current = self.state_manager.read(|s| s.design.clone());
        match self.designs.load(&current) {
            Ok(design) => {
                self.state_manager.update(|s| s.design = design);
            }
            Err(e) => tracing::warn!("Could not load saved design: {:#}", e),
        }
    }

    /// Run one synchronous command to completion.
    pub fn dispatch(&self, command: Command) -> CommandOutcome {
        tracing::debug!("Dispatching {:?}", command);
        let sm = &self.state_manager;

        match command {
            Command::SetPersonal { field, value } => {
                sm.set_personal(field, value);
                CommandOutcome::Applied
            }
            Command::SetSkills(value) => {
                sm.set_skills(value);
                CommandOutcome::Applied
            }
            Command::AddRow(kind) => CommandOutcome::RowAdded(sm.add_row(kind).0),
            Command::RemoveRow { kind, key } => applied(sm.remove_row(kind, key).0),
            Command::EditExperience { key, field, value } => {
                applied(sm.edit_experience(key, field, value).0)
            }
            Command::ToggleCurrent { key, current } => {
                applied(sm.set_current_employment(key, current).0)
            }
            Command::EditEducation { key, field, value } => {
                applied(sm.edit_education(key, field, value).0)
            }
            Command::EditProject { key, field, value } => {
                applied(sm.edit_project(key, field, value).0)
            }
            Command::SwitchTemplate(template) => self.switch_template(template),
            Command::UpdateDesign { name, value } => self.update_design(&name, value),
            Command::SaveDesign => self.save_design(),
            Command::ResetDesign => self.reset_design(),
            Command::ExportDesign => self.export_design(),
            Command::ClearAll => {
                sm.clear_all();
                sm.notify(Notification::success("All data cleared"));
                CommandOutcome::Applied
            }
        }
    }

    fn switch_template(&self, template: TemplateId) -> CommandOutcome {
        self.state_manager.switch_template(template);

        if template.is_customizable() {
            let current = self.state_manager.read(|s| s.design.clone());
            match self.designs.load(&current) {
                Ok(design) => {
                    self.state_manager.apply_design(design);
                }
                Err(e) => tracing::warn!("Could not load saved design: {:#}", e),
            }
        }

        tracing::info!("Switched to {} template", template);
        CommandOutcome::Applied
    }

    /// Apply one design parameter and persist the result.
    fn update_design(&self, name: &str, value: Value) -> CommandOutcome {
        let mut design = self.state_manager.read(|s| s.design.clone());
        if let Err(e) = design.set_param(name, value) {
            report_error(&self.state_manager, e);
            return CommandOutcome::Ignored;
        }

        if let Err(e) = self.designs.save(&design) {
            tracing::warn!("Design change not persisted: {:#}", e);
        }
        self.state_manager.apply_design(design);
        CommandOutcome::Applied
    }

    fn save_design(&self) -> CommandOutcome {
        let design = self.state_manager.read(|s| s.design.clone());
        match self.designs.save(&design) {
            Ok(()) => {
                self.state_manager
                    .notify(Notification::success("Design saved successfully!"));
                CommandOutcome::Applied
            }
            Err(e) => {
                report_error(&self.state_manager, format!("{:#}", e));
                CommandOutcome::Ignored
            }
        }
    }

    fn reset_design(&self) -> CommandOutcome {
        match self.designs.reset() {
            Ok(defaults) => {
                self.state_manager.apply_design(defaults);
                self.state_manager
                    .notify(Notification::success("Design reset to defaults"));
                CommandOutcome::Applied
            }
            Err(e) => {
                report_error(&self.state_manager, format!("{:#}", e));
                CommandOutcome::Ignored
            }
        }
    }

    fn export_design(&self) -> CommandOutcome {
        let design = self.state_manager.read(|s| s.design.clone());
        match self.designs.export(&design) {
            Ok(export) => {
                self.state_manager
                    .notify(Notification::success("Design configuration exported!"));
                CommandOutcome::Exported(export)
            }
            Err(e) => {
                report_error(&self.state_manager, format!("{:#}", e));
                CommandOutcome::Ignored
            }
        }
    }

    /// Enhance one section (or one experience description) through the
    /// backend. Returns true when the enhanced text was applied.
    ///
    /// Every rejection and failure ends as an error notification; the
    /// single-flight slot and busy flags are released on every path.
    pub async fn enhance(&self, target: EnhancementTarget) -> bool {
        let _in_flight = match self.enhancement.begin() {
            Ok(guard) => guard,
            Err(e) => {
                report_error(&self.state_manager, e);
                return false;
            }
        };

        let content = match self
            .state_manager
            .read(|s| self.enhancement.content_for(target, s))
        {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Enhancement rejected: {}", e);
                report_error(&self.state_manager, e);
                return false;
            }
        };

        let show_loading = !matches!(target, EnhancementTarget::Experience(_));
        let busy = LoadingGuard::enhancing(&self.state_manager, show_loading);

        let result = match self.enhancement.request(target.section(), content).await {
            Ok(enhanced) => EnhancementMerge::plan(target, enhanced),
            Err(e) => Err(e),
        };
        drop(busy);

        match result {
            Ok(merge) => {
                let (applied, _) = self.state_manager.update_with(|s| merge.apply(s));
                if applied {
                    self.state_manager
                        .notify(Notification::success(target.section().success_message()));
                } else {
                    tracing::warn!("Enhanced text dropped: target row was removed");
                }
                applied
            }
            Err(e) => {
                report_error(&self.state_manager, e);
                false
            }
        }
    }

    /// Generate the resume on the backend and run the download sequence.
    /// Returns true when generation succeeded.
    pub async fn generate(&self) -> bool {
        let document = self.state_manager.read(|s| s.document.clone());
        if let Err(e) = GenerationService::validate(&document) {
            report_error(&self.state_manager, e);
            return false;
        }

        let result = {
            let _loading = LoadingGuard::loading(&self.state_manager);
            self.generation.generate(&document).await
        };

        match result {
            Ok(plan) => {
                self.state_manager.notify(Notification::success(
                    "Resume generated! Downloads will start shortly.",
                ));
                plan.run(self.navigator.as_ref()).await;
                true
            }
            Err(e) => {
                report_error(&self.state_manager, e);
                false
            }
        }
    }
}

fn applied(found: bool) -> CommandOutcome {
    if found {
        CommandOutcome::Applied
    } else {
        CommandOutcome::Ignored
    }
}
