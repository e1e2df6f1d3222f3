use crate::collections::{RowKey, RowList};
use crate::models::design::{DesignConfig, SurfaceStyle};
use crate::models::document::{PersonalField, ResumeDocument};
use crate::models::notification::Notification;
use crate::models::rows::{
    CollectionKind, EducationField, EducationRow, ExperienceField, ExperienceRow, ProjectField,
    ProjectPatch, ProjectRow,
};
use crate::preview::{self, Preview, TemplateId};

/// Single source of truth for one editing session.
///
/// Holds the document, the editable rows of its three collections and every
/// value derived from them (preview surfaces, completion metric, custom
/// surface style). Every mutating method leaves the derived values fully
/// recomputed; nothing derived is ever edited directly.
///
/// # Thread Safety
///
/// `EditorState` is wrapped in `Arc<RwLock<EditorState>>` by
/// [`crate::state::StateManager`]. Go through its methods:
/// - [`read()`](crate::state::StateManager::read) for read-only access
/// - [`update()`](crate::state::StateManager::update) for mutations with change events
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    pub document: ResumeDocument,

    // Editable rows, one list per collection
    pub experience_rows: RowList<ExperienceRow>,
    pub education_rows: RowList<EducationRow>,
    pub project_rows: RowList<ProjectRow>,

    // Derived state
    pub preview: Preview,
    pub completion: u8,
    pub applied_style: Option<SurfaceStyle>,

    // Presentation
    pub active_template: TemplateId,
    pub design: DesignConfig,

    // Runtime flags
    pub is_enhancing: bool,
    pub is_loading: bool,
    pub last_notification: Option<Notification>,
}

impl Default for EditorState {
    fn default() -> Self {
        let document = ResumeDocument::default();
        Self {
            preview: preview::project(&document),
            completion: document.completion_percent(),
            document,

            experience_rows: RowList::new(),
            education_rows: RowList::new(),
            project_rows: RowList::new(),

            applied_style: None,

            active_template: TemplateId::default(),
            design: DesignConfig::default(),

            is_enhancing: false,
            is_loading: false,
            last_notification: None,
        }
    }
}

impl EditorState {
    /// Re-project every surface and recompute the completion metric.
    ///
    /// The custom surface style is reapplied whenever the custom template is
    /// active, so freshly rendered skill tags never show stale styling.
    pub fn refresh(&mut self) {
        self.preview = preview::project(&self.document);
        self.completion = self.document.completion_percent();
        if self.active_template.is_customizable() {
            self.applied_style = Some(self.design.surface_style());
        }
    }

    pub fn set_personal(&mut self, field: PersonalField, value: String) {
        self.document.personal.set(field, value);
        self.refresh();
    }

    pub fn set_skills(&mut self, value: String) {
        self.document.skills = value;
        self.refresh();
    }

    pub fn add_row(&mut self, kind: CollectionKind) -> RowKey {
        let key = match kind {
            CollectionKind::Experience => {
                self.experience_rows.add(&mut self.document.experiences)
            }
            CollectionKind::Education => self.education_rows.add(&mut self.document.education),
            CollectionKind::Projects => self.project_rows.add(&mut self.document.projects),
        };
        self.refresh();
        key
    }

    pub fn remove_row(&mut self, kind: CollectionKind, key: RowKey) -> bool {
        let removed = match kind {
            CollectionKind::Experience => self
                .experience_rows
                .remove(key, &mut self.document.experiences),
            CollectionKind::Education => self
                .education_rows
                .remove(key, &mut self.document.education),
            CollectionKind::Projects => {
                self.project_rows.remove(key, &mut self.document.projects)
            }
        };
        self.refresh();
        removed
    }

    /// Rebuild one collection's entries from its rows.
    pub fn resync(&mut self, kind: CollectionKind) {
        match kind {
            CollectionKind::Experience => {
                self.experience_rows.resync(&mut self.document.experiences)
            }
            CollectionKind::Education => self.education_rows.resync(&mut self.document.education),
            CollectionKind::Projects => self.project_rows.resync(&mut self.document.projects),
        }
        self.refresh();
    }

    pub fn row_count(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Experience => self.experience_rows.len(),
            CollectionKind::Education => self.education_rows.len(),
            CollectionKind::Projects => self.project_rows.len(),
        }
    }

    pub fn row_keys(&self, kind: CollectionKind) -> Vec<RowKey> {
        match kind {
            CollectionKind::Experience => self.experience_rows.keys(),
            CollectionKind::Education => self.education_rows.keys(),
            CollectionKind::Projects => self.project_rows.keys(),
        }
    }

    /// Commit an edit of an experience row. Returns false for an unknown row
    /// or a disabled input; the collection is resynced either way.
    pub fn edit_experience(&mut self, key: RowKey, field: ExperienceField, value: String) -> bool {
        let applied = self
            .experience_rows
            .row_mut(key)
            .is_some_and(|row| row.set(field, value));
        self.resync(CollectionKind::Experience);
        applied
    }

    /// The "currently employed" toggle of one experience row.
    pub fn set_current_employment(&mut self, key: RowKey, current: bool) -> bool {
        let found = match self.experience_rows.row_mut(key) {
            Some(row) => {
                row.set_current(current);
                true
            }
            None => false,
        };
        self.resync(CollectionKind::Experience);
        found
    }

    pub fn edit_education(&mut self, key: RowKey, field: EducationField, value: String) -> bool {
        let found = match self.education_rows.row_mut(key) {
            Some(row) => {
                row.set(field, value);
                true
            }
            None => false,
        };
        self.resync(CollectionKind::Education);
        found
    }

    pub fn edit_project(&mut self, key: RowKey, field: ProjectField, value: String) -> bool {
        let found = match self.project_rows.row_mut(key) {
            Some(row) => {
                row.set(field, value);
                true
            }
            None => false,
        };
        self.resync(CollectionKind::Projects);
        found
    }

    /// Apply parsed project records to the existing rows by position.
    ///
    /// Records beyond the current row count are discarded; the row count
    /// never changes. Returns how many records were applied.
    pub fn apply_project_patches(&mut self, patches: &[ProjectPatch]) -> usize {
        let mut applied = 0;
        for (position, patch) in patches.iter().enumerate() {
            match self.project_rows.row_at_mut(position) {
                Some(row) => {
                    patch.apply_to(row);
                    applied += 1;
                }
                None => break,
            }
        }
        self.resync(CollectionKind::Projects);
        applied
    }

    /// Text sent for a project enhancement: one `Title:`/`Description:` block
    /// per project, separated by `---` lines.
    pub fn projects_enhancement_text(&self) -> String {
        self.document
            .projects
            .iter()
            .map(|p| format!("Title: {}\nDescription: {}", p.title, p.description))
            .collect::<Vec<_>>()
            .join("\n---\n")
    }

    pub fn switch_template(&mut self, template: TemplateId) {
        self.active_template = template;
        self.applied_style = template
            .is_customizable()
            .then(|| self.design.surface_style());
    }

    /// Replace the design configuration and restyle the custom surface when
    /// it is the active one.
    pub fn apply_design(&mut self, design: DesignConfig) {
        self.applied_style = self
            .active_template
            .is_customizable()
            .then(|| design.surface_style());
        self.design = design;
    }

    /// Return the document, rows and counters to their initial empty state.
    ///
    /// Presentation settings (active template, design) are kept.
    pub fn clear_all(&mut self) {
        self.document = ResumeDocument::default();
        self.experience_rows.reset();
        self.education_rows.reset();
        self.project_rows.reset();
        self.last_notification = None;
        self.refresh();
    }
}
