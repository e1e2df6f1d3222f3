// State management module
//
// This module provides the StateManager which wraps EditorState with shared access
// using Arc<RwLock<T>> and emits change events for the host UI.

use crate::collections::RowKey;
use crate::metrics::Metrics;
use crate::models::{
    CollectionKind, DesignConfig, EditorState, EducationField, ExperienceField, Notification,
    PersonalField, ProjectField, ProjectPatch,
};
use crate::preview::TemplateId;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// Hosts subscribe to these instead of polling the state; each event names
/// which derived view needs repainting.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Document content has changed
    DocumentChanged,

    /// Rows of one collection were added, removed or edited
    CollectionChanged { kind: CollectionKind, rows: usize },

    /// Preview surfaces were re-projected with different content
    PreviewUpdated,

    /// Completion metric moved
    CompletionChanged { percent: u8 },

    /// Another template surface became active
    TemplateSwitched { template: TemplateId },

    /// Design configuration or the custom surface style changed
    DesignApplied,

    /// An enhancement request is now in flight
    EnhancementStarted,

    /// The in-flight enhancement request settled
    EnhancementFinished,

    /// Loading indicator shown or hidden
    LoadingChanged { loading: bool },

    /// A notification should be shown
    Notified(Notification),

    /// Document and collections were cleared
    StateReset,
}

/// Shared editor state with event emission
///
/// This is the central state component that:
/// - Provides shared access to [`EditorState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// Every mutation goes through a named operation; derived values (preview,
/// completion, custom style) are recomputed inside the same write lock, so
/// readers never observe a document without its matching projection. The
/// lock is never held across an `.await`.
///
/// # Related Types
///
/// - [`crate::models::EditorState`]: The underlying state structure
/// - [`StateChange`]: Event types emitted on state mutations
/// - [`crate::ui::EditorController`]: Dispatches host commands onto this manager
pub struct StateManager {
    state: Arc<RwLock<EditorState>>,

    /// Multiple subscribers can listen for state changes
    state_tx: broadcast::Sender<StateChange>,

    metrics: Arc<Metrics>,
}

impl StateManager {
    /// Create a new StateManager with an empty document
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(Metrics::new()))
    }

    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(EditorState::default())),
            state_tx,
            metrics,
        }
    }

    /// Clone of the whole state, safe to keep without holding locks
    pub fn snapshot(&self) -> EditorState {
        self.read(Clone::clone)
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let completion = state_manager.read(|state| state.completion);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EditorState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// Captures the old state, applies the update, diffs the two and
    /// broadcasts one event per detected change.
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut EditorState),
    {
        self.update_with(update_fn).1
    }

    /// Like [`update`](Self::update), also returning the closure's result.
    pub fn update_with<F, R>(&self, update_fn: F) -> (R, Vec<StateChange>)
    where
        F: FnOnce(&mut EditorState) -> R,
    {
        let (result, changes) = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let old_state = state.clone();
            let result = update_fn(&mut state);
            (result, Self::detect_changes(&old_state, &state))
        };

        self.metrics.record_state_update();
        for change in &changes {
            self.broadcast(change.clone());
        }

        (result, changes)
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn broadcast(&self, change: StateChange) {
        // No subscribers is fine; the event is simply unobserved
        if self.state_tx.send(change).is_err() {
            self.metrics.record_unobserved_broadcast();
        }
    }

    /// Detect what changed between two states and generate events
    fn detect_changes(old: &EditorState, new: &EditorState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.document != new.document {
            changes.push(StateChange::DocumentChanged);
        }

        let collections = [
            (
                CollectionKind::Experience,
                old.experience_rows != new.experience_rows,
            ),
            (
                CollectionKind::Education,
                old.education_rows != new.education_rows,
            ),
            (CollectionKind::Projects, old.project_rows != new.project_rows),
        ];
        for (kind, changed) in collections {
            if changed {
                changes.push(StateChange::CollectionChanged {
                    kind,
                    rows: new.row_count(kind),
                });
            }
        }

        if old.preview != new.preview {
            changes.push(StateChange::PreviewUpdated);
        }

        if old.completion != new.completion {
            changes.push(StateChange::CompletionChanged {
                percent: new.completion,
            });
        }

        if old.active_template != new.active_template {
            changes.push(StateChange::TemplateSwitched {
                template: new.active_template,
            });
        }

        if old.design != new.design || old.applied_style != new.applied_style {
            changes.push(StateChange::DesignApplied);
        }

        if old.is_enhancing != new.is_enhancing {
            changes.push(if new.is_enhancing {
                StateChange::EnhancementStarted
            } else {
                StateChange::EnhancementFinished
            });
        }

        if old.is_loading != new.is_loading {
            changes.push(StateChange::LoadingChanged {
                loading: new.is_loading,
            });
        }

        changes
    }

    // Document operations. Each one ends in a full re-projection.

    fn project<F, R>(&self, resynced: bool, f: F) -> (R, Vec<StateChange>)
    where
        F: FnOnce(&mut EditorState) -> R,
    {
        self.metrics.record_projection();
        if resynced {
            self.metrics.record_resync();
        }
        self.update_with(f)
    }

    pub fn set_personal(&self, field: PersonalField, value: String) -> Vec<StateChange> {
        tracing::debug!("Personal field {} updated ({} chars)", field, value.len());
        self.project(false, |state| state.set_personal(field, value)).1
    }

    pub fn set_skills(&self, value: String) -> Vec<StateChange> {
        self.project(false, |state| state.set_skills(value)).1
    }

    pub fn add_row(&self, kind: CollectionKind) -> (RowKey, Vec<StateChange>) {
        let (key, changes) = self.project(false, |state| state.add_row(kind));
        tracing::info!("Added {} row", kind);
        (key, changes)
    }

    pub fn remove_row(&self, kind: CollectionKind, key: RowKey) -> (bool, Vec<StateChange>) {
        self.project(false, |state| state.remove_row(kind, key))
    }

    pub fn resync(&self, kind: CollectionKind) -> Vec<StateChange> {
        self.project(true, |state| state.resync(kind)).1
    }

    pub fn edit_experience(
        &self,
        key: RowKey,
        field: ExperienceField,
        value: String,
    ) -> (bool, Vec<StateChange>) {
        self.project(true, |state| state.edit_experience(key, field, value))
    }

    pub fn set_current_employment(&self, key: RowKey, current: bool) -> (bool, Vec<StateChange>) {
        self.project(true, |state| state.set_current_employment(key, current))
    }

    pub fn edit_education(
        &self,
        key: RowKey,
        field: EducationField,
        value: String,
    ) -> (bool, Vec<StateChange>) {
        self.project(true, |state| state.edit_education(key, field, value))
    }

    pub fn edit_project(
        &self,
        key: RowKey,
        field: ProjectField,
        value: String,
    ) -> (bool, Vec<StateChange>) {
        self.project(true, |state| state.edit_project(key, field, value))
    }

    pub fn apply_project_patches(&self, patches: &[ProjectPatch]) -> (usize, Vec<StateChange>) {
        self.project(true, |state| state.apply_project_patches(patches))
    }

    pub fn clear_all(&self) -> Vec<StateChange> {
        let (_, mut changes) = self.project(false, EditorState::clear_all);

        let reset_event = StateChange::StateReset;
        self.broadcast(reset_event.clone());
        changes.push(reset_event);

        changes
    }

    // Presentation

    pub fn switch_template(&self, template: TemplateId) -> Vec<StateChange> {
        self.update(|state| state.switch_template(template))
    }

    pub fn apply_design(&self, design: DesignConfig) -> Vec<StateChange> {
        self.update(|state| state.apply_design(design))
    }

    // Runtime flags

    pub fn set_enhancing(&self, enhancing: bool) -> Vec<StateChange> {
        self.update(|state| state.is_enhancing = enhancing)
    }

    pub fn set_loading(&self, loading: bool) -> Vec<StateChange> {
        self.update(|state| state.is_loading = loading)
    }

    /// Record a notification and emit it
    ///
    /// Emitted explicitly so that two identical messages in a row are both
    /// delivered.
    pub fn notify(&self, notification: Notification) -> Vec<StateChange> {
        if notification.is_error() {
            tracing::warn!("Notification: {}", notification.message);
        } else {
            tracing::info!("Notification: {}", notification.message);
        }
        self.metrics.record_notification();

        let mut changes = self.update(|state| state.last_notification = Some(notification.clone()));

        let event = StateChange::Notified(notification);
        self.broadcast(event.clone());
        changes.push(event);

        changes
    }

    /// Shared handle to the state for tasks that outlive a borrow of the manager
    pub fn state_arc(&self) -> Arc<RwLock<EditorState>> {
        Arc::clone(&self.state)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
