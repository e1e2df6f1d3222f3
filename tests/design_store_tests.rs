//! Integration tests for the design configuration store
//!
//! These tests verify file-backed persistence of the custom design and the
//! controller flows around it: load on switching to the custom template,
//! persist on edit, reset and export.

mod common;

use camino::Utf8PathBuf;
use common::{RecordingNavigator, ScriptedBackend, last_message};
use resume_builder::config::{
    BlobStore, DESIGN_KEY, DesignStore, FileBlobStore, MemoryBlobStore,
};
use resume_builder::models::DesignConfig;
use resume_builder::preview::TemplateId;
use resume_builder::{AppSettings, Command, CommandOutcome, ConfigManager, EditorController, StateManager};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn file_store(temp_dir: &TempDir) -> DesignStore<FileBlobStore> {
    let dir = Utf8PathBuf::try_from(temp_dir.path().join("designs")).unwrap();
    DesignStore::new(FileBlobStore::new(dir).unwrap())
}

fn controller_over<S: BlobStore>(designs: DesignStore<S>) -> EditorController<S> {
    EditorController::new(
        Arc::new(StateManager::new()),
        Arc::new(ScriptedBackend::new()),
        designs,
        Arc::new(RecordingNavigator::default()),
        &AppSettings::default(),
    )
}

#[test]
fn test_saved_design_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let controller = controller_over(file_store(&temp_dir));
        controller.dispatch(Command::UpdateDesign {
            name: "skillsDisplay".to_string(),
            value: json!("grid"),
        });
        controller.dispatch(Command::SaveDesign);
        assert_eq!(
            last_message(&controller).as_deref(),
            Some("Design saved successfully!")
        );
    }

    let controller = controller_over(file_store(&temp_dir));
    controller.dispatch(Command::SwitchTemplate(TemplateId::Custom));

    let style = controller.state().read(|s| s.applied_style.clone()).unwrap();
    assert_eq!(style.skills_container_class, "skills-container grid");
}

#[test]
fn test_partial_blob_merges_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let store = file_store(&temp_dir);
    store
        .store()
        .put(DESIGN_KEY, r#"{"headerStyle": "bordered", "legacyOption": true}"#)
        .unwrap();

    let loaded = store.load(&DesignConfig::default()).unwrap();
    assert_eq!(loaded.params()["headerStyle"], json!("bordered"));
    assert_eq!(loaded.font_size, 14);
}

#[test]
fn test_corrupt_blob_keeps_current_design() {
    let temp_dir = TempDir::new().unwrap();
    let store = file_store(&temp_dir);
    store.store().put(DESIGN_KEY, "not json at all").unwrap();

    let controller = controller_over(store);
    controller.dispatch(Command::SwitchTemplate(TemplateId::Custom));

    assert_eq!(
        controller.state().read(|s| s.design.clone()),
        DesignConfig::default()
    );
    assert!(controller.state().read(|s| s.applied_style.is_some()));
}

#[test]
fn test_reset_removes_blob_and_restores_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let controller = controller_over(file_store(&temp_dir));
    controller.dispatch(Command::UpdateDesign {
        name: "sectionSpacing".to_string(),
        value: json!(3.5),
    });
    assert!(controller.designs().store().get(DESIGN_KEY).unwrap().is_some());

    controller.dispatch(Command::ResetDesign);

    assert!(controller.designs().store().get(DESIGN_KEY).unwrap().is_none());
    assert_eq!(
        controller.state().read(|s| s.design.clone()),
        DesignConfig::default()
    );
    assert_eq!(
        last_message(&controller).as_deref(),
        Some("Design reset to defaults")
    );
}

#[test]
fn test_export_packages_current_design() {
    let controller = controller_over(DesignStore::new(MemoryBlobStore::new()));
    controller.dispatch(Command::UpdateDesign {
        name: "primaryColor".to_string(),
        value: json!("#123456"),
    });

    let CommandOutcome::Exported(export) = controller.dispatch(Command::ExportDesign) else {
        panic!("expected an export");
    };

    assert_eq!(
        last_message(&controller).as_deref(),
        Some("Design configuration exported!")
    );
    assert_eq!(export.file_name, "resume-design-config.json");
    assert_eq!(export.mime_type, "application/json");
    let parsed: DesignConfig = serde_json::from_str(&export.contents).unwrap();
    assert_eq!(parsed.primary_color, "#123456");
}

#[test]
fn test_unknown_parameter_is_rejected() {
    let controller = controller_over(DesignStore::new(MemoryBlobStore::new()));

    let outcome = controller.dispatch(Command::UpdateDesign {
        name: "shadowDepth".to_string(),
        value: json!(4),
    });

    assert_eq!(outcome, CommandOutcome::Ignored);
    assert_eq!(
        last_message(&controller).as_deref(),
        Some("Unknown design parameter: shadowDepth")
    );
}

#[test]
fn test_config_manager_builds_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let manager = ConfigManager::new(&config_dir).unwrap();

    let store = manager.design_store(&AppSettings::default()).unwrap();
    store.save(&DesignConfig::default()).unwrap();

    assert!(
        config_dir
            .join("Resume Builder Data")
            .join("customResumeDesign.json")
            .exists()
    );
}

#[test]
fn test_design_edit_on_standard_template_styles_custom_later() {
    let controller = controller_over(DesignStore::new(MemoryBlobStore::new()));
    controller.dispatch(Command::UpdateDesign {
        name: "fontSize".to_string(),
        value: json!(18),
    });
    assert!(controller.state().read(|s| s.applied_style.is_none()));

    controller.dispatch(Command::SwitchTemplate(TemplateId::Custom));
    let style = controller.state().read(|s| s.applied_style.clone()).unwrap();
    assert_eq!(style.font_size, "18px");
}
