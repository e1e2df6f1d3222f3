use crate::config::blob::BlobStore;
use crate::models::DesignConfig;
use anyhow::{Context, Result};
use serde_json::Value;

/// Blob key of the persisted custom design.
pub const DESIGN_KEY: &str = "customResumeDesign";
pub const EXPORT_FILE_NAME: &str = "resume-design-config.json";
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// A design configuration packaged as a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignExport {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// Loads, saves, resets and exports the custom-surface design.
#[derive(Debug)]
pub struct DesignStore<S: BlobStore> {
    store: S,
}

impl<S: BlobStore> DesignStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge the persisted design over `current`.
    ///
    /// Keys absent from the blob keep their current values and unknown keys
    /// are ignored. A blob that does not parse, or carries an ill-typed
    /// value, is logged and `current` is returned unchanged.
    pub fn load(&self, current: &DesignConfig) -> Result<DesignConfig> {
        let Some(raw) = self
            .store
            .get(DESIGN_KEY)
            .context("Failed to read saved design")?
        else {
            tracing::debug!("No saved design, keeping current configuration");
            return Ok(current.clone());
        };

        let overrides = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("Saved design is not a JSON object, ignoring it");
                return Ok(current.clone());
            }
            Err(e) => {
                tracing::warn!("Saved design is malformed, ignoring it: {}", e);
                return Ok(current.clone());
            }
        };

        let mut merged = current.clone();
        if let Err(e) = merged.merge(&overrides) {
            tracing::warn!("Saved design has an invalid value, ignoring it: {}", e);
            return Ok(current.clone());
        }

        tracing::info!("Loaded saved design ({} keys)", overrides.len());
        Ok(merged)
    }

    pub fn save(&self, config: &DesignConfig) -> Result<()> {
        let json =
            serde_json::to_string_pretty(config).context("Failed to serialize design to JSON")?;
        self.store
            .put(DESIGN_KEY, &json)
            .context("Failed to persist design")?;
        Ok(())
    }

    /// Forget the saved design and return the defaults.
    pub fn reset(&self) -> Result<DesignConfig> {
        self.store
            .delete(DESIGN_KEY)
            .context("Failed to delete saved design")?;
        tracing::info!("Design reset to defaults");
        Ok(DesignConfig::default())
    }

    /// Package `config` for download. Nothing is persisted.
    pub fn export(&self, config: &DesignConfig) -> Result<DesignExport> {
        let contents =
            serde_json::to_string_pretty(config).context("Failed to serialize design to JSON")?;
        Ok(DesignExport {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE.to_string(),
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::blob::MemoryBlobStore;
    use crate::models::design::LayoutDensity;

    fn store() -> DesignStore<MemoryBlobStore> {
        DesignStore::new(MemoryBlobStore::new())
    }

    #[test]
    fn test_load_without_blob_keeps_current() {
        let store = store();
        let mut current = DesignConfig::default();
        current.font_size = 18;

        assert_eq!(store.load(&current).unwrap(), current);
    }

    #[test]
    fn test_load_merges_partial_blob() {
        let store = store();
        store
            .store()
            .put(DESIGN_KEY, r##"{"primaryColor": "#000000", "unknownKey": 1}"##)
            .unwrap();

        let loaded = store.load(&DesignConfig::default()).unwrap();
        assert_eq!(loaded.primary_color, "#000000");
        assert_eq!(loaded.secondary_color, "#764ba2");
    }

    #[test]
    fn test_malformed_blob_keeps_current() {
        let store = store();
        store.store().put(DESIGN_KEY, "{not json").unwrap();

        let current = DesignConfig::default();
        assert_eq!(store.load(&current).unwrap(), current);
    }

    #[test]
    fn test_save_then_reset() {
        let store = store();
        let mut config = DesignConfig::default();
        config.layout_density = LayoutDensity::Compact;

        store.save(&config).unwrap();
        assert_eq!(store.load(&DesignConfig::default()).unwrap(), config);

        assert_eq!(store.reset().unwrap(), DesignConfig::default());
        assert!(store.store().get(DESIGN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_export_is_pure() {
        let store = store();
        let export = store.export(&DesignConfig::default()).unwrap();

        assert_eq!(export.file_name, "resume-design-config.json");
        assert_eq!(export.mime_type, "application/json");
        assert!(export.contents.contains("\"headerStyle\": \"gradient\""));
        assert!(store.store().get(DESIGN_KEY).unwrap().is_none());
    }
}
