pub mod blob;
pub mod design_store;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use design_store::{DESIGN_KEY, DesignExport, DesignStore};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

pub const SETTINGS_FILE_NAME: &str = "Resume Builder.yaml";
pub const ENV_PREFIX: &str = "RESUME_BUILDER";

/// Host-level settings of the editor.
///
/// Read from `Resume Builder.yaml` and overridden by environment variables
/// such as `RESUME_BUILDER__BACKEND_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub backend_url: String,
    /// Delay between the DOCX and PDF downloads
    pub download_delay_ms: u64,
    /// `None` leaves the transport's default timeout in place
    pub request_timeout_secs: Option<u64>,
    /// Directory of the design blob store, relative to the config directory
    pub design_dir: String,
    pub log_dir: String,
    pub debug_mode: bool,
    pub console_logging: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5002".to_string(),
            download_delay_ms: 1000,
            request_timeout_secs: None,
            design_dir: "Resume Builder Data".to_string(),
            log_dir: "logs".to_string(),
            debug_mode: false,
            console_logging: true,
        }
    }
}

/// Configuration manager for the settings file and the stores under it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at `config_dir`, creating the
    /// directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE_NAME),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }

    /// Load settings: defaults, then the YAML file if present, then the
    /// process environment.
    pub fn load_settings(&self) -> Result<AppSettings> {
        self.load_settings_with(environment())
    }

    fn load_settings_with(&self, env: ::config::Environment) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::new(self.settings_path.as_str(), ::config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?
            .try_deserialize::<AppSettings>()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings (backend: {})", settings.backend_url);
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Design store backed by files in the configured design directory.
    pub fn design_store(&self, settings: &AppSettings) -> Result<DesignStore<FileBlobStore>> {
        let store = FileBlobStore::new(self.config_dir.join(&settings.design_dir))?;
        Ok(DesignStore::new(store))
    }

    pub fn log_dir(&self, settings: &AppSettings) -> Utf8PathBuf {
        self.config_dir.join(&settings.log_dir)
    }
}

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
