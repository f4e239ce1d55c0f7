use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::prefs::{EditingPrefs, EffectivePrefs};
use crate::app::infrastructure::error::AppError;
use crate::app::infrastructure::platform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Reopen the files (or project) of the last session at startup
    #[serde(default = "default_true")]
    pub load_session: bool,

    /// Ask before closing an open project to make room for another action
    #[serde(default = "default_true")]
    pub warn_on_project_close: bool,

    /// Place new project files inside their base directory
    #[serde(default)]
    pub project_file_in_basedir: bool,

    /// Directory suggested for new projects and the Open Project chooser
    #[serde(default = "default_project_file_path")]
    pub project_file_path: String,

    /// Project file that was active when the session was last saved
    #[serde(default)]
    pub session_file: String,

    #[serde(default)]
    pub recent_projects: Vec<String>,

    #[serde(default = "default_recent_projects_max")]
    pub recent_projects_max: usize,

    #[serde(default)]
    pub editing: EditingPrefs,

    #[serde(default = "default_true")]
    pub long_line_enabled: bool,

    #[serde(default = "default_long_line_column")]
    pub long_line_column: u32,
}

fn default_true() -> bool {
    true
}

fn default_project_file_path() -> String {
    platform::default_project_dir().to_string_lossy().to_string()
}

fn default_recent_projects_max() -> usize {
    10
}

fn default_long_line_column() -> u32 {
    72
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            load_session: true,
            warn_on_project_close: true,
            project_file_in_basedir: false,
            project_file_path: default_project_file_path(),
            session_file: String::new(),
            recent_projects: Vec::new(),
            recent_projects_max: default_recent_projects_max(),
            editing: EditingPrefs::default(),
            long_line_enabled: true,
            long_line_column: default_long_line_column(),
        }
    }
}

impl AppSettings {
    /// Global editor preferences, used whenever no project overrides them
    pub fn global_prefs(&self) -> EffectivePrefs {
        EffectivePrefs {
            editing: self.editing.clone(),
            long_line_column: self.long_line_enabled.then_some(self.long_line_column),
        }
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                if let Err(e) = default.save_to(config_path) {
                    tracing::debug!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), AppError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        platform::config_dir().join("settings.json")
    }
}
