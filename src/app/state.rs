use std::path::{Path, PathBuf};

use super::controllers::project::ProjectManager;
use super::controllers::tabs::TabManager;
use super::domain::document::DocumentHost;
use super::domain::messages::Message;
use super::domain::project::PROJECT_EXT;
use super::domain::settings::AppSettings;
use super::infrastructure::error::AppError;
use super::services::session::SessionStore;
use crate::ui::dialogs::ProjectUi;

/// Command line switches that change how sessions are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Neither restore nor record sessions.
    pub no_session: bool,
    /// Started beside another instance; the last session is not restored.
    pub new_instance: bool,
}

pub struct AppState {
    pub manager: ProjectManager,
    pub tabs: TabManager,
    settings_path: PathBuf,
    options: LaunchOptions,
}

fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PROJECT_EXT))
}

impl AppState {
    pub fn new(
        settings: AppSettings,
        settings_path: PathBuf,
        session: SessionStore,
        options: LaunchOptions,
    ) -> Self {
        let manager = ProjectManager::new(settings, session, !options.no_session);
        let mut tabs = TabManager::new();
        tabs.apply_prefs(&manager.effective_prefs());
        Self {
            manager,
            tabs,
            settings_path,
            options,
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Bring up the initial project and documents. `args` are the command
    /// line paths; a leading project file is loaded as the project.
    pub fn startup(&mut self, args: Vec<PathBuf>, ui: &mut dyn ProjectUi) {
        let mut args = args.into_iter().peekable();
        let mut load_session = false;

        self.manager.begin_session_opening();

        if let Some(path) = args.next_if(|p| is_project_file(p)) {
            // the session is realized below, together with the other files
            self.manager.load_file(&path, &mut self.tabs, ui);
            load_session = true;
        }

        if self.manager.settings().load_session
            && !self.options.no_session
            && !self.options.new_instance
        {
            if !self.manager.is_active() {
                self.load_session_project(ui);
            }
            load_session = true;
        }

        if load_session {
            let opened = if self.manager.is_active() {
                self.manager.open_session_files(&mut self.tabs)
            } else {
                self.manager.open_default_session(&mut self.tabs)
            };
            tracing::debug!("restored {} session file(s)", opened);
        }

        for path in args {
            self.open_cl_file(&path, ui);
        }

        self.manager.end_session_opening();

        self.tabs.new_file_if_none_open();
        self.tabs.focus_current();
        self.manager.update_ui(&self.tabs, ui);
    }

    /// Reopen the project of the last run, or fall back to the default session.
    fn load_session_project(&mut self, ui: &mut dyn ProjectUi) {
        if let Some(path) = self.manager.take_session_file() {
            if path.is_file() && self.manager.load_file(&path, &mut self.tabs, ui) {
                return;
            }
            tracing::warn!("last session project {} is gone", path.display());
        }
        self.manager.load_default_session();
    }

    fn open_cl_file(&mut self, path: &Path, ui: &mut dyn ProjectUi) {
        if path.is_dir() {
            tracing::debug!("skipping directory {}", path.display());
            return;
        }
        self.open_file(path, ui);
    }

    pub fn open_file(&mut self, path: &Path, ui: &mut dyn ProjectUi) -> bool {
        if !path.is_file() {
            ui.show_error(&format!("Could not find file '{}'.", path.display()));
            return false;
        }
        let opened = self.tabs.open_file(path, 0).is_some();
        self.manager.update_ui(&self.tabs, ui);
        opened
    }

    /// Lines describing the open documents; the current one is starred.
    pub fn list_documents(&self) -> Vec<String> {
        let current = self.tabs.current().map(|d| d.id);
        self.tabs
            .documents()
            .iter()
            .map(|doc| {
                let marker = if Some(doc.id) == current { '*' } else { ' ' };
                let name = match &doc.file_path {
                    Some(path) => path.display().to_string(),
                    None => doc.display_name.clone(),
                };
                format!("{} {}", marker, name)
            })
            .collect()
    }

    /// Handle one message. Returns `false` once the application should exit.
    pub fn dispatch(&mut self, message: Message, ui: &mut dyn ProjectUi) -> bool {
        tracing::debug!("dispatch {:?}", message);
        match message {
            Message::ProjectNew => {
                self.manager.new_project(false, &mut self.tabs, ui);
            }
            Message::ProjectNewFromFolder => {
                self.manager.new_project(true, &mut self.tabs, ui);
            }
            Message::ProjectOpen => {
                self.manager.open_project(&mut self.tabs, ui);
            }
            Message::ProjectOpenRecent(index) => {
                if index >= self.manager.recent().items().len() {
                    ui.show_error(&format!("No recent project number {}.", index));
                } else {
                    self.manager.open_recent(index, &mut self.tabs, ui);
                }
            }
            Message::ProjectClose => {
                if self.manager.is_active() {
                    self.manager.close(true, &mut self.tabs, ui);
                } else {
                    ui.show_error(&AppError::NoActiveProject.to_string());
                }
            }
            Message::ProjectProperties => {
                self.manager.properties_dialog(false, &mut self.tabs, ui);
            }
            Message::ProjectBuildProperties => {
                self.manager.properties_dialog(true, &mut self.tabs, ui);
            }
            Message::ProjectSave => {
                self.manager.save(&self.tabs, ui);
            }
            Message::FileOpen(path) => {
                self.open_file(&path, ui);
            }
            Message::ListDocuments => {
                for line in self.list_documents() {
                    ui.set_status(&line);
                }
            }
            Message::FileQuit => return !self.quit(ui),
        }
        true
    }

    /// Handle quit request. Returns `true` if the app should exit.
    pub fn quit(&mut self, ui: &mut dyn ProjectUi) -> bool {
        // session_file must be captured while the project is still open
        self.manager.save_prefs();
        if let Err(e) = self.manager.settings().save_to(&self.settings_path) {
            tracing::warn!("Failed to save settings: {}", e);
        }
        if !self.manager.is_active() && !self.options.no_session {
            self.manager.save_default_session(&self.tabs);
        }

        self.manager.set_quitting(true);
        if self.manager.is_active() && !self.manager.close(false, &mut self.tabs, ui) {
            self.manager.set_quitting(false);
            return false;
        }
        if !self.tabs.close_all() {
            tracing::info!("quit cancelled: unsaved documents");
            self.manager.set_quitting(false);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controllers::tabs::UnsavedPolicy;
    use crate::app::infrastructure::keyfile::KeyFile;
    use crate::app::services::session::{self, SessionFile};
    use crate::app::test_support::ScriptedUi;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "content").unwrap();
        path
    }

    fn write_project(dir: &Path, name: &str, files: &[&Path]) -> PathBuf {
        let path = dir.join(format!("{}.ppad", name));
        let mut config = KeyFile::new();
        config.set_string("project", "name", name);
        config.set_string("project", "base_path", "./");
        let files: Vec<SessionFile> = files.iter().map(|f| SessionFile::new(*f, 0)).collect();
        session::write_session_files(&mut config, &files);
        config.save(&path).unwrap();
        path
    }

    fn state_with(dir: &TempDir, settings: AppSettings, options: LaunchOptions) -> AppState {
        let config_dir = dir.path().join("config");
        AppState::new(
            settings,
            config_dir.join("settings.json"),
            SessionStore::new(config_dir.join("session.conf")),
            options,
        )
    }

    fn state(dir: &TempDir) -> AppState {
        let mut settings = AppSettings::default();
        settings.project_file_path = dir.path().to_string_lossy().to_string();
        state_with(dir, settings, LaunchOptions::default())
    }

    fn open_names(app: &AppState) -> Vec<String> {
        app.tabs.documents().iter().map(|d| d.display_name.clone()).collect()
    }

    #[test]
    fn test_startup_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(Vec::new(), &mut ui);

        assert!(!app.manager.is_active());
        assert_eq!(open_names(&app), vec!["Untitled"]);
        assert_eq!(ui.snapshots.last().unwrap().title, "Untitled - ProjectPad");
    }

    #[test]
    fn test_startup_with_project_argument() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let b = touch(dir.path(), "b.txt");
        let project = write_project(dir.path(), "demo", &[&a]);

        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(vec![project, b.clone()], &mut ui);

        assert_eq!(app.manager.project().unwrap().name, "demo");
        assert_eq!(open_names(&app), vec!["a.rs", "b.txt"]);
        assert_eq!(ui.statuses[0], "Project \"demo\" opened.");
        assert!(app.manager.recent().contains(&dir.path().join("demo.ppad").to_string_lossy()));
    }

    #[test]
    fn test_startup_restores_last_project() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let project = write_project(dir.path(), "demo", &[&a]);

        let mut settings = AppSettings::default();
        settings.session_file = project.to_string_lossy().to_string();
        let mut app = state_with(&dir, settings, LaunchOptions::default());
        let mut ui = ScriptedUi::new();
        app.startup(Vec::new(), &mut ui);

        assert_eq!(app.manager.project().unwrap().name, "demo");
        assert_eq!(open_names(&app), vec!["a.rs"]);
    }

    #[test]
    fn test_startup_restores_default_session() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let mut app = state(&dir);
        app.tabs.open_file(&a, 3);
        app.manager.save_default_session(&app.tabs);

        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(Vec::new(), &mut ui);
        assert_eq!(open_names(&app), vec!["a.rs"]);
        assert_eq!(app.tabs.documents()[0].cursor_position, 3);
    }

    #[test]
    fn test_no_session_skips_restore() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let project = write_project(dir.path(), "demo", &[&a]);

        let mut settings = AppSettings::default();
        settings.session_file = project.to_string_lossy().to_string();
        let options = LaunchOptions {
            no_session: true,
            ..Default::default()
        };
        let mut app = state_with(&dir, settings, options);
        let mut ui = ScriptedUi::new();
        app.startup(Vec::new(), &mut ui);

        assert!(!app.manager.is_active());
        assert_eq!(open_names(&app), vec!["Untitled"]);
    }

    #[test]
    fn test_startup_reports_unloadable_project_once() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.ppad");
        fs::write(&broken, "[project\nname = ").unwrap();

        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(vec![broken], &mut ui);

        assert!(!app.manager.is_active());
        assert!(ui.errors.is_empty());
        let reports = ui
            .statuses
            .iter()
            .filter(|s| s.contains("could not be loaded"))
            .count();
        assert_eq!(reports, 1);
        assert_eq!(open_names(&app), vec!["Untitled"]);
    }

    #[test]
    fn test_startup_reports_missing_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        let missing = dir.path().join("missing.rs");
        app.startup(vec![dir.path().to_path_buf(), missing], &mut ui);

        assert_eq!(ui.errors.len(), 1);
        assert!(ui.errors[0].contains("missing.rs"));
        assert_eq!(open_names(&app), vec!["Untitled"]);
    }

    #[test]
    fn test_quit_records_session_project() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let project = write_project(dir.path(), "demo", &[&a]);
        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(vec![project.clone()], &mut ui);

        assert!(app.quit(&mut ui));
        assert!(!app.manager.is_active());
        assert_eq!(app.tabs.count(), 0);

        let saved = AppSettings::load_from(app.settings_path());
        assert_eq!(PathBuf::from(&saved.session_file), std::path::absolute(&project).unwrap());
        assert_eq!(saved.recent_projects.len(), 1);
    }

    #[test]
    fn test_quit_refused_by_unsaved_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(vec![a], &mut ui);
        let id = app.tabs.active_id().unwrap();
        app.tabs.mark_dirty(id);

        assert!(!app.quit(&mut ui));
        assert_eq!(app.tabs.count(), 1);

        app.tabs.set_unsaved_policy(UnsavedPolicy::Discard);
        assert!(app.quit(&mut ui));
    }

    #[test]
    fn test_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(Vec::new(), &mut ui);

        assert!(app.dispatch(Message::FileOpen(a), &mut ui));
        assert!(app.dispatch(Message::ListDocuments, &mut ui));
        assert!(ui.statuses.iter().any(|s| s.starts_with('*') && s.ends_with("a.rs")));

        assert!(app.dispatch(Message::ProjectClose, &mut ui));
        assert_eq!(ui.errors.last().map(String::as_str), Some("No project is open"));

        assert!(app.dispatch(Message::ProjectOpenRecent(0), &mut ui));
        assert!(ui.errors.last().unwrap().contains("No recent project"));

        assert!(!app.dispatch(Message::FileQuit, &mut ui));
    }

    #[test]
    fn test_dispatch_open_recent() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.rs");
        let project = write_project(dir.path(), "demo", &[&a]);
        let mut app = state(&dir);
        let mut ui = ScriptedUi::new();
        app.startup(vec![project], &mut ui);
        assert!(app.dispatch(Message::ProjectClose, &mut ui));
        assert!(!app.manager.is_active());

        assert!(app.dispatch(Message::ProjectOpenRecent(0), &mut ui));
        assert_eq!(app.manager.project().unwrap().name, "demo");
        assert_eq!(open_names(&app), vec!["a.rs"]);
    }
}
