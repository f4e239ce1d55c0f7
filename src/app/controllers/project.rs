//! Project lifecycle: create, open, save, edit and close the single active
//! project, keeping the default session, the open documents, the build menu
//! and the editor preferences in step.

use std::mem;
use std::path::{Path, PathBuf};

use super::form::{FormKind, ProjectForm};
use crate::app::domain::document::DocumentHost;
use crate::app::domain::events::{EventBus, ProjectEvent, ProjectListener};
use crate::app::domain::prefs::EffectivePrefs;
use crate::app::domain::project::{LongLineBehaviour, Project, UNTITLED};
use crate::app::domain::settings::AppSettings;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::keyfile::KeyFile;
use crate::app::infrastructure::platform;
use crate::app::services::build::{BuildGroup, BuildMenu};
use crate::app::services::overlay;
use crate::app::services::recent::RecentProjects;
use crate::app::services::session::{self, SessionStore, have_session_docs};
use crate::app::services::text_ops::split_file_patterns;
use crate::ui::dialogs::{DialogResponse, ProjectUi, Question, UiSnapshot};
use crate::ui::file_dialogs::FileFilter;

const PROJECT_SECTION: &str = "project";
const LONG_LINE_SECTION: &str = "long line marker";

pub struct ProjectManager {
    project: Option<Project>,
    settings: AppSettings,
    session: SessionStore,
    build: BuildMenu,
    events: EventBus,
    recent: RecentProjects,
    /// Sessions were not disabled on the command line.
    session_enabled: bool,
    /// Non-zero while startup (or another caller) is realizing session files;
    /// loading a project then neither snapshots the default session nor
    /// closes the open documents.
    opening_session_files: u32,
    quitting: bool,
}

impl ProjectManager {
    pub fn new(settings: AppSettings, session: SessionStore, session_enabled: bool) -> Self {
        let recent = RecentProjects::new(
            settings.recent_projects.clone(),
            settings.recent_projects_max,
        );
        let mut manager = Self {
            project: None,
            settings,
            session,
            build: BuildMenu::new(),
            events: EventBus::new(),
            recent,
            session_enabled,
            opening_session_files: 0,
            quitting: false,
        };
        manager.load_prefs();
        manager
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.project.is_some()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AppSettings {
        &mut self.settings
    }

    pub fn recent(&self) -> &RecentProjects {
        &self.recent
    }

    pub fn build_menu(&self) -> &BuildMenu {
        &self.build
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscribe(&mut self, listener: Box<dyn ProjectListener>) {
        self.events.subscribe(listener);
    }

    pub fn begin_session_opening(&mut self) {
        self.opening_session_files += 1;
    }

    pub fn end_session_opening(&mut self) {
        self.opening_session_files = self.opening_session_files.saturating_sub(1);
    }

    pub fn set_quitting(&mut self, quitting: bool) {
        self.quitting = quitting;
    }

    /// Directory new project files go to: the configured project directory,
    /// else the current document's directory, else home.
    fn project_dir(&self, host: &dyn DocumentHost) -> String {
        if !self.settings.project_file_path.is_empty() {
            return self.settings.project_file_path.clone();
        }
        host.current()
            .and_then(|doc| doc.directory())
            .map(Path::to_path_buf)
            .unwrap_or_else(platform::home_dir)
            .to_string_lossy()
            .to_string()
    }

    /// Where the folder chooser starts: the current document's directory
    /// first, then the configured project directory.
    fn folder_start(&self, host: &dyn DocumentHost) -> PathBuf {
        if let Some(dir) = host.current().and_then(|doc| doc.directory()) {
            return dir.to_path_buf();
        }
        if !self.settings.project_file_path.is_empty() {
            return PathBuf::from(&self.settings.project_file_path);
        }
        platform::home_dir()
    }

    /// Preferences documents get: the project's overlay, or the globals.
    pub fn effective_prefs(&self) -> EffectivePrefs {
        overlay::effective(self.project.as_ref(), &self.settings.global_prefs())
    }

    fn apply_editor_prefs(&self, host: &mut dyn DocumentHost) {
        overlay::apply(host, self.project.as_ref(), &self.settings.global_prefs());
    }

    /// Start the New Project flow. Returns `true` when a project was created.
    pub fn new_project(
        &mut self,
        from_folder: bool,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        let project_dir = self.project_dir(host);
        let file_in_basedir = self.settings.project_file_in_basedir;

        let mut form = if from_folder {
            let Some(folder) = ui.choose_folder(&self.folder_start(host)) else {
                return false;
            };
            ProjectForm::from_folder(&project_dir, file_in_basedir, &folder.to_string_lossy())
        } else {
            ProjectForm::new_project(&project_dir, file_in_basedir)
        };

        let created = self.run_new_dialog(&mut form, host, ui);
        host.new_file_if_none_open();
        host.focus_current();
        created
    }

    fn run_new_dialog(
        &mut self,
        form: &mut ProjectForm,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        if ui.run_form(form) != DialogResponse::Ok || !self.handle_current_session(host, ui) {
            return false;
        }
        loop {
            if self.validate_and_commit(form, true, host, ui) {
                match self.write_config(host) {
                    Ok(()) => {
                        if let Some(project) = &self.project {
                            ui.set_status(&format!("Project \"{}\" created.", project.name));
                            tracing::info!("created project {}", project.file_name().display());
                            let file = project.file_name().to_string_lossy().to_string();
                            self.recent.add(&file);
                        }
                        self.update_ui(host, ui);
                        return true;
                    }
                    Err(e) => {
                        tracing::warn!("could not write new project file: {}", e);
                        ui.show_error("Project file could not be written");
                        self.destroy(false, host, ui);
                    }
                }
            }
            if ui.run_form(form) != DialogResponse::Ok {
                break;
            }
        }

        // Cancelled. Documents still open were meant to move into the project,
        // so the default session cleared for them is written again; otherwise
        // the documents closed for the project come back.
        if have_session_docs(host) {
            if let Err(e) = self.session.save_default(host) {
                tracing::warn!("could not save default session: {}", e);
            }
        } else {
            if let Err(e) = self.session.load_default() {
                tracing::warn!("could not load default session: {}", e);
            }
            self.session.open_default(host);
        }
        false
    }

    /// Make room for a new project: close the active one, or deal with the
    /// documents of the default session. `false` aborts the caller.
    fn handle_current_session(&mut self, host: &mut dyn DocumentHost, ui: &mut dyn ProjectUi) -> bool {
        if self.project.is_some() {
            return self.close(false, host, ui);
        }
        // kept in case the dialog is cancelled
        if let Err(e) = self.session.save_default(host) {
            tracing::warn!("could not save default session: {}", e);
        }
        if have_session_docs(host) {
            if ui.confirm(&Question::MoveDocumentsIntoProject) {
                if let Err(e) = self.session.clear_default() {
                    tracing::warn!("could not clear default session: {}", e);
                }
            } else if !host.close_all() {
                tracing::debug!("new project aborted: documents were not closed");
                return false;
            }
        }
        true
    }

    /// Show the project chooser until a project loads or the user gives up.
    pub fn open_project(&mut self, host: &mut dyn DocumentHost, ui: &mut dyn ProjectUi) -> bool {
        let dir = PathBuf::from(&self.settings.project_file_path);
        let start = if dir.is_dir() { dir } else { platform::home_dir() };
        let filter = FileFilter::project_files();

        while let Some(path) = ui.choose_project_file(&start, &filter) {
            if self.project.is_some() && !self.close(false, host, ui) {
                return false;
            }
            if self.load_file_with_session(&path, host, ui) {
                return true;
            }
            ui.show_error(&format!(
                "Project file \"{}\" could not be loaded.",
                path.display()
            ));
        }
        false
    }

    /// Open a project from the recent projects list, asking to close the
    /// active one first.
    pub fn open_recent(
        &mut self,
        index: usize,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        let Some(path) = self.recent.items().get(index).cloned() else {
            return false;
        };
        if !self.ask_close_if_active(host, ui) {
            return false;
        }
        if self.load_file_with_session(Path::new(&path), host, ui) {
            return true;
        }
        self.recent.remove(&path);
        self.update_ui(host, ui);
        false
    }

    /// Read `path` into a new active project. Fails while a project is open
    /// or when the file cannot be parsed; no project is left behind then.
    pub fn load_config(
        &mut self,
        path: &Path,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        if self.project.is_some() {
            tracing::warn!("load_config called while a project is open");
            return false;
        }
        let config = match KeyFile::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("could not load project file {}: {}", path.display(), e);
                return false;
            }
        };

        let file_name = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let global_column = self.settings.long_line_column;
        let mut project = Project::new(file_name, &self.settings.editing);
        project.prefs = overlay::load(&config, &self.settings.editing);
        project.name = config.get_string(PROJECT_SECTION, "name", UNTITLED);
        project.description = config.get_string(PROJECT_SECTION, "description", "");
        project.base_path = config.get_string(PROJECT_SECTION, "base_path", "");
        project.file_patterns = config
            .get_string_list(PROJECT_SECTION, "file_patterns")
            .unwrap_or_default();
        project.long_line = LongLineBehaviour::from_code(
            config.get_integer(LONG_LINE_SECTION, "long_line_behaviour", 1),
            config.get_integer(LONG_LINE_SECTION, "long_line_column", i64::from(global_column)),
            global_column,
        );
        project.build_filetypes = self.build.load_project(&config);
        self.project = Some(project);
        self.apply_editor_prefs(host);

        if self.opening_session_files == 0 {
            // the default session may have changed since startup
            if have_session_docs(host) {
                if let Err(e) = self.session.save_default(host) {
                    tracing::warn!("could not save default session: {}", e);
                }
            }
            if !host.close_all() {
                tracing::warn!("some documents stayed open while loading {}", path.display());
            }
        }

        if let Some(project) = self.project.as_mut() {
            project.session_files = session::load_session_files(&config);
        }
        self.events.emit(ProjectEvent::Opened(&config));
        self.update_ui(host, ui);
        true
    }

    /// `load_config` plus status line and recent projects bookkeeping.
    pub fn load_file(&mut self, path: &Path, host: &mut dyn DocumentHost, ui: &mut dyn ProjectUi) -> bool {
        if !self.load_config(path, host, ui) {
            ui.set_status(&format!(
                "Project file \"{}\" could not be loaded.",
                path.display()
            ));
            return false;
        }
        if let Some(project) = &self.project {
            ui.set_status(&format!("Project \"{}\" opened.", project.name));
            tracing::info!("opened project {}", project.file_name().display());
            let file = project.file_name().to_string_lossy().to_string();
            self.recent.add(&file);
        }
        self.update_ui(host, ui);
        true
    }

    /// `load_file` followed by opening the project's session files.
    pub fn load_file_with_session(
        &mut self,
        path: &Path,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        if !self.load_file(path, host, ui) {
            return false;
        }
        self.open_session_files(host);
        host.new_file_if_none_open();
        host.focus_current();
        true
    }

    /// Open the files the active project still holds; they are consumed.
    pub fn open_session_files(&mut self, host: &mut dyn DocumentHost) -> usize {
        let files = match self.project.as_mut() {
            Some(project) => project.take_session_files(),
            None => return 0,
        };
        session::open_files(host, files)
    }

    pub fn load_default_session(&mut self) {
        if let Err(e) = self.session.load_default() {
            tracing::warn!("could not load default session: {}", e);
        }
    }

    pub fn open_default_session(&mut self, host: &mut dyn DocumentHost) -> usize {
        self.session.open_default(host)
    }

    pub fn save_default_session(&self, host: &dyn DocumentHost) {
        if let Err(e) = self.session.save_default(host) {
            tracing::warn!("could not save default session: {}", e);
        }
    }

    /// Write the active project, keeping sections this code does not own.
    pub fn write_config(&mut self, host: &dyn DocumentHost) -> Result<()> {
        let project = self.project.as_ref().ok_or(AppError::NoActiveProject)?;
        let path = project.file_name();

        let mut config = if path.exists() {
            KeyFile::load(path).unwrap_or_else(|e| {
                tracing::warn!("replacing unreadable project file {}: {}", path.display(), e);
                KeyFile::new()
            })
        } else {
            KeyFile::new()
        };

        overlay::save(&mut config, &project.prefs);
        config.set_string(PROJECT_SECTION, "name", &project.name);
        config.set_string(PROJECT_SECTION, "base_path", &project.base_path);
        config.set_string(PROJECT_SECTION, "description", &project.description);
        config.set_string_list(PROJECT_SECTION, "file_patterns", &project.file_patterns);

        config.set_integer(LONG_LINE_SECTION, "long_line_behaviour", project.long_line.code());
        config.set_integer(
            LONG_LINE_SECTION,
            "long_line_column",
            i64::from(project.long_line.column_or(self.settings.long_line_column)),
        );

        session::save_session_files(&mut config, host);
        self.build.save_project(&mut config, &project.build_filetypes);
        self.events.emit(ProjectEvent::Saving(&mut config));

        config.save(path)?;
        tracing::debug!("wrote project file {}", path.display());
        Ok(())
    }

    /// Rewrite the project file on request, so listeners can store their data.
    pub fn save(&mut self, host: &dyn DocumentHost, ui: &mut dyn ProjectUi) -> bool {
        match self.write_config(host) {
            Ok(()) => {
                if let Some(project) = &self.project {
                    ui.set_status(&format!("Project \"{}\" saved.", project.name));
                }
                true
            }
            Err(AppError::NoActiveProject) => {
                ui.show_error(&AppError::NoActiveProject.to_string());
                false
            }
            Err(e) => {
                tracing::warn!("could not write project file: {}", e);
                ui.show_error("Project file could not be written");
                false
            }
        }
    }

    /// Close the active project. The project file is written first, even when
    /// closing the documents is then refused and the project stays open.
    pub fn close(
        &mut self,
        reopen_default: bool,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        let Some(project) = &self.project else {
            tracing::warn!("close called without an open project");
            return false;
        };
        let name = project.name.clone();

        if let Err(e) = self.write_config(host) {
            if let Some(project) = &self.project {
                tracing::warn!(
                    "Project file \"{}\" could not be written: {}",
                    project.file_name().display(),
                    e
                );
            }
        }

        if !host.close_all() {
            tracing::warn!("closing project \"{}\" refused", name);
            return false;
        }

        ui.set_status(&format!("Project \"{}\" closed.", name));
        tracing::info!("closed project {}", name);
        self.destroy(reopen_default, host, ui);
        true
    }

    /// Drop the active project and undo everything it applied.
    fn destroy(&mut self, reopen_default: bool, host: &mut dyn DocumentHost, ui: &mut dyn ProjectUi) {
        if self.project.is_none() {
            return;
        }
        self.events.emit(ProjectEvent::BeforeClose);

        if let Some(project) = self.project.take() {
            for filetype in &project.build_filetypes {
                self.build.remove_filetype(filetype);
            }
        }
        self.build.remove_menu_items(BuildGroup::NonFiletype);
        self.build.remove_menu_items(BuildGroup::Exec);

        self.apply_editor_prefs(host);

        if reopen_default && self.session_enabled {
            self.load_default_session();
            self.session.open_default(host);
            host.new_file_if_none_open();
            host.focus_current();
        }
        self.events.emit(ProjectEvent::Closed);
        self.update_ui(host, ui);
    }

    /// Close the active project before an action that needs a clean slate,
    /// confirming first unless the preference says not to ask.
    pub fn ask_close_if_active(&mut self, host: &mut dyn DocumentHost, ui: &mut dyn ProjectUi) -> bool {
        let Some(project) = &self.project else {
            return true;
        };
        let question = Question::CloseActiveProject {
            name: project.name.clone(),
        };
        if !self.settings.warn_on_project_close || ui.confirm(&question) {
            self.close(false, host, ui)
        } else {
            false
        }
    }

    /// Edit the active project until the changes are saved or the dialog is
    /// cancelled. Returns whether the project was saved.
    pub fn properties_dialog(
        &mut self,
        show_build: bool,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        let Some(project) = &self.project else {
            ui.show_error(&AppError::NoActiveProject.to_string());
            return false;
        };
        let filetype = host.current().and_then(|doc| doc.filetype.clone());
        let mut form = ProjectForm::properties(project, self.build.table_for(filetype.as_deref()), show_build);
        self.events.emit(ProjectEvent::DialogOpen(&form));

        let mut saved = false;
        while ui.run_form(&mut form) == DialogResponse::Ok {
            if !self.validate_and_commit(&form, false, host, ui) {
                continue;
            }
            self.events.emit(ProjectEvent::DialogConfirmed(&form));
            match self.write_config(host) {
                Ok(()) => {
                    if let Some(project) = &self.project {
                        ui.set_status(&format!("Project \"{}\" saved.", project.name));
                    }
                    saved = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("could not write project file: {}", e);
                    ui.show_error("Project file could not be written");
                }
            }
        }

        self.events.emit(ProjectEvent::DialogClose(&form));
        saved
    }

    /// Validate `form` and copy it into the active project, creating the
    /// project when none exists yet. Failures are reported through `ui`.
    pub fn validate_and_commit(
        &mut self,
        form: &ProjectForm,
        is_new: bool,
        host: &mut dyn DocumentHost,
        ui: &mut dyn ProjectUi,
    ) -> bool {
        let fields = match form.validate(is_new, ui) {
            Ok(fields) => fields,
            Err(err) => {
                if !err.is_silent() {
                    ui.show_error(&err.to_string());
                }
                ui.focus_field(err.field());
                return false;
            }
        };

        let mut is_new = is_new;
        if self.project.is_none() {
            self.project = Some(Project::new(fields.file_name.clone(), &self.settings.editing));
            is_new = true;
        }
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        project.name = fields.name;
        project.base_path = fields.base_path;

        if !is_new && form.kind() == FormKind::Properties {
            project.description = form.description.clone();
            project.prefs = form.prefs.clone();
            project.long_line = form.long_line;
            project.file_patterns = split_file_patterns(&form.file_patterns);

            if self.build.read_table(&form.build)
                && let Some(filetype) = &form.build.filetype
                && !project.build_filetypes.contains(filetype)
            {
                project.build_filetypes.push(filetype.clone());
            }
            self.apply_editor_prefs(host);
        }

        self.update_ui(host, ui);
        true
    }

    /// Push window title, menus and file list to the UI.
    pub fn update_ui(&self, host: &dyn DocumentHost, ui: &mut dyn ProjectUi) {
        if self.quitting {
            return;
        }
        ui.refresh(&self.snapshot(host));
    }

    pub fn snapshot(&self, host: &dyn DocumentHost) -> UiSnapshot {
        let project_name = self.project.as_ref().map(|p| p.name.clone());
        let current = host.current();

        let mut title_parts: Vec<String> = Vec::new();
        if let Some(doc) = current {
            title_parts.push(doc.display_name.clone());
        }
        if let Some(name) = &project_name {
            title_parts.push(name.clone());
        }
        title_parts.push("ProjectPad".to_string());

        let filetype_cmds = current
            .and_then(|doc| doc.filetype.as_deref())
            .and_then(|ft| self.build.filetype_commands(ft))
            .unwrap_or_default();
        let build_commands = filetype_cmds
            .iter()
            .chain(self.build.commands(BuildGroup::NonFiletype))
            .chain(self.build.commands(BuildGroup::Exec))
            .filter(|cmd| !cmd.is_blank())
            .map(|cmd| cmd.label.clone())
            .collect();

        UiSnapshot {
            title: title_parts.join(" - "),
            project_name,
            recent_projects: self.recent.items().to_vec(),
            build_commands,
            open_files: host
                .documents()
                .iter()
                .map(|doc| doc.display_name.clone())
                .collect(),
        }
    }

    /// Copy project related preferences into the settings to be persisted.
    pub fn save_prefs(&mut self) {
        if self.session_enabled {
            self.settings.session_file = self
                .project
                .as_ref()
                .map(|p| p.file_name().to_string_lossy().to_string())
                .unwrap_or_default();
        }
        self.settings.recent_projects = self.recent.items().to_vec();
    }

    fn load_prefs(&mut self) {
        if !self.session_enabled {
            self.settings.session_file.clear();
        }
        if self.settings.project_file_path.is_empty() {
            self.settings.project_file_path = platform::default_project_dir()
                .to_string_lossy()
                .to_string();
        }
    }

    /// Project file recorded by the last session, handed out once.
    pub fn take_session_file(&mut self) -> Option<PathBuf> {
        let file = mem::take(&mut self.settings.session_file);
        (!file.is_empty()).then(|| PathBuf::from(file))
    }
}
