//! Modal interactions needed by the project lifecycle.

use std::path::{Path, PathBuf};

use crate::app::controllers::form::{FormField, ProjectForm};
use crate::ui::file_dialogs::FileFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    MoveDocumentsIntoProject,
    CloseActiveProject { name: String },
    CreateBasePath { path: String },
    OverwriteProjectFile { path: String },
}

impl Question {
    pub fn text(&self) -> String {
        match self {
            Self::MoveDocumentsIntoProject => {
                "Move the current documents into the new project's session?".to_string()
            }
            Self::CloseActiveProject { name } => format!(
                "The '{}' project is open. Do you want to close it before proceeding?",
                name
            ),
            Self::CreateBasePath { path } => format!(
                "The path \"{}\" does not exist. Create the project's base path directory?",
                path
            ),
            Self::OverwriteProjectFile { path } => format!(
                "The file '{}' already exists. Do you want to overwrite it?",
                path
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Ok,
    Cancel,
}

/// State shown outside the dialogs: window title, recent projects menu,
/// project build menu and the open files list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiSnapshot {
    pub title: String,
    pub project_name: Option<String>,
    pub recent_projects: Vec<String>,
    pub build_commands: Vec<String>,
    pub open_files: Vec<String>,
}

pub trait ProjectUi {
    /// Ask a yes/no question.
    fn confirm(&mut self, question: &Question) -> bool;

    fn show_error(&mut self, message: &str);

    fn set_status(&mut self, message: &str);

    fn choose_folder(&mut self, start: &Path) -> Option<PathBuf>;

    fn choose_project_file(&mut self, start_dir: &Path, filter: &FileFilter) -> Option<PathBuf>;

    /// Let the user edit `form`; runs again after a failed validation.
    fn run_form(&mut self, form: &mut ProjectForm) -> DialogResponse;

    fn focus_field(&mut self, field: FormField);

    fn refresh(&mut self, snapshot: &UiSnapshot);
}
