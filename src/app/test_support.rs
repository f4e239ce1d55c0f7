//! Scripted stand-in for the interactive UI, used by the unit tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::app::controllers::form::{FormField, ProjectForm};
use crate::ui::dialogs::{DialogResponse, ProjectUi, Question, UiSnapshot};
use crate::ui::file_dialogs::FileFilter;

type FormStep = Box<dyn FnMut(&mut ProjectForm) -> DialogResponse>;

/// Answers come from queues; an exhausted queue declines (no, cancel, none).
#[derive(Default)]
pub struct ScriptedUi {
    pub answers: VecDeque<bool>,
    pub folders: VecDeque<PathBuf>,
    pub project_files: VecDeque<PathBuf>,
    forms: VecDeque<FormStep>,

    pub questions: Vec<Question>,
    pub errors: Vec<String>,
    pub statuses: Vec<String>,
    pub focused: Vec<FormField>,
    pub snapshots: Vec<UiSnapshot>,
    pub forms_run: usize,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one run of the form dialog.
    pub fn on_form(&mut self, step: impl FnMut(&mut ProjectForm) -> DialogResponse + 'static) {
        self.forms.push_back(Box::new(step));
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(String::as_str)
    }
}

impl ProjectUi for ScriptedUi {
    fn confirm(&mut self, question: &Question) -> bool {
        self.questions.push(question.clone());
        self.answers.pop_front().unwrap_or(false)
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn set_status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn choose_folder(&mut self, _start: &Path) -> Option<PathBuf> {
        self.folders.pop_front()
    }

    fn choose_project_file(&mut self, _start_dir: &Path, _filter: &FileFilter) -> Option<PathBuf> {
        self.project_files.pop_front()
    }

    fn run_form(&mut self, form: &mut ProjectForm) -> DialogResponse {
        self.forms_run += 1;
        match self.forms.pop_front() {
            Some(mut step) => step(form),
            None => DialogResponse::Cancel,
        }
    }

    fn focus_field(&mut self, field: FormField) {
        self.focused.push(field);
    }

    fn refresh(&mut self, snapshot: &UiSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}
