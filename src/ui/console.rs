//! Line-oriented front end: questions, choosers and the project form are
//! answered on standard input.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::app::controllers::form::{FormField, FormKind, ProjectForm};
use crate::app::domain::prefs::EditingPrefs;
use crate::app::domain::project::LongLineBehaviour;
use crate::app::services::build::BuildCommand;
use crate::app::services::overlay::{STASH_FIELDS, StashValue};
use crate::ui::dialogs::{DialogResponse, ProjectUi, Question, UiSnapshot};
use crate::ui::file_dialogs::FileFilter;

pub struct ConsoleUi<R, W> {
    input: R,
    output: W,
    last_title: String,
}

impl ConsoleUi<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleUi<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            last_title: String::new(),
        }
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text) {
            tracing::debug!("console write failed: {}", e);
        }
    }

    /// Read one line, `None` on end of input.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        if write!(self.output, "{}", prompt).and_then(|_| self.output.flush()).is_err() {
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    /// Prompt with the current value; an empty answer keeps it.
    fn edit(&mut self, label: &str, current: &str) -> Option<String> {
        let answer = self.read_line(&format!("{} [{}]: ", label, current))?;
        Some(if answer.is_empty() { current.to_string() } else { answer })
    }

    fn edit_long_line(&mut self, current: LongLineBehaviour) -> Option<LongLineBehaviour> {
        let shown = match current {
            LongLineBehaviour::Disabled => "off".to_string(),
            LongLineBehaviour::UseGlobalDefault => "global".to_string(),
            LongLineBehaviour::Custom(col) => col.to_string(),
        };
        let answer = self.edit("Long line marker (off, global or a column)", &shown)?;
        Some(match answer.as_str() {
            "off" => LongLineBehaviour::Disabled,
            "global" => LongLineBehaviour::UseGlobalDefault,
            other => match other.parse::<u32>() {
                Ok(col) if col > 0 => LongLineBehaviour::Custom(col),
                _ => current,
            },
        })
    }

    fn edit_command(&mut self, label: &str, commands: &mut Vec<BuildCommand>) -> Option<()> {
        let current = commands.first().map(|c| c.command.clone()).unwrap_or_default();
        let answer = self.edit(label, &current)?;
        if answer == current {
            return Some(());
        }
        if answer == "-" {
            commands.clear();
        } else {
            let name = commands
                .first()
                .map(|c| c.label.clone())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| label.to_string());
            let dir = commands.first().map(|c| c.working_dir.clone()).unwrap_or_default();
            let command = BuildCommand {
                label: name,
                command: answer,
                working_dir: dir,
            };
            match commands.first_mut() {
                Some(first) => *first = command,
                None => commands.push(command),
            }
        }
        Some(())
    }

    /// One prompt per overridable preference; unparsable answers keep the value.
    fn edit_prefs(&mut self, prefs: &mut EditingPrefs) -> Option<()> {
        for field in STASH_FIELDS {
            let value = match field.get(prefs) {
                StashValue::Bool(current) => {
                    let answer = self.edit(field.key, if current { "y" } else { "n" })?;
                    match answer.trim() {
                        "y" | "Y" | "yes" => StashValue::Bool(true),
                        "n" | "N" | "no" => StashValue::Bool(false),
                        _ => continue,
                    }
                }
                StashValue::Int(current) => {
                    match self.edit(field.key, &current.to_string())?.trim().parse() {
                        Ok(value) => StashValue::Int(value),
                        Err(_) => continue,
                    }
                }
            };
            field.set(prefs, value);
        }
        Some(())
    }

    fn fill_form(&mut self, form: &mut ProjectForm) -> Option<()> {
        let name = self.edit("Name", form.name())?;
        form.set_name(&name);
        if form.kind() == FormKind::New {
            let file_name = self.edit("Filename", form.file_name())?;
            if file_name != form.file_name() {
                form.set_file_name(&file_name);
            }
        } else {
            self.say(&format!("Filename: {}", form.file_name()));
        }
        let base_path = self.edit("Base path", form.base_path())?;
        if base_path != form.base_path() {
            form.set_base_path(&base_path);
        }
        if form.kind() == FormKind::New {
            return Some(());
        }

        form.description = self.edit("Description", &form.description)?;
        form.file_patterns = self.edit("File patterns", &form.file_patterns)?;
        form.long_line = self.edit_long_line(form.long_line)?;

        self.edit_prefs(&mut form.prefs)?;

        if form.show_build {
            if let Some(filetype) = form.build.filetype.clone() {
                let mut commands = std::mem::take(&mut form.build.filetype_commands);
                self.edit_command(&format!("Compile command for {}", filetype), &mut commands)?;
                form.build.filetype_commands = commands;
            }
            let mut commands = std::mem::take(&mut form.build.non_filetype);
            self.edit_command("Make command", &mut commands)?;
            form.build.non_filetype = commands;
            let mut commands = std::mem::take(&mut form.build.exec);
            self.edit_command("Execute command", &mut commands)?;
            form.build.exec = commands;
        }
        Some(())
    }
}

impl<R: BufRead, W: Write> ProjectUi for ConsoleUi<R, W> {
    fn confirm(&mut self, question: &Question) -> bool {
        let prompt = format!("{} [y/N] ", question.text());
        self.read_line(&prompt)
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
    }

    fn show_error(&mut self, message: &str) {
        self.say(&format!("Error: {}", message));
    }

    fn set_status(&mut self, message: &str) {
        self.say(message);
    }

    fn choose_folder(&mut self, start: &Path) -> Option<PathBuf> {
        let answer = self.edit("Folder", &start.to_string_lossy())?;
        let path = PathBuf::from(answer);
        path.is_dir().then_some(path)
    }

    fn choose_project_file(&mut self, start_dir: &Path, filter: &FileFilter) -> Option<PathBuf> {
        let prompt = format!("Project file, {} in {}: ", filter.label(), start_dir.display());
        let answer = self.read_line(&prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }
        let path = PathBuf::from(answer);
        Some(if path.is_relative() { start_dir.join(path) } else { path })
    }

    fn run_form(&mut self, form: &mut ProjectForm) -> DialogResponse {
        let title = match form.kind() {
            FormKind::New => "New Project",
            FormKind::Properties => "Project Properties",
        };
        self.say(&format!("== {} ==", title));
        if self.fill_form(form).is_none() {
            return DialogResponse::Cancel;
        }
        let action = if form.kind() == FormKind::New { "Create" } else { "Save" };
        match self.read_line(&format!("{}? [Y/n] ", action)) {
            Some(answer) if !answer.trim().starts_with(['n', 'N']) => DialogResponse::Ok,
            _ => DialogResponse::Cancel,
        }
    }

    fn focus_field(&mut self, field: FormField) {
        tracing::debug!("focus {:?}", field);
    }

    fn refresh(&mut self, snapshot: &UiSnapshot) {
        if snapshot.title != self.last_title {
            self.last_title = snapshot.title.clone();
            self.say(&format!("[{}]", snapshot.title));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::build::BuildTable;
    use crate::app::domain::prefs::IndentType;
    use crate::app::domain::project::Project;

    fn console(input: &str) -> ConsoleUi<&[u8], Vec<u8>> {
        ConsoleUi::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_confirm() {
        let mut ui = console("y\nno\n");
        assert!(ui.confirm(&Question::MoveDocumentsIntoProject));
        assert!(!ui.confirm(&Question::MoveDocumentsIntoProject));
        // end of input declines
        assert!(!ui.confirm(&Question::MoveDocumentsIntoProject));
    }

    #[test]
    fn test_new_project_form() {
        let mut ui = console("demo\n\n\n\n");
        let mut form = ProjectForm::new_project("/p", false);
        assert_eq!(ui.run_form(&mut form), DialogResponse::Ok);
        assert_eq!(form.name(), "demo");
        assert!(form.file_name().ends_with("demo.ppad"));
        assert!(!form.entries_modified());
    }

    #[test]
    fn test_properties_form() {
        let mut project = Project::new(PathBuf::from("/w/demo.ppad"), &EditingPrefs::default());
        project.name = "demo".into();
        project.base_path = "./".into();
        let build = BuildTable {
            filetype: Some("C".into()),
            ..Default::default()
        };
        let mut form = ProjectForm::properties(&project, build, true);

        let prefs = [
            "2", "1", "", "", "", "", // indentation
            "n", "", "y", "y", // file prefs
            "", "100", "", // editor
        ];
        let input = format!(
            "\n\nnotes\n*.c  *.h\n80\n{}\nmake app\n\n./app\ny\n",
            prefs.join("\n")
        );
        let mut ui = ConsoleUi::new(input.as_bytes(), Vec::new());
        assert_eq!(ui.run_form(&mut form), DialogResponse::Ok);
        assert_eq!(form.description, "notes");
        assert_eq!(form.file_patterns, "*.c  *.h");
        assert_eq!(form.long_line, LongLineBehaviour::Custom(80));
        assert_eq!(form.prefs.indentation.width, 2);
        assert_eq!(form.prefs.indentation.kind, IndentType::Tabs);
        assert!(!form.prefs.final_new_line);
        assert!(form.prefs.strip_trailing_spaces);
        assert!(form.prefs.replace_tabs);
        assert_eq!(form.prefs.line_break_column, 100);
        assert_eq!(form.build.filetype_commands[0].command, "make app");
        assert!(form.build.non_filetype.is_empty());
        assert_eq!(form.build.exec[0].command, "./app");
    }

    #[test]
    fn test_every_preference_is_prompted() {
        let project = Project::new(PathBuf::from("/w/demo.ppad"), &EditingPrefs::default());
        let mut form = ProjectForm::properties(&project, BuildTable::default(), false);
        let input = "\n\n\n\n\n".to_string() + &"\n".repeat(STASH_FIELDS.len()) + "y\n";
        let mut ui = ConsoleUi::new(input.as_bytes(), Vec::new());
        assert_eq!(ui.run_form(&mut form), DialogResponse::Ok);
        assert_eq!(form.prefs, EditingPrefs::default());

        let out = String::from_utf8(ui.output).unwrap();
        for field in STASH_FIELDS {
            assert!(out.contains(&format!("{} [", field.key)), "no prompt for {}", field.key);
        }
    }

    #[test]
    fn test_form_cancel_on_eof() {
        let mut ui = console("demo\n");
        let mut form = ProjectForm::new_project("/p", false);
        assert_eq!(ui.run_form(&mut form), DialogResponse::Cancel);
    }

    #[test]
    fn test_choose_project_file_relative() {
        let mut ui = console("demo.ppad\n\n");
        let filter = FileFilter::project_files();
        assert_eq!(
            ui.choose_project_file(Path::new("/p"), &filter),
            Some(PathBuf::from("/p/demo.ppad"))
        );
        assert_eq!(ui.choose_project_file(Path::new("/p"), &filter), None);
    }

    #[test]
    fn test_status_and_title() {
        let mut ui = console("");
        ui.set_status("Project \"demo\" opened.");
        let snapshot = UiSnapshot {
            title: "demo - ProjectPad".into(),
            ..Default::default()
        };
        ui.refresh(&snapshot);
        ui.refresh(&snapshot);
        let out = String::from_utf8(ui.output.clone()).unwrap();
        assert_eq!(out, "Project \"demo\" opened.\n[demo - ProjectPad]\n");
    }
}
