//! Editable state behind the New Project and Project Properties dialogs.
//!
//! The form holds the text of every entry. For new projects the file name and
//! base path are derived from the name (or a chosen folder) until the user
//! edits either of them by hand.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::app::domain::prefs::EditingPrefs;
use crate::app::domain::project::{LongLineBehaviour, MAX_NAME_LEN, PROJECT_EXT, Project};
use crate::app::services::build::BuildTable;
use crate::app::services::text_ops::{extract_filename, join_file_patterns, join_with_separator};
use crate::ui::dialogs::{ProjectUi, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    New,
    Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    FileName,
    BasePath,
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("The specified project name is too short.")]
    NameEmpty,

    #[error("The specified project name is too long (max. {} characters).", MAX_NAME_LEN)]
    NameTooLong,

    #[error("You have specified an invalid project filename.")]
    FileNameEmpty,

    #[error("Project base directory creation declined.")]
    BasePathDeclined,

    #[error("Project base directory could not be created ({0}).")]
    BaseDirCreate(io::Error),

    #[error("Project file could not be written ({0}).")]
    NotWritable(io::Error),

    #[error("Overwriting the existing project file was declined.")]
    OverwriteDeclined,
}

impl ValidationError {
    /// Entry that must take the focus again.
    pub fn field(&self) -> FormField {
        match self {
            Self::NameEmpty | Self::NameTooLong => FormField::Name,
            Self::BasePathDeclined | Self::BaseDirCreate(_) => FormField::BasePath,
            Self::FileNameEmpty | Self::NotWritable(_) | Self::OverwriteDeclined => {
                FormField::FileName
            }
        }
    }

    /// Declined confirmations need no error message.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::BasePathDeclined | Self::OverwriteDeclined)
    }
}

/// Fields that passed validation, ready to be copied into the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub name: String,
    pub file_name: PathBuf,
    /// Never empty: a blank entry becomes `./`.
    pub base_path: String,
}

#[derive(Debug, Clone)]
pub struct ProjectForm {
    kind: FormKind,
    name: String,
    file_name: String,
    base_path: String,
    pub description: String,
    /// Space separated glob patterns.
    pub file_patterns: String,
    pub long_line: LongLineBehaviour,
    pub prefs: EditingPrefs,
    pub build: BuildTable,
    /// Open the properties dialog on its build page.
    pub show_build: bool,
    entries_modified: bool,
    auto_derive: bool,
    project_dir: String,
    file_in_basedir: bool,
}

impl ProjectForm {
    /// Empty New Project form whose entries follow the typed name.
    pub fn new_project(project_dir: &str, file_in_basedir: bool) -> Self {
        let mut form = Self::blank(FormKind::New, project_dir, file_in_basedir);
        form.auto_derive = true;
        form.derive();
        form
    }

    /// New Project form prefilled from an existing folder. The entries are not
    /// re-derived afterwards.
    pub fn from_folder(project_dir: &str, file_in_basedir: bool, folder: &str) -> Self {
        let mut form = Self::blank(FormKind::New, project_dir, file_in_basedir);
        form.derive_from_folder(folder);
        form
    }

    /// Properties form showing the current values of `project`.
    pub fn properties(project: &Project, build: BuildTable, show_build: bool) -> Self {
        Self {
            kind: FormKind::Properties,
            name: project.name.clone(),
            file_name: project.file_name().to_string_lossy().to_string(),
            base_path: project.base_path.clone(),
            description: project.description.clone(),
            file_patterns: join_file_patterns(&project.file_patterns),
            long_line: project.long_line,
            prefs: project.prefs.clone(),
            build,
            show_build,
            entries_modified: false,
            auto_derive: false,
            project_dir: String::new(),
            file_in_basedir: false,
        }
    }

    fn blank(kind: FormKind, project_dir: &str, file_in_basedir: bool) -> Self {
        Self {
            kind,
            name: String::new(),
            file_name: String::new(),
            base_path: String::new(),
            description: String::new(),
            file_patterns: String::new(),
            long_line: LongLineBehaviour::default(),
            prefs: EditingPrefs::default(),
            build: BuildTable::default(),
            show_build: false,
            entries_modified: false,
            auto_derive: false,
            project_dir: project_dir.to_string(),
            file_in_basedir,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn entries_modified(&self) -> bool {
        self.entries_modified
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        if self.auto_derive && !self.entries_modified {
            self.derive();
        }
    }

    /// The project file of an existing project cannot be changed.
    pub fn set_file_name(&mut self, file_name: &str) {
        if self.kind == FormKind::Properties {
            return;
        }
        self.file_name = file_name.to_string();
        self.entries_modified = true;
    }

    pub fn set_base_path(&mut self, base_path: &str) {
        self.base_path = base_path.to_string();
        self.entries_modified = true;
    }

    fn project_file(&self, dir: &str, name: &str) -> String {
        join_with_separator(dir, &[&format!("{}.{}", name, PROJECT_EXT)])
    }

    fn derive(&mut self) {
        let dir = self.project_dir.clone();
        if self.name.is_empty() {
            self.base_path = join_with_separator(&dir, &[""]);
            self.file_name = join_with_separator(&dir, &[""]);
            return;
        }
        let name = self.name.clone();
        self.base_path = join_with_separator(&dir, &[&name, ""]);
        self.file_name = if self.file_in_basedir {
            self.project_file(&join_with_separator(&dir, &[&name]), &name)
        } else {
            self.project_file(&dir, &name)
        };
    }

    fn derive_from_folder(&mut self, folder: &str) {
        let name = extract_filename(Path::new(folder));
        self.file_name = if self.file_in_basedir {
            self.project_file(folder, &name)
        } else {
            self.project_file(&self.project_dir, &name)
        };
        self.base_path = folder.to_string();
        self.name = name;
    }

    /// Check the entries in order, asking `ui` to create a missing base
    /// directory and to confirm overwriting an existing file (new projects only).
    pub fn validate(
        &self,
        is_new: bool,
        ui: &mut dyn ProjectUi,
    ) -> Result<ValidatedFields, ValidationError> {
        let name_len = self.name.chars().count();
        if name_len == 0 {
            return Err(ValidationError::NameEmpty);
        }
        if name_len > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong);
        }
        if self.file_name.is_empty() {
            return Err(ValidationError::FileNameEmpty);
        }

        let file_name = PathBuf::from(&self.file_name);
        if !self.base_path.is_empty() {
            let mut base = PathBuf::from(&self.base_path);
            if base.is_relative() {
                let dir = file_name.parent().unwrap_or(Path::new(""));
                base = dir.join(base);
            }
            if !base.is_dir() {
                let question = Question::CreateBasePath {
                    path: self.base_path.clone(),
                };
                if !ui.confirm(&question) {
                    return Err(ValidationError::BasePathDeclined);
                }
                fs::create_dir_all(&base).map_err(ValidationError::BaseDirCreate)?;
            }
        }

        check_writable(&file_name).map_err(ValidationError::NotWritable)?;

        if is_new && file_name.exists() {
            let question = Question::OverwriteProjectFile {
                path: self.file_name.clone(),
            };
            if !ui.confirm(&question) {
                return Err(ValidationError::OverwriteDeclined);
            }
        }

        Ok(ValidatedFields {
            name: self.name.clone(),
            file_name,
            base_path: if self.base_path.is_empty() {
                "./".to_string()
            } else {
                self.base_path.clone()
            },
        })
    }
}

/// Whether `path` could be written as a regular file.
fn check_writable(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        return Err(io::Error::from(io::ErrorKind::IsADirectory));
    }
    if path.exists() {
        return OpenOptions::new().append(true).open(path).map(|_| ());
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !fs::metadata(parent)?.is_dir() {
        return Err(io::Error::from(io::ErrorKind::NotADirectory));
    }
    // permission bits do not tell whether this user may create files here
    for attempt in 0..8 {
        let scratch = parent.join(format!(".{}-{}-{}.tmp", PROJECT_EXT, std::process::id(), attempt));
        match OpenOptions::new().write(true).create_new(true).open(&scratch) {
            Ok(file) => {
                drop(file);
                if let Err(e) = fs::remove_file(&scratch) {
                    tracing::warn!("could not remove {}: {}", scratch.display(), e);
                }
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::from(io::ErrorKind::AlreadyExists))
}
