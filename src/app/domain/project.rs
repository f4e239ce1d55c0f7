use std::path::{Path, PathBuf};

use super::prefs::{EditingPrefs, EffectivePrefs};
use crate::app::services::session::SessionFile;

/// Extension of project files, without the dot.
pub const PROJECT_EXT: &str = "ppad";

/// Longest accepted project name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Name given to a project whose file carries none.
pub const UNTITLED: &str = "untitled";

/// How the long line marker behaves while the project is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongLineBehaviour {
    Disabled,
    #[default]
    UseGlobalDefault,
    Custom(u32),
}

impl LongLineBehaviour {
    /// Code stored in project files: 0 = disabled, 1 = global, 2 = custom.
    pub fn code(self) -> i64 {
        match self {
            Self::Disabled => 0,
            Self::UseGlobalDefault => 1,
            Self::Custom(_) => 2,
        }
    }

    /// Rebuild from its stored code and column. Unknown codes follow the global
    /// setting; a non-positive custom column falls back to `global_column`.
    pub fn from_code(code: i64, column: i64, global_column: u32) -> Self {
        match code {
            0 => Self::Disabled,
            2 => match u32::try_from(column) {
                Ok(col) if col > 0 => Self::Custom(col),
                _ => Self::Custom(global_column),
            },
            _ => Self::UseGlobalDefault,
        }
    }

    /// Column written next to the behaviour code.
    pub fn column_or(self, global_column: u32) -> u32 {
        match self {
            Self::Custom(col) => col,
            _ => global_column,
        }
    }

    pub fn resolve(self, global: Option<u32>) -> Option<u32> {
        match self {
            Self::Disabled => None,
            Self::UseGlobalDefault => global,
            Self::Custom(col) => Some(col),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    file_name: PathBuf,
    /// Possibly relative to the directory of `file_name`.
    pub base_path: String,
    pub description: String,
    pub file_patterns: Vec<String>,
    pub long_line: LongLineBehaviour,
    /// Per-project overrides of the global editing preferences.
    pub prefs: EditingPrefs,
    /// Files to open when the project is activated; taken exactly once.
    pub(crate) session_files: Vec<SessionFile>,
    /// Filetypes whose build commands belong to this project.
    pub(crate) build_filetypes: Vec<String>,
}

impl Project {
    /// A fresh project bound to `file_name`, inheriting the global preferences.
    pub fn new(file_name: PathBuf, global: &EditingPrefs) -> Self {
        Self {
            name: String::new(),
            file_name,
            base_path: String::new(),
            description: String::new(),
            file_patterns: Vec::new(),
            long_line: LongLineBehaviour::UseGlobalDefault,
            prefs: global.clone(),
            session_files: Vec::new(),
            build_filetypes: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Absolute base directory used for building and running: the base path
    /// itself when absolute, otherwise resolved against the project file's directory.
    pub fn resolved_base_path(&self) -> Option<PathBuf> {
        if self.base_path.is_empty() {
            return None;
        }
        let base = Path::new(&self.base_path);
        if base.is_absolute() {
            return Some(base.to_path_buf());
        }
        let dir = self
            .file_name
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        if self.base_path == "./" {
            Some(dir)
        } else {
            Some(dir.join(base))
        }
    }

    pub fn take_session_files(&mut self) -> Vec<SessionFile> {
        std::mem::take(&mut self.session_files)
    }

    pub fn effective_prefs(&self, global: &EffectivePrefs) -> EffectivePrefs {
        EffectivePrefs {
            editing: self.prefs.clone(),
            long_line_column: self.long_line.resolve(global.long_line_column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(file: &str, base: &str) -> Project {
        let mut p = Project::new(PathBuf::from(file), &EditingPrefs::default());
        p.base_path = base.to_string();
        p
    }

    #[test]
    fn test_long_line_codes() {
        assert_eq!(LongLineBehaviour::from_code(0, 80, 72), LongLineBehaviour::Disabled);
        assert_eq!(LongLineBehaviour::from_code(1, 80, 72), LongLineBehaviour::UseGlobalDefault);
        assert_eq!(LongLineBehaviour::from_code(2, 80, 72), LongLineBehaviour::Custom(80));
        assert_eq!(LongLineBehaviour::from_code(2, 0, 72), LongLineBehaviour::Custom(72));
        assert_eq!(LongLineBehaviour::from_code(9, 80, 72), LongLineBehaviour::UseGlobalDefault);
        assert_eq!(LongLineBehaviour::Custom(100).column_or(72), 100);
        assert_eq!(LongLineBehaviour::Disabled.column_or(72), 72);
    }

    #[test]
    fn test_long_line_resolution() {
        assert_eq!(LongLineBehaviour::Disabled.resolve(Some(72)), None);
        assert_eq!(LongLineBehaviour::UseGlobalDefault.resolve(Some(72)), Some(72));
        assert_eq!(LongLineBehaviour::UseGlobalDefault.resolve(None), None);
        assert_eq!(LongLineBehaviour::Custom(90).resolve(None), Some(90));
    }

    #[test]
    fn test_resolved_base_path() {
        assert_eq!(project("/work/demo.ppad", "").resolved_base_path(), None);
        assert_eq!(
            project("/work/demo.ppad", "/src/demo").resolved_base_path(),
            Some(PathBuf::from("/src/demo"))
        );
        assert_eq!(
            project("/work/demo.ppad", "./").resolved_base_path(),
            Some(PathBuf::from("/work"))
        );
        assert_eq!(
            project("/work/demo.ppad", "code").resolved_base_path(),
            Some(PathBuf::from("/work/code"))
        );
    }

    #[test]
    fn test_session_files_taken_once() {
        let mut p = project("/work/demo.ppad", "./");
        p.session_files = vec![SessionFile::new("/work/main.rs", 12)];
        assert_eq!(p.take_session_files().len(), 1);
        assert!(p.take_session_files().is_empty());
    }
}
