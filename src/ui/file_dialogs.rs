use std::path::Path;

use crate::app::domain::project::PROJECT_EXT;

/// A named file pattern offered by file choosers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub description: String,
    /// `*` or `*.ext`
    pub pattern: String,
}

impl FileFilter {
    pub fn new(description: &str, pattern: &str) -> Self {
        Self {
            description: description.to_string(),
            pattern: pattern.to_string(),
        }
    }

    pub fn all_files() -> Self {
        Self::new("All files", "*")
    }

    pub fn project_files() -> Self {
        Self::new("Project files", &format!("*.{}", PROJECT_EXT))
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.pattern == "*" {
            return true;
        }
        match self.pattern.strip_prefix("*.") {
            Some(ext) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext)),
            None => path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n == self.pattern),
        }
    }

    /// "Description (pattern)" label for prompts.
    pub fn label(&self) -> String {
        format!("{} ({})", self.description, self.pattern)
    }
}
