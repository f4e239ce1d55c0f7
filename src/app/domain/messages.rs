use std::path::PathBuf;

/// Commands understood by the application loop.
/// Each console command parses into one of these; `AppState::dispatch` handles them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Project
    ProjectNew,
    ProjectNewFromFolder,
    ProjectOpen,
    /// Index into the recent projects list, most recent first.
    ProjectOpenRecent(usize),
    ProjectClose,
    ProjectProperties,
    ProjectBuildProperties,
    ProjectSave,

    // File
    FileOpen(PathBuf),
    ListDocuments,
    FileQuit,
}

impl Message {
    /// Parse a console command line. Returns `None` for unknown commands.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let message = match command {
            "new" => Self::ProjectNew,
            "new-folder" => Self::ProjectNewFromFolder,
            "open" => Self::ProjectOpen,
            "recent" => Self::ProjectOpenRecent(arg.parse().ok()?),
            "close" => Self::ProjectClose,
            "properties" => Self::ProjectProperties,
            "build" => Self::ProjectBuildProperties,
            "save" => Self::ProjectSave,
            "edit" if !arg.is_empty() => Self::FileOpen(PathBuf::from(arg)),
            "list" | "ls" => Self::ListDocuments,
            "quit" | "exit" => Self::FileQuit,
            _ => return None,
        };
        Some(message)
    }
}
