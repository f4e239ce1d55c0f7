use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use crate::app::domain::document::DocumentHost;
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::keyfile::KeyFile;
use crate::app::infrastructure::platform;

/// Section holding the session file list, in project files and in the
/// default session file alike.
pub const SESSION_SECTION: &str = "files";
const CURRENT_PAGE_KEY: &str = "current_page";

/// A file that should be open, with its cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub path: PathBuf,
    pub cursor: usize,
    /// Whether this was the focused document when the session was saved.
    pub current: bool,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>, cursor: usize) -> Self {
        Self {
            path: path.into(),
            cursor,
            current: false,
        }
    }

    /// `cursor;path`
    fn encode(&self) -> String {
        format!("{};{}", self.cursor, self.path.display())
    }

    fn decode(value: &str) -> Option<Self> {
        let (cursor, path) = match value.split_once(';') {
            Some((cursor, path)) => match cursor.parse() {
                Ok(cursor) => (cursor, path),
                Err(_) => (0, value),
            },
            None => (0, value),
        };
        if path.is_empty() {
            return None;
        }
        Some(Self::new(path, cursor))
    }
}

fn file_key(index: usize) -> String {
    format!("FILE_NAME_{}", index)
}

/// Whether the open documents are worth remembering: anything beyond a single
/// untouched untitled document.
pub fn have_session_docs(host: &dyn DocumentHost) -> bool {
    let docs = host.documents();
    match docs {
        [] => false,
        [only] => only.file_path.is_some() || only.is_dirty(),
        _ => true,
    }
}

/// Capture the open documents that have a path, in tab order.
pub fn session_files_from_host(host: &dyn DocumentHost) -> Vec<SessionFile> {
    let current = host.current().map(|d| d.id);
    host.documents()
        .iter()
        .filter_map(|doc| {
            let path = doc.file_path.clone()?;
            Some(SessionFile {
                path,
                cursor: doc.cursor_position,
                current: Some(doc.id) == current,
            })
        })
        .collect()
}

/// Replace the session section of `config` with the given files.
pub fn write_session_files(config: &mut KeyFile, files: &[SessionFile]) {
    config.remove_section(SESSION_SECTION);
    for (i, file) in files.iter().enumerate() {
        config.set_string(SESSION_SECTION, &file_key(i), &file.encode());
        if file.current {
            config.set_integer(SESSION_SECTION, CURRENT_PAGE_KEY, i as i64);
        }
    }
}

/// Store the live open documents as the session of `config`.
pub fn save_session_files(config: &mut KeyFile, host: &dyn DocumentHost) {
    write_session_files(config, &session_files_from_host(host));
}

/// Read the session list of `config`, stopping at the first missing index.
pub fn load_session_files(config: &KeyFile) -> Vec<SessionFile> {
    let current = config.get_integer(SESSION_SECTION, CURRENT_PAGE_KEY, -1);
    let mut files = Vec::new();
    let mut index = 0;
    while config.has_key(SESSION_SECTION, &file_key(index)) {
        let value = config.get_string(SESSION_SECTION, &file_key(index), "");
        if let Some(mut file) = SessionFile::decode(&value) {
            file.current = index as i64 == current;
            files.push(file);
        }
        index += 1;
    }
    files
}

/// Open the given files in order. Missing files are skipped with a warning.
/// Returns how many documents were opened.
pub fn open_files(host: &mut dyn DocumentHost, files: Vec<SessionFile>) -> usize {
    let mut opened = 0;
    let mut current = None;
    for file in files {
        if !file.path.is_file() {
            tracing::warn!("Could not find file '{}'", file.path.display());
            continue;
        }
        if let Some(id) = host.open_file(&file.path, file.cursor) {
            opened += 1;
            if file.current {
                current = Some(id);
            }
        }
    }
    if let Some(id) = current {
        host.set_current(id);
    }
    opened
}

fn load_or_empty(path: &Path) -> Result<KeyFile> {
    if path.exists() {
        KeyFile::load(path)
    } else {
        Ok(KeyFile::new())
    }
}

/// The files open while no project is active, persisted apart from any
/// project file.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    pending: Vec<SessionFile>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pending: Vec::new(),
        }
    }

    /// Returns the default session path: config_dir/projectpad/session.conf
    pub fn default_path() -> PathBuf {
        platform::config_dir().join("session.conf")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Files loaded by `load_default` and not opened yet.
    pub fn pending(&self) -> &[SessionFile] {
        &self.pending
    }

    /// Snapshot the open documents into the default session file.
    pub fn save_default(&self, host: &dyn DocumentHost) -> Result<()> {
        let mut config = load_or_empty(&self.path)?;
        save_session_files(&mut config, host);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        tracing::debug!("default session saved to {}", self.path.display());
        Ok(())
    }

    /// Forget the default session so it is not replayed later.
    pub fn clear_default(&mut self) -> Result<()> {
        self.pending.clear();
        if !self.path.exists() {
            return Ok(());
        }
        let mut config = KeyFile::load(&self.path)?;
        if config.remove_section(SESSION_SECTION) {
            config.save(&self.path)?;
        }
        Ok(())
    }

    /// Read the default session into memory; `open_default` realizes it.
    pub fn load_default(&mut self) -> Result<()> {
        let config = load_or_empty(&self.path)?;
        self.pending = load_session_files(&config);
        Ok(())
    }

    pub fn open_default(&mut self, host: &mut dyn DocumentHost) -> usize {
        open_files(host, mem::take(&mut self.pending))
    }
}
