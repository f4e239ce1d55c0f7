use std::path::{Path, PathBuf};

use super::prefs::EffectivePrefs;
use crate::app::services::text_ops::{extract_filename, filetype_for_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub file_path: Option<PathBuf>,
    pub display_name: String,
    pub has_unsaved_changes: bool,
    pub cursor_position: usize,
    pub filetype: Option<String>,
    /// Preferences the editor currently applies to this document.
    pub prefs: EffectivePrefs,
}

impl Document {
    pub fn new_untitled(id: DocumentId, counter: u32, prefs: EffectivePrefs) -> Self {
        let display_name = if counter == 1 {
            "Untitled".to_string()
        } else {
            format!("Untitled {}", counter)
        };

        Self {
            id,
            file_path: None,
            display_name,
            has_unsaved_changes: false,
            cursor_position: 0,
            filetype: None,
            prefs,
        }
    }

    pub fn new_from_file(id: DocumentId, path: PathBuf, cursor: usize, prefs: EffectivePrefs) -> Self {
        Self {
            id,
            display_name: extract_filename(&path),
            filetype: filetype_for_path(&path),
            file_path: Some(path),
            has_unsaved_changes: false,
            cursor_position: cursor,
            prefs,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn mark_clean(&mut self) {
        self.has_unsaved_changes = false;
    }

    pub fn directory(&self) -> Option<&Path> {
        self.file_path.as_deref().and_then(Path::parent)
    }
}

/// The open-document surface the project lifecycle drives.
pub trait DocumentHost {
    /// Open documents in tab order.
    fn documents(&self) -> &[Document];

    fn current(&self) -> Option<&Document>;

    /// Close every document. Returns `false` when the close is refused
    /// (for instance over unsaved changes), in which case nothing is closed.
    fn close_all(&mut self) -> bool;

    /// Open `path` with the cursor at `cursor`, or focus it if already open.
    fn open_file(&mut self, path: &Path, cursor: usize) -> Option<DocumentId>;

    fn find_by_path(&self, path: &Path) -> Option<DocumentId>;

    fn set_current(&mut self, id: DocumentId);

    /// Open an empty untitled document when nothing is open.
    fn new_file_if_none_open(&mut self);

    fn focus_current(&mut self);

    /// Re-derive every open document's editor preferences.
    fn apply_prefs(&mut self, prefs: &EffectivePrefs);
}
