use std::path::Path;

use crate::app::domain::document::{Document, DocumentHost, DocumentId};
use crate::app::domain::prefs::EffectivePrefs;

/// What `close_all` does with documents that have unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsavedPolicy {
    /// Veto the whole close.
    #[default]
    Refuse,
    Discard,
}

#[derive(Debug, Default)]
pub struct TabManager {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
    untitled_counter: u32,
    unsaved_policy: UnsavedPolicy,
    /// Preferences given to newly opened documents.
    prefs: EffectivePrefs,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_untitled(&mut self) -> DocumentId {
        self.untitled_counter += 1;
        let id = self.next_document_id();
        let doc = Document::new_untitled(id, self.untitled_counter, self.prefs.clone());
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    pub fn set_unsaved_policy(&mut self, policy: UnsavedPolicy) {
        self.unsaved_policy = policy;
    }

    pub fn mark_dirty(&mut self, id: DocumentId) {
        if let Some(doc) = self.doc_by_id_mut(id) {
            doc.has_unsaved_changes = true;
        }
    }

    pub fn has_unsaved(&self) -> bool {
        self.documents.iter().any(Document::is_dirty)
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }
}

impl DocumentHost for TabManager {
    fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn current(&self) -> Option<&Document> {
        self.doc_by_id(self.active_id?)
    }

    fn close_all(&mut self) -> bool {
        if self.unsaved_policy == UnsavedPolicy::Refuse && self.has_unsaved() {
            tracing::debug!("close all refused: unsaved changes");
            return false;
        }
        self.documents.clear();
        self.active_id = None;
        self.untitled_counter = 0;
        true
    }

    fn open_file(&mut self, path: &Path, cursor: usize) -> Option<DocumentId> {
        if let Some(id) = self.find_by_path(path) {
            if let Some(doc) = self.doc_by_id_mut(id) {
                doc.cursor_position = cursor;
            }
            self.active_id = Some(id);
            return Some(id);
        }
        if !path.is_file() {
            tracing::warn!("Could not open file '{}'", path.display());
            return None;
        }
        let id = self.next_document_id();
        let doc = Document::new_from_file(id, path.to_path_buf(), cursor, self.prefs.clone());
        self.documents.push(doc);
        self.active_id = Some(id);
        Some(id)
    }

    fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.file_path.as_deref() == Some(path))
            .map(|d| d.id)
    }

    fn set_current(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id == id) {
            self.active_id = Some(id);
        }
    }

    fn new_file_if_none_open(&mut self) {
        if self.documents.is_empty() {
            self.add_untitled();
        }
    }

    fn focus_current(&mut self) {
        if self.active_id.is_none() {
            self.active_id = self.documents.first().map(|d| d.id);
        }
    }

    fn apply_prefs(&mut self, prefs: &EffectivePrefs) {
        self.prefs = prefs.clone();
        for doc in &mut self.documents {
            doc.prefs = prefs.clone();
        }
    }
}
