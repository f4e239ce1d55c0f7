//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document, DocumentId and the DocumentHost seam
//! - Project and its long line behaviour
//! - Editing preferences and application settings
//! - Project notifications and console messages

pub mod document;
pub mod events;
pub mod messages;
pub mod prefs;
pub mod project;
pub mod settings;

pub use document::{Document, DocumentHost, DocumentId};
pub use events::{EventBus, EventKind, ProjectEvent, ProjectListener};
pub use messages::Message;
pub use prefs::{AutoIndentMode, EditingPrefs, EffectivePrefs, IndentPrefs, IndentType};
pub use project::{LongLineBehaviour, MAX_NAME_LEN, PROJECT_EXT, Project, UNTITLED};
pub use settings::AppSettings;
