//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Project, Settings, Messages)
//! - `controllers/` - Orchestration (ProjectManager, ProjectForm, TabManager)
//! - `services/` - Business operations (session, build menu, overlay, recent)
//! - `infrastructure/` - External integrations (key files, platform, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient external access
pub use controllers::project::ProjectManager;
pub use controllers::tabs::{TabManager, UnsavedPolicy};
pub use domain::{AppSettings, Document, DocumentHost, DocumentId, Message, Project};
pub use infrastructure::error::{AppError, Result};
pub use services::session::SessionStore;
pub use state::AppState;
