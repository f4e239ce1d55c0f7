//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Session persistence (default session and project session files)
//! - Project-scoped build commands
//! - Preference overlay
//! - Recent projects
//! - Text operations

pub mod build;
pub mod overlay;
pub mod recent;
pub mod session;
pub mod text_ops;
