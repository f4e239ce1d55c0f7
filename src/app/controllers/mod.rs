//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the UI:
//! - Project lifecycle
//! - Project form editing and validation
//! - Tab management

pub mod form;
pub mod project;
pub mod tabs;
