//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Section/key configuration files
//! - Platform directories
//! - Error types

pub mod error;
pub mod keyfile;
pub mod platform;
