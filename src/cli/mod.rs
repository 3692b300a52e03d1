//! CLI module for preparing datasets.
//!
//! This module contains the command-line interface logic, including argument
//! parsing and the `prepare` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Dataset preparation logic.
pub mod prepare;

/// Logging helpers.
pub mod logging;
