//! CLI module for formcheck - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for checking single values,
//! listing registered field types and messages, and replaying form fixtures.

pub mod commands;
pub mod console;

pub use commands::Cli;
pub use console::ConsoleRenderer;
