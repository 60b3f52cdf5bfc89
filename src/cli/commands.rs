//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - check: run one field type's checks against a value
//! - types: list registered field types
//! - messages: list registered messages
//! - simulate: replay a YAML form fixture

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formcheck - A declarative field-validation engine for interactive forms
#[derive(Parser, Debug)]
#[command(name = "formcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a field type's checks against a value
    Check {
        /// Field type (text, number, email, phoneNL, postalcodeNL, radio, checkbox)
        field_type: String,

        /// Value to check; for radio and checkbox, comma-separated checked options
        #[arg(default_value = "")]
        value: String,

        /// Minimum length
        #[arg(long)]
        min: Option<usize>,

        /// Maximum length
        #[arg(long)]
        max: Option<usize>,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// List registered field types and their checks
    Types,

    /// List registered messages
    Messages,

    /// Replay a form fixture and print each field's state after every step
    Simulate {
        /// Path to the YAML fixture
        fixture: PathBuf,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },
}
