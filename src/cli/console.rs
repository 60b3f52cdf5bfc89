//! Renderer that prints display instructions to the terminal.

use colored::*;
use formcheck::host::{FieldError, FieldHandle, FormHandle, Renderer};

/// Prints errors and validity marks; clears and neutral marks only when verbose
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    verbose: bool,
}

impl ConsoleRenderer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Renderer for ConsoleRenderer {
    fn show_error(&self, field: &FieldHandle, error: &FieldError) {
        println!("    {} {}: {} ({})", "✗".red(), field, error.message.red(), error.check.dimmed());
    }

    fn clear_messages(&self, field: &FieldHandle) {
        if self.verbose {
            println!("    {} {}", "clear".dimmed(), field);
        }
    }

    fn mark_valid(&self, field: &FieldHandle) {
        println!("    {} {}", "✓".green(), field);
    }

    fn mark_invalid(&self, field: &FieldHandle) {
        if self.verbose {
            println!("    {} {}", "invalid".red(), field);
        }
    }

    fn mark_neutral(&self, field: &FieldHandle) {
        if self.verbose {
            println!("    {} {}", "neutral".yellow(), field);
        }
    }

    fn show_summary(&self, form: &FormHandle, errors: &[FieldError]) {
        println!(
            "  {} {} rejected with {} invalid field(s)",
            "Submit:".red(),
            form,
            errors.len()
        );
    }
}
