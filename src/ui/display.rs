//! User facing messages
//!
//! Results and summaries go to stdout. Warnings and errors go to stderr.
//! Informational chatter is dropped in quiet mode; results never are.

use console::Style;

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Progress chatter, hidden by --quiet
    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", msg.as_ref());
        }
    }

    /// Results and summaries
    pub fn print(&self, msg: impl AsRef<str>) {
        println!("{}", msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        eprintln!(
            "{} {}",
            Style::new().yellow().bold().apply_to("Warning:"),
            msg.as_ref()
        );
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        eprintln!(
            "{} {}",
            Style::new().red().bold().apply_to("Error:"),
            msg.as_ref()
        );
    }
}

/// `1 bundle` / `2 bundles`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
