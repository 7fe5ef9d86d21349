//! UI/Progress presentation layer
//!
//! This module handles:
//! - Step progress for add and remove using indicatif
//! - Silent progress for quiet mode and tests
//! - User facing messages ([`display`])
//!
//! All progress reporting goes through the ProgressReporter trait, so the
//! pipelines never know whether a terminal is attached.

pub mod display;

use indicatif::{ProgressBar, ProgressStyle};

pub use display::Console;

/// Progress reporter trait for the step-wise pipelines
pub trait ProgressReporter {
    /// Enter step `step` of `total`
    fn set_step(&mut self, step: usize, total: usize, name: &str);

    /// Progress within the current step
    fn report(&mut self, complete: u64, total: u64);

    /// Mark the current step done
    fn complete_step(&mut self);

    /// All steps done
    fn finish(&mut self);

    /// Stop on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a visual progress bar
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub struct InteractiveProgressReporter {
    pb: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("{msg:<32} [{bar:40.cyan/blue}] {percent:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(100);
        pb.set_style(style);
        Self { pb }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn set_step(&mut self, step: usize, total: usize, name: &str) {
        self.pb.set_message(format!("[{}/{}] {}", step, total, name));
        self.pb.set_length(100);
        self.pb.set_position(0);
    }

    fn report(&mut self, complete: u64, total: u64) {
        if total == 0 {
            return;
        }
        self.pb.set_position(complete.min(total) * 100 / total);
    }

    fn complete_step(&mut self) {
        self.pb.set_position(100);
    }

    fn finish(&mut self) {
        self.pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.pb.abandon();
    }
}

/// Silent progress reporter
///
/// No-op implementation used with --quiet and in tests.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn set_step(&mut self, _step: usize, _total: usize, _name: &str) {
        // No-op for silent mode
    }

    fn report(&mut self, _complete: u64, _total: u64) {
        // No-op for silent mode
    }

    fn complete_step(&mut self) {
        // No-op for silent mode
    }

    fn finish(&mut self) {
        // No-op for silent mode
    }

    fn abandon(&mut self) {
        // No-op for silent mode
    }
}

/// Pick the reporter for the requested verbosity
pub fn reporter(quiet: bool) -> Box<dyn ProgressReporter> {
    if quiet {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new())
    }
}
