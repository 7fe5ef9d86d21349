//! Install totals
//!
//! Counted after the pipeline, whether or not it succeeded: requested bundles
//! whose marker is now present count as installed, everything else pulled in
//! counts as a dependency.

use crate::operations::context::Services;
use crate::ui::display::plural;

/// Totals of one bundle-add
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallSummary {
    /// Requested names, after alias expansion and deduplication
    pub requested: usize,
    /// Requested bundles installed by this run
    pub installed: usize,
    /// Bundles installed only because a requested bundle includes them
    pub dependencies: usize,
    /// Requested bundles that were installed before this run
    pub already: usize,
    /// Requested bundles that are neither installed nor already present
    pub failed: usize,
}

impl InstallSummary {
    /// Tally the outcome and track every requested bundle now installed
    pub fn tally(
        services: &Services<'_>,
        requested: &[String],
        to_install: &[String],
        already: usize,
    ) -> Self {
        let mut summary = Self {
            requested: requested.len(),
            already,
            ..Self::default()
        };

        for name in to_install {
            if !services.inventory.is_installed(name) {
                continue;
            }
            if requested.contains(name) {
                summary.installed += 1;
                services.tracking.track(name);
            } else {
                summary.dependencies += 1;
            }
        }

        summary.failed = summary
            .requested
            .saturating_sub(summary.installed)
            .saturating_sub(summary.already);
        summary
    }

    /// Summary lines, in print order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.failed > 0 {
            lines.push(format!(
                "Failed to install {} of {} bundles",
                self.failed,
                self.requested.saturating_sub(self.already)
            ));
        } else if self.installed > 0 {
            lines.push(format!(
                "Successfully installed {}",
                plural(self.installed, "bundle")
            ));
        }
        match self.dependencies {
            0 => {}
            1 => lines.push("1 bundle was installed as dependency".to_string()),
            n => lines.push(format!("{n} bundles were installed as dependencies")),
        }
        match self.already {
            0 => {}
            1 => lines.push("1 bundle was already installed".to_string()),
            n => lines.push(format!("{n} bundles were already installed")),
        }
        lines
    }
}
