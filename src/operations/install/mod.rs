//! Install operation
//!
//! `bundle-add` front end: finds the current version and MoM, expands
//! aliases, finishes renames left by an interrupted run, then runs the
//! install [`pipeline`] and reports totals and telemetry.

pub mod pipeline;
pub mod summary;

use tracing::info;

use crate::error::{BundleError, Result, ResultCode, manifest};
use crate::operations::context::Services;
use crate::telemetry::TelemetryEvent;
use crate::ui::ProgressReporter;

pub use summary::InstallSummary;

use pipeline::Pipeline;

/// Options for installation
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub skip_diskspace_check: bool,
    pub skip_optional_bundles: bool,
    pub wait_for_scripts: bool,
}

/// Outcome of one bundle-add
#[derive(Debug)]
pub struct InstallReport {
    pub summary: InstallSummary,
    pub error: Option<BundleError>,
}

impl InstallReport {
    pub fn result_code(&self) -> ResultCode {
        self.error
            .as_ref()
            .map_or(ResultCode::Ok, BundleError::result_code)
    }

    fn failed(error: BundleError) -> Self {
        Self {
            summary: InstallSummary::default(),
            error: Some(error),
        }
    }
}

/// High-level install operation
pub struct InstallOperation<'s, 'a> {
    services: &'s Services<'a>,
    options: InstallOptions,
}

impl<'s, 'a> InstallOperation<'s, 'a> {
    pub fn new(services: &'s Services<'a>, options: InstallOptions) -> Self {
        Self { services, options }
    }

    /// Install `bundles` and everything they include
    pub fn execute(&self, bundles: &[String], progress: &mut dyn ProgressReporter) -> InstallReport {
        let mut event = TelemetryEvent::new("bundleadd", bundles);

        let report = match self.services.store.current_version() {
            Ok(version) => {
                event.current_version = Some(version);
                self.install_at(version, bundles, progress)
            }
            Err(e) => InstallReport::failed(e),
        };

        if report.error.is_some() {
            progress.abandon();
        } else {
            progress.finish();
        }

        event.result = report.result_code().exit_code();
        event.bytes = self.services.fetcher.bytes_transferred();
        event.critical = report.error.is_some();
        self.services.telemetry.record(&event);
        report
    }

    fn install_at(
        &self,
        version: u32,
        bundles: &[String],
        progress: &mut dyn ProgressReporter,
    ) -> InstallReport {
        let services = self.services;
        let mix = services.store.system_on_mix();
        let Some(mom) = services.store.load_mom(version, mix) else {
            return InstallReport::failed(manifest::mom_unavailable(version));
        };

        let requested = self.expand_aliases(bundles);

        let recovered = services.journal.recover();
        if recovered > 0 {
            info!("Recovered {} file(s) from an interrupted install", recovered);
        }

        let mut pipeline = Pipeline::new(services, &self.options, progress, &mom, &requested);
        let result = pipeline.run();

        let summary = InstallSummary::tally(
            services,
            &requested,
            &pipeline.to_install,
            pipeline.already,
        );
        for line in summary.lines() {
            services.console.print(line);
        }

        let error = match (result, pipeline.bad_name) {
            (Err(e), _) => Some(e),
            (Ok(()), Some(name)) => Some(crate::error::bundle::invalid(name)),
            (Ok(()), None) => None,
        };
        InstallReport { summary, error }
    }

    /// Replace aliases with the bundles they name and drop duplicates
    fn expand_aliases(&self, bundles: &[String]) -> Vec<String> {
        let aliases = self.services.aliases;
        let mut requested: Vec<String> = Vec::new();
        for name in bundles {
            let expanded = aliases.expand(name);
            if aliases.is_alias(name) {
                self.services.console.info(format!(
                    "Alias {} will install bundle(s): {}",
                    name,
                    expanded.join(", ")
                ));
            }
            for bundle in expanded {
                if !requested.contains(&bundle) {
                    requested.push(bundle);
                }
            }
        }
        requested
    }
}

/// Convenience wrapper used by the command layer
pub fn install(
    services: &Services<'_>,
    options: InstallOptions,
    bundles: &[String],
    progress: &mut dyn ProgressReporter,
) -> Result<InstallSummary> {
    let report = InstallOperation::new(services, options).execute(bundles, progress);
    match report.error {
        Some(e) => Err(e),
        None => Ok(report.summary),
    }
}
