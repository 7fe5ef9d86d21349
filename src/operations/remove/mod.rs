//! Remove operation
//!
//! `bundle-remove` classifies each requested bundle in request order. A
//! rejected bundle is counted as failed and the rest of the batch carries on.
//! Accepted bundles, plus their dependents under `--force`, move from the
//! installed set to the removal set; their files are deleted once at the end,
//! minus any file a remaining bundle still ships.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{BASE_BUNDLE, Manifest, Subscriptions, move_manifest};
use crate::error::{BundleError, Result, ResultCode, bundle, manifest};
use crate::fileset;
use crate::operations::context::Services;
use crate::resolver::{TraversalContext, find_dependents};
use crate::telemetry::TelemetryEvent;
use crate::ui::display::plural;

/// Options for removal
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Also remove every bundle that requires a requested one
    pub force: bool,
    /// Show dependents as a tree
    pub verbose: bool,
}

/// Outcome of one bundle-remove
#[derive(Debug, Default)]
pub struct RemoveReport {
    /// Requested names after deduplication
    pub total: usize,
    pub failed: usize,
    /// Bundles moved to the removal set, dependents first
    pub removed: Vec<String>,
    /// Dependents found for each requested bundle that had any
    pub dependents: BTreeMap<String, Vec<String>>,
    /// Files and directories deleted from disk
    pub deleted: usize,
    /// Code of the last rejected bundle
    pub last_failure: Option<ResultCode>,
    /// Error that stopped the whole operation
    pub error: Option<BundleError>,
}

impl RemoveReport {
    pub fn result_code(&self) -> ResultCode {
        match &self.error {
            Some(e) => e.result_code(),
            None => self.last_failure.unwrap_or(ResultCode::Ok),
        }
    }

    /// Final tally line
    pub fn summary_line(&self) -> String {
        if self.failed > 0 {
            format!("Failed to remove {} of {} bundles", self.failed, self.total)
        } else {
            format!("Successfully removed {}", plural(self.total, "bundle"))
        }
    }
}

/// Installed and to-be-removed manifests while classifying
struct Selection {
    remaining: Vec<Manifest>,
    to_remove: Vec<Manifest>,
}

/// High-level remove operation
pub struct RemoveOperation<'s, 'a> {
    services: &'s Services<'a>,
    options: RemoveOptions,
}

impl<'s, 'a> RemoveOperation<'s, 'a> {
    pub fn new(services: &'s Services<'a>, options: RemoveOptions) -> Self {
        Self { services, options }
    }

    /// Remove `bundles` from the target
    pub fn execute(&self, bundles: &[String]) -> RemoveReport {
        let mut requested: Vec<String> = Vec::with_capacity(bundles.len());
        for name in bundles {
            if !requested.contains(name) {
                requested.push(name.clone());
            }
        }

        let mut event = TelemetryEvent::new("bundleremove", &requested);
        let mut report = RemoveReport {
            total: requested.len(),
            ..RemoveReport::default()
        };

        match self.services.store.current_version() {
            Ok(version) => {
                event.current_version = Some(version);
                if let Err(e) = self.remove_at(version, &requested, &mut report) {
                    report.error = Some(e);
                }
            }
            Err(e) => report.error = Some(e),
        }

        if report.error.is_some() {
            report.failed = report.total;
        }
        self.services.console.print(report.summary_line());

        event.result = report.result_code().exit_code();
        event.critical = report.error.is_some();
        self.services.telemetry.record(&event);
        report
    }

    fn remove_at(&self, version: u32, requested: &[String], report: &mut RemoveReport) -> Result<()> {
        let services = self.services;

        let recovered = services.journal.recover();
        if recovered > 0 {
            info!("Recovered {} file(s) from an interrupted install", recovered);
        }

        let mom = services
            .store
            .load_mom(version, services.store.system_on_mix())
            .ok_or_else(|| manifest::mom_unavailable(version))?;

        let mut installed = Subscriptions::from_names(services.inventory.installed());
        installed.pin_versions(&mom);
        let mut selection = Selection {
            remaining: services.store.load_submanifests(&mom, &installed)?,
            to_remove: Vec::new(),
        };

        for (index, name) in requested.iter().enumerate() {
            // Later bundles of the batch never block earlier ones
            let exclusions = &requested[index..];
            if let Err(e) = self.select(name, exclusions, &mom, &mut selection, report) {
                services.console.error(e.to_string());
                report.failed += 1;
                report.last_failure = Some(e.result_code());
            }
        }

        if selection.to_remove.is_empty() {
            return Ok(());
        }

        services.console.info("Deleting bundle files...");
        let remaining_files = fileset::consolidate(&selection.remaining);
        let files = fileset::filter_removable(
            fileset::consolidate(&selection.to_remove),
            &remaining_files,
        );
        debug!("{} file(s) to delete", files.len());
        report.deleted = services.filesystem.delete_files(&files);
        services.filesystem.sync();
        services
            .console
            .info(format!("Total deleted files: {}", report.deleted));
        Ok(())
    }

    /// Move one requested bundle, and its dependents when forced, to the removal set
    fn select(
        &self,
        name: &str,
        exclusions: &[String],
        mom: &Manifest,
        selection: &mut Selection,
        report: &mut RemoveReport,
    ) -> Result<()> {
        let services = self.services;
        if name == BASE_BUNDLE {
            return Err(bundle::protected(name));
        }
        if mom.find_bundle(name).is_none() {
            return Err(bundle::invalid(name));
        }
        if !services.inventory.is_installed(name) {
            return Err(bundle::not_tracked(name));
        }

        let mut ctx = TraversalContext::new(
            format!("Bundle \"{name}\" is required by the following bundles:"),
            self.options.verbose,
        );
        let dependents = find_dependents(name, &selection.remaining, exclusions, &mut ctx);

        if !dependents.is_empty() {
            for line in ctx.lines() {
                services.console.print(line);
            }
            report.dependents.insert(name.to_string(), dependents.clone());
            if !self.options.force {
                return Err(bundle::required(name, dependents.len()));
            }

            services.console.warn(format!(
                "The --force option was used, {name} and all bundles that require it will be removed"
            ));
            for dependent in dependents.iter().filter(|d| *d != BASE_BUNDLE) {
                services.console.info(format!("Removing bundle: {dependent}"));
                self.take(dependent, selection, report);
            }
        }

        services.console.info(format!("Removing bundle: {name}"));
        self.take(name, selection, report);
        Ok(())
    }

    fn take(&self, name: &str, selection: &mut Selection, report: &mut RemoveReport) {
        if !move_manifest(name, &mut selection.remaining, &mut selection.to_remove) {
            debug!("{} has no loaded manifest, only untracking it", name);
        }
        self.services.tracking.untrack(name);
        report.removed.push(name.to_string());
    }
}
