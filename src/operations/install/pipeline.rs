//! The seven install steps
//!
//! 1. resolve the requested bundles and load their manifests
//! 2. work out which files are missing from the system
//! 3. check free space under `/usr`
//! 4. fetch bundle packs
//! 5. fetch remaining files one by one
//! 6. stage every file, then rename them all into place
//! 7. run post-update hooks
//!
//! A failing step stops the ones after it. Renames already done stay done.

use tracing::{debug, warn};

use crate::domain::{FileEntry, Manifest, Subscriptions};
use crate::error::{Result, bundle, fs};
use crate::fileset;
use crate::operations::context::Services;
use crate::resolver::DependencyResolver;
use crate::staging::heuristics;
use crate::ui::ProgressReporter;

use super::InstallOptions;

/// Number of install steps reported to the progress bar
pub const STEPS: usize = 7;

/// Below this many files, packs are not worth fetching
const PACK_THRESHOLD: usize = 10;

pub(super) struct Pipeline<'s, 'a> {
    services: &'s Services<'a>,
    options: &'s InstallOptions,
    progress: &'s mut dyn ProgressReporter,
    mom: &'s Manifest,
    requested: &'s [String],
    /// Requested bundles that were installed before this run
    pub already: usize,
    /// Bundles whose manifests were loaded for installing
    pub to_install: Vec<String>,
    /// First requested or included name missing from the MoM
    pub bad_name: Option<String>,
}

impl<'s, 'a> Pipeline<'s, 'a> {
    pub fn new(
        services: &'s Services<'a>,
        options: &'s InstallOptions,
        progress: &'s mut dyn ProgressReporter,
        mom: &'s Manifest,
        requested: &'s [String],
    ) -> Self {
        Self {
            services,
            options,
            progress,
            mom,
            requested,
            already: 0,
            to_install: Vec::new(),
            bad_name: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let Some(mut subs) = self.resolve()? else {
            return Ok(());
        };
        let (to_install, installed) = self.load_manifests(&mut subs)?;
        self.to_install = to_install.iter().map(|m| m.component.clone()).collect();

        let files = self.diff(&to_install, &installed);
        self.check_disk_space(&to_install)?;
        self.fetch_packs(&subs, files.len());
        self.fetch_files(&files)?;
        self.materialize(&files)?;
        self.run_scripts();
        Ok(())
    }

    /// Step 1: `None` when there is nothing new to install
    fn resolve(&mut self) -> Result<Option<Subscriptions>> {
        let services = self.services;
        self.progress.set_step(1, STEPS, "load_manifests");
        services.console.info("Loading required manifests...");

        let resolver = DependencyResolver::new(
            services.store,
            services.inventory,
            self.options.skip_optional_bundles,
        );
        let mut subs = Subscriptions::new();
        let outcome = resolver.add_subscriptions(self.requested, &mut subs, self.mom, false, 0);

        for name in self.requested {
            if services.inventory.is_installed(name) {
                services
                    .console
                    .warn(format!("Bundle \"{name}\" is already installed, skipping it..."));
                self.already += 1;
                services.tracking.track(name);
            }
            if self.mom.find_bundle(name).is_some_and(|d| d.is_experimental) {
                services
                    .console
                    .warn(format!("Bundle {name} is experimental"));
            }
        }

        self.bad_name = outcome.bad_names.iter().next().cloned();
        if let Some(e) = outcome.load_error {
            return Err(e);
        }
        if !outcome.added_new {
            return match &self.bad_name {
                Some(name) => Err(bundle::invalid(name)),
                None => Ok(None),
            };
        }
        Ok(Some(subs))
    }

    /// Load the manifests to install and the ones already installed
    fn load_manifests(&mut self, subs: &mut Subscriptions) -> Result<(Vec<Manifest>, Vec<Manifest>)> {
        let services = self.services;
        subs.pin_versions(self.mom);
        let to_install = services.store.load_submanifests(self.mom, subs)?;

        let mut current = Subscriptions::from_names(services.inventory.installed());
        current.pin_versions(self.mom);
        let installed = services.store.load_submanifests(self.mom, &current)?;

        self.progress.complete_step();
        Ok((to_install, installed))
    }

    /// Step 2: files of the new bundles not already on the system
    fn diff<'m>(&mut self, to_install: &'m [Manifest], installed: &[Manifest]) -> Vec<&'m FileEntry> {
        self.progress.set_step(2, STEPS, "consolidate_files");
        let installed_files = fileset::drop_deleted(fileset::consolidate(installed));
        let candidates = fileset::drop_deleted(fileset::consolidate(to_install));
        let files = fileset::drop_satisfied(candidates, &installed_files);
        debug!("{} file(s) to install", files.len());
        self.progress.complete_step();
        files
    }

    /// Step 3
    fn check_disk_space(&mut self, to_install: &[Manifest]) -> Result<()> {
        let services = self.services;
        self.progress.set_step(3, STEPS, "check_disk_space_availability");
        if self.options.skip_diskspace_check {
            self.progress.complete_step();
            return Ok(());
        }

        let bundle_size: u64 = to_install.iter().map(|m| m.content_size).sum();
        // 10% on top of the declared size
        let required = bundle_size.saturating_add(bundle_size / 10);
        let usr = services.layout.usr_dir();

        let result = match services.filesystem.available_space(&usr) {
            None => {
                services
                    .console
                    .error("Unable to determine free space on filesystem");
                Err(fs::disk_space_unknown(&usr))
            }
            Some(available) if required > available => {
                services.console.error(format!(
                    "Bundle too large by {}M",
                    required.saturating_sub(available) / 1000 / 1000
                ));
                Err(fs::disk_space(required, available))
            }
            Some(_) => Ok(()),
        };

        if result.is_err() {
            services.console.info(format!(
                "NOTE: currently, only {} is checked for available space",
                usr.display()
            ));
            services.console.info(
                "To skip this error and install anyways, add the --skip-diskspace-check flag to your command",
            );
        } else {
            self.progress.complete_step();
        }
        result
    }

    /// Step 4: a failed pack only means more full files to fetch
    fn fetch_packs(&mut self, subs: &Subscriptions, file_count: usize) {
        let services = self.services;
        self.progress.set_step(4, STEPS, "download_packs");
        if file_count > PACK_THRESHOLD {
            if let Err(e) = services.fetcher.fetch_packs(subs, self.mom) {
                warn!("Pack download failed, falling back to full files: {}", e);
            }
        } else {
            services.console.info("No packs need to be downloaded");
        }
        self.progress.complete_step();
    }

    /// Step 5
    fn fetch_files(&mut self, files: &[&FileEntry]) -> Result<()> {
        let services = self.services;
        self.progress.set_step(5, STEPS, "download_fullfiles");
        if let Err(e) = services.fetcher.fetch_full_files(files) {
            services
                .console
                .error("Could not download some files from bundles, aborting bundle installation");
            return Err(e);
        }
        self.progress.complete_step();
        Ok(())
    }

    /// Step 6: verify, stage, journal, rename, sync
    fn materialize(&mut self, files: &[&FileEntry]) -> Result<()> {
        let services = self.services;
        let filesystem = services.filesystem;
        self.progress.set_step(6, STEPS, "install_files");
        services.console.info("Installing bundle(s) files...");

        self.repair_corrupt(files)?;

        let total = (files.len() * 2) as u64;
        let mut complete = 0u64;

        for file in files {
            complete += 1;
            if !is_installable(file) {
                continue;
            }
            if heuristics::classify(&file.filename) == heuristics::FileClass::Boot {
                debug!("Boot content changed: {}", file.filename);
            }
            filesystem.stage(file)?;
            self.progress.report(complete, total);
        }

        let staged: Vec<&FileEntry> = files.iter().copied().filter(|f| is_installable(f)).collect();
        services.journal.record(&staged)?;

        for file in files {
            complete += 1;
            if !is_installable(file) {
                continue;
            }
            filesystem.commit_rename(file)?;
            self.progress.report(complete, total);
        }

        filesystem.sync();
        services.journal.clear();
        self.progress.complete_step();
        Ok(())
    }

    /// Drop fetched blobs that fail their hash check and fetch them once more
    fn repair_corrupt(&mut self, files: &[&FileEntry]) -> Result<()> {
        let services = self.services;
        let filesystem = services.filesystem;
        let corrupt: Vec<&FileEntry> = files
            .iter()
            .copied()
            .filter(|f| !f.is_deleted && !f.is_dir && !filesystem.verify_hash(f))
            .collect();
        if corrupt.is_empty() {
            return Ok(());
        }

        for file in &corrupt {
            services
                .console
                .warn(format!("hash check failed for {}", file.filename));
            services
                .console
                .info(format!("         will attempt to download fullfile for {}", file.filename));
            filesystem.discard(file);
        }
        services.fetcher.fetch_full_files(&corrupt)?;

        match corrupt.iter().find(|f| !filesystem.verify_hash(f)) {
            Some(file) => Err(fs::fetch_failed(format!(
                "{} does not match its hash",
                file.filename
            ))),
            None => Ok(()),
        }
    }

    /// Step 7
    fn run_scripts(&mut self) {
        self.progress.set_step(7, STEPS, "run_scripts");
        self.services
            .hooks
            .run_post_update(self.options.wait_for_scripts);
        self.progress.complete_step();
    }
}

fn is_installable(file: &FileEntry) -> bool {
    !file.is_deleted && !file.do_not_update && !heuristics::ignore(&file.filename)
}
