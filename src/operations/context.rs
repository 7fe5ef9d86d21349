//! Shared context for bundle operations
//!
//! [`Services`] bundles the collaborators every operation talks to, borrowed
//! for the duration of one invocation. [`SystemServices`] owns the real
//! implementations built from the effective settings.

use crate::config::{AliasTable, Settings, StateLayout};
use crate::delivery::{ContentFetcher, LocalContentFetcher};
use crate::scripts::{HookRunner, PostUpdateHooks};
use crate::staging::{Filesystem, SystemFilesystem};
use crate::store::{LocalManifestStore, ManifestStore};
use crate::telemetry::{TelemetrySink, TelemetrySpool};
use crate::tracking::{Inventory, SystemBundles, TrackingStore};
use crate::transaction::RenameJournal;
use crate::ui::Console;

/// Collaborators used by add, remove and the queries
pub struct Services<'a> {
    pub layout: &'a StateLayout,
    pub store: &'a dyn ManifestStore,
    pub fetcher: &'a dyn ContentFetcher,
    pub filesystem: &'a dyn Filesystem,
    pub inventory: &'a dyn Inventory,
    pub tracking: &'a TrackingStore,
    pub hooks: &'a dyn PostUpdateHooks,
    pub telemetry: &'a dyn TelemetrySink,
    pub journal: &'a RenameJournal,
    pub aliases: &'a AliasTable,
    pub console: Console,
}

/// Owned collaborators for one target system
pub struct SystemServices {
    pub layout: StateLayout,
    pub store: LocalManifestStore,
    pub fetcher: LocalContentFetcher,
    pub filesystem: SystemFilesystem,
    pub inventory: SystemBundles,
    pub tracking: TrackingStore,
    pub hooks: HookRunner,
    pub telemetry: TelemetrySpool,
    pub journal: RenameJournal,
    pub aliases: AliasTable,
    pub console: Console,
}

impl SystemServices {
    pub fn new(settings: &Settings) -> Self {
        let mut services = Self::for_layout(settings.layout(), &settings.content_dir);
        services.telemetry = TelemetrySpool::new(settings.telemetry_dir.clone());
        services.console = Console::new(settings.quiet);
        services
    }

    /// Services over `layout` reading content from `content_dir`
    pub fn for_layout(layout: StateLayout, content_dir: &std::path::Path) -> Self {
        Self {
            store: LocalManifestStore::new(layout.clone(), content_dir),
            fetcher: LocalContentFetcher::new(layout.clone(), content_dir),
            filesystem: SystemFilesystem::new(layout.clone()),
            inventory: SystemBundles::new(&layout),
            tracking: TrackingStore::new(&layout),
            hooks: HookRunner::new(&layout),
            telemetry: TelemetrySpool::default(),
            journal: RenameJournal::new(&layout),
            aliases: AliasTable::load(&layout.alias_dirs()),
            console: Console::default(),
            layout,
        }
    }

    pub fn services(&self) -> Services<'_> {
        Services {
            layout: &self.layout,
            store: &self.store,
            fetcher: &self.fetcher,
            filesystem: &self.filesystem,
            inventory: &self.inventory,
            tracking: &self.tracking,
            hooks: &self.hooks,
            telemetry: &self.telemetry,
            journal: &self.journal,
            aliases: &self.aliases,
            console: self.console,
        }
    }
}
