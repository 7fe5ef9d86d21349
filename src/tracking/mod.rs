//! Installed and explicitly requested bundles
//!
//! Every installed bundle ships a marker under `/usr/share/bundles`, which is
//! the inventory of what is on the system ([`SystemBundles`]). The
//! [`TrackingStore`] keeps its own markers in the state directory for bundles
//! a user asked for by name, as opposed to ones pulled in as dependencies.
//!
//! Tracking is bookkeeping only: failures are logged and never returned.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::StateLayout;
use crate::domain::MOM_COMPONENT;

/// Installed bundle inventory
pub trait Inventory {
    fn is_installed(&self, name: &str) -> bool;

    /// Installed bundle names, sorted
    fn installed(&self) -> Vec<String>;
}

/// Inventory read from the bundle markers on the target
#[derive(Debug, Clone)]
pub struct SystemBundles {
    dir: PathBuf,
}

impl SystemBundles {
    pub fn new(layout: &StateLayout) -> Self {
        Self {
            dir: layout.system_bundles_dir(),
        }
    }
}

impl Inventory for SystemBundles {
    fn is_installed(&self, name: &str) -> bool {
        !name.is_empty() && !name.contains('/') && self.dir.join(name).exists()
    }

    fn installed(&self) -> Vec<String> {
        marker_names(&self.dir)
    }
}

fn marker_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}

/// Markers for explicitly requested bundles
#[derive(Debug, Clone)]
pub struct TrackingStore {
    dir: PathBuf,
    system_dir: PathBuf,
}

impl TrackingStore {
    pub fn new(layout: &StateLayout) -> Self {
        Self {
            dir: layout.tracking_dir(),
            system_dir: layout.system_bundles_dir(),
        }
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.dir.join(name).exists()
    }

    /// Mark `name` as explicitly requested; creating an existing marker is fine
    pub fn track(&self, name: &str) {
        if !self.is_populated() {
            self.bootstrap();
        }
        let marker = self.dir.join(name);
        if let Err(e) = std::fs::create_dir_all(&self.dir).and_then(|()| {
            std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&marker)
                .map(drop)
        }) {
            warn!("Unable to track {}: {}", name, e);
        }
    }

    /// Remove the marker for `name`, if any
    pub fn untrack(&self, name: &str) {
        match std::fs::remove_file(self.dir.join(name)) {
            Ok(()) => debug!("Untracked {}", name),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Unable to untrack {}: {}", name, e),
        }
    }

    pub fn tracked_names(&self) -> Vec<String> {
        marker_names(&self.dir)
    }

    fn is_populated(&self) -> bool {
        std::fs::read_dir(&self.dir).is_ok_and(|mut entries| entries.next().is_some())
    }

    /// Seed the tracking directory from the system markers
    fn bootstrap(&self) {
        debug!("Seeding {} from {}", self.dir.display(), self.system_dir.display());
        if self.dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.dir) {
                warn!("Unable to reset {}: {}", self.dir.display(), e);
            }
        }
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!("Unable to create {}: {}", self.dir.display(), e);
            return;
        }

        for entry in walkdir::WalkDir::new(&self.system_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if let Err(e) = std::fs::copy(entry.path(), self.dir.join(entry.file_name())) {
                warn!("Unable to copy marker {}: {}", entry.path().display(), e);
            }
        }

        let stray = self.dir.join(format!(".{MOM_COMPONENT}"));
        if stray.exists() {
            if let Err(e) = std::fs::remove_file(&stray) {
                warn!("Unable to remove {}: {}", stray.display(), e);
            }
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) =
                std::fs::set_permissions(&self.dir, std::fs::Permissions::from_mode(0o700))
            {
                warn!("Unable to set permissions on {}: {}", self.dir.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestSystem;

    #[test]
    fn test_inventory_lists_markers() {
        let system = TestSystem::new();
        system.mark_installed("os-core");
        system.mark_installed("vim");
        std::fs::write(system.layout.system_bundles_dir().join(".MoM"), "").unwrap();

        let inventory = SystemBundles::new(&system.layout);
        assert!(inventory.is_installed("vim"));
        assert!(!inventory.is_installed("emacs"));
        assert!(!inventory.is_installed(""));
        assert_eq!(inventory.installed(), vec!["os-core", "vim"]);
    }

    #[test]
    fn test_track_bootstraps_from_system_markers() {
        let system = TestSystem::new();
        system.mark_installed("os-core");
        std::fs::write(system.layout.system_bundles_dir().join(".MoM"), "").unwrap();

        let store = TrackingStore::new(&system.layout);
        store.track("vim");

        assert!(store.is_tracked("os-core"));
        assert!(store.is_tracked("vim"));
        assert!(!system.layout.tracking_dir().join(".MoM").exists());
        assert_eq!(store.tracked_names(), vec!["os-core", "vim"]);
    }

    #[test]
    fn test_track_and_untrack_are_idempotent() {
        let system = TestSystem::new();
        let store = TrackingStore::new(&system.layout);
        store.track("vim");
        store.track("vim");
        assert!(store.is_tracked("vim"));

        store.untrack("vim");
        store.untrack("vim");
        assert!(!store.is_tracked("vim"));
    }

    #[test]
    fn test_populated_store_is_not_reseeded() {
        let system = TestSystem::new();
        let store = TrackingStore::new(&system.layout);
        store.track("vim");
        system.mark_installed("emacs");
        store.track("git");
        assert!(!store.is_tracked("emacs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_bootstrap_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let system = TestSystem::new();
        TrackingStore::new(&system.layout).track("vim");
        let mode = std::fs::metadata(system.layout.tracking_dir())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
