//! Manifest store
//!
//! The [`ManifestStore`] trait is how operations reach the catalog: the
//! current OS version, the MoM for a version and individual bundle manifests.
//! [`LocalManifestStore`] reads YAML manifest documents from a content
//! directory laid out as:
//!
//! ```text
//! <content>/<version>/Manifest.MoM
//! <content>/<version>/Manifest.<bundle>
//! <content>/mix/<version>/...        (locally mixed content)
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::StateLayout;
use crate::domain::{FileEntry, MOM_COMPONENT, Manifest, Subscriptions, Version};
use crate::error::{BundleError, Result, manifest};

/// Subdirectory of the content directory holding mixed content
pub const MIX_DIR: &str = "mix";

/// Access to the catalog and bundle manifests
pub trait ManifestStore {
    /// Version of the content currently installed on the target
    fn current_version(&self) -> Result<Version>;

    /// Load the MoM for `version`; `None` when it cannot be loaded
    fn load_mom(&self, version: Version, mix: bool) -> Option<Manifest>;

    /// Load the manifest a MoM descriptor points at
    fn load_manifest(
        &self,
        version: Version,
        descriptor: &FileEntry,
        mom: &Manifest,
    ) -> Result<Manifest>;

    /// Whether the target runs locally mixed content
    fn system_on_mix(&self) -> bool {
        false
    }

    /// Load one manifest per subscription at its pinned version.
    ///
    /// Subscriptions the MoM no longer lists are skipped.
    fn load_submanifests(&self, mom: &Manifest, subs: &Subscriptions) -> Result<Vec<Manifest>> {
        let mut manifests = Vec::with_capacity(subs.len());
        for sub in subs {
            let Some(descriptor) = mom.find_bundle(&sub.component) else {
                debug!("{} is not in the MoM, not loading it", sub.component);
                continue;
            };
            let version = if sub.version == 0 {
                descriptor.last_change
            } else {
                sub.version
            };
            let loaded = self
                .load_manifest(version, descriptor, mom)
                .map_err(manifest::recurse_failed)?;
            manifests.push(loaded);
        }
        Ok(manifests)
    }
}

/// Manifest store backed by a local content directory
#[derive(Debug, Clone)]
pub struct LocalManifestStore {
    layout: StateLayout,
    content_dir: PathBuf,
}

impl LocalManifestStore {
    pub fn new(layout: StateLayout, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout,
            content_dir: content_dir.into(),
        }
    }

    fn manifest_path(&self, version: Version, component: &str, mix: bool) -> PathBuf {
        let root = if mix {
            self.content_dir.join(MIX_DIR)
        } else {
            self.content_dir.clone()
        };
        root.join(version.to_string())
            .join(format!("Manifest.{component}"))
    }

    fn read_manifest(path: &Path) -> Result<Manifest> {
        let content = std::fs::read_to_string(path).map_err(|e| BundleError::IoError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Manifest::from_yaml(&content)
    }
}

impl ManifestStore for LocalManifestStore {
    fn current_version(&self) -> Result<Version> {
        let os_release = self.layout.os_release();
        let content = std::fs::read_to_string(&os_release)
            .map_err(|_| BundleError::CurrentVersionUnknown)?;
        parse_version_id(&content).ok_or(BundleError::CurrentVersionUnknown)
    }

    fn load_mom(&self, version: Version, mix: bool) -> Option<Manifest> {
        let path = self.manifest_path(version, MOM_COMPONENT, mix);
        match Self::read_manifest(&path) {
            Ok(mom) => Some(mom),
            Err(e) => {
                debug!("Cannot load MoM from {}: {}", path.display(), e);
                None
            }
        }
    }

    fn load_manifest(
        &self,
        version: Version,
        descriptor: &FileEntry,
        _mom: &Manifest,
    ) -> Result<Manifest> {
        let name = &descriptor.filename;
        let official = self.manifest_path(version, name, false);
        let path = if official.exists() {
            official
        } else {
            self.manifest_path(version, name, true)
        };

        let loaded =
            Self::read_manifest(&path).map_err(|e| manifest::load_failed(name, version, e))?;
        if loaded.component != *name {
            return Err(manifest::load_failed(
                name,
                version,
                format!("manifest describes component '{}'", loaded.component),
            ));
        }
        Ok(loaded)
    }

    fn system_on_mix(&self) -> bool {
        self.layout.mix_marker().exists() && self.content_dir.join(MIX_DIR).is_dir()
    }
}

/// Extract `VERSION_ID` from os-release content
pub fn parse_version_id(os_release: &str) -> Option<Version> {
    os_release.lines().find_map(|line| {
        let value = line.trim().strip_prefix("VERSION_ID=")?;
        value.trim_matches(|c| c == '"' || c == '\'').parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestSystem;

    #[test]
    fn test_parse_version_id() {
        assert_eq!(parse_version_id("NAME=Linux\nVERSION_ID=40\n"), Some(40));
        assert_eq!(parse_version_id("VERSION_ID=\"1250\""), Some(1250));
        assert_eq!(parse_version_id("VERSION_ID=rolling"), None);
        assert_eq!(parse_version_id("NAME=Linux"), None);
    }

    #[test]
    fn test_current_version_missing_os_release() {
        let system = TestSystem::new();
        std::fs::remove_file(system.layout.os_release()).unwrap();
        let err = system.store().current_version().unwrap_err();
        assert!(matches!(err, BundleError::CurrentVersionUnknown));
    }

    #[test]
    fn test_load_mom_and_manifest() {
        let system = TestSystem::with_editor_catalog();
        let store = system.store();
        let version = store.current_version().unwrap();
        let mom = store.load_mom(version, false).unwrap();
        assert_eq!(mom.bundle_names(), vec!["editors", "os-core", "vim"]);

        let descriptor = mom.find_bundle("vim").unwrap();
        let vim = store
            .load_manifest(descriptor.last_change, descriptor, &mom)
            .unwrap();
        assert_eq!(vim.includes, vec!["editors".to_string()]);
    }

    #[test]
    fn test_load_mom_absent_version() {
        let system = TestSystem::with_editor_catalog();
        assert!(system.store().load_mom(9999, false).is_none());
    }

    #[test]
    fn test_load_submanifests_skips_unknown_subscription() {
        let system = TestSystem::with_editor_catalog();
        let store = system.store();
        let mom = store.load_mom(system.version, false).unwrap();
        let subs = Subscriptions::from_names(["vim", "ghost"]);
        let loaded = store.load_submanifests(&mom, &subs).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].component, "vim");
    }

    #[test]
    fn test_load_submanifests_fails_for_broken_manifest() {
        let system = TestSystem::with_editor_catalog();
        std::fs::write(system.manifest_path("editors"), "component: [").unwrap();
        let store = system.store();
        let mom = store.load_mom(system.version, false).unwrap();
        let subs = Subscriptions::from_names(["vim", "editors"]);
        let err = store.load_submanifests(&mom, &subs).unwrap_err();
        assert!(matches!(err, BundleError::RecurseManifestFailed { .. }));
    }

    #[test]
    fn test_load_manifest_reports_missing_file() {
        let system = TestSystem::with_editor_catalog();
        std::fs::remove_file(system.manifest_path("vim")).unwrap();
        let store = system.store();
        let mom = store.load_mom(system.version, false).unwrap();
        let err = store
            .load_manifest(system.version, mom.find_bundle("vim").unwrap(), &mom)
            .unwrap_err();
        assert!(matches!(err, BundleError::CouldntLoadManifest { .. }));
    }
}
