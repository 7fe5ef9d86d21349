//! Test fixtures shared by the unit tests
//!
//! [`TestSystem`] is a throwaway target root with a state directory and a
//! local content directory publishing version 10. [`MemoryCatalog`] is an
//! in-memory catalog for resolver tests that never touch disk.
//!
//! ```ignore
//! let system = TestSystem::with_editor_catalog();
//! let owned = system.system_services();
//! let services = owned.services();
//! ```

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tempfile::TempDir;

use crate::config::StateLayout;
use crate::config::layout::blob_name;
use crate::delivery::LocalContentFetcher;
use crate::domain::{FileEntry, MOM_COMPONENT, Manifest, Version};
use crate::error::{Result, manifest};
use crate::hash;
use crate::operations::context::SystemServices;
use crate::staging::SystemFilesystem;
use crate::store::{LocalManifestStore, ManifestStore};
use crate::tracking::Inventory;

/// Version published by every fixture
pub const FIXTURE_VERSION: Version = 10;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// One file published by [`TestSystem::publish`]
pub enum Content<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
}

/// A target root, state directory and content directory in a temp dir
pub struct TestSystem {
    _temp: TempDir,
    pub layout: StateLayout,
    pub content_dir: PathBuf,
    pub version: Version,
}

impl TestSystem {
    /// Empty system at [`FIXTURE_VERSION`] with an empty MoM published
    pub fn new() -> Self {
        let temp = create_temp_dir();
        let layout = StateLayout::new(temp.path().join("root"), temp.path().join("state"));
        let content_dir = temp.path().join("content");
        let system = Self {
            _temp: temp,
            layout,
            content_dir,
            version: FIXTURE_VERSION,
        };

        let os_release = system.layout.os_release();
        std::fs::create_dir_all(os_release.parent().unwrap()).unwrap();
        std::fs::write(
            &os_release,
            format!("NAME=\"Test OS\"\nVERSION_ID={}\n", system.version),
        )
        .unwrap();
        std::fs::create_dir_all(system.version_dir().join("files")).unwrap();
        system.write_manifest(&Manifest::new(MOM_COMPONENT, system.version));
        system
    }

    /// System publishing `os-core`, `editors` and `vim`.
    ///
    /// `vim` includes `editors`, `editors` includes `os-core`. `vim` and
    /// `editors` share `/usr/share/doc/editing.txt`.
    pub fn with_editor_catalog() -> Self {
        let system = Self::new();
        system.publish(
            "os-core",
            &[],
            &[],
            &[
                Content::Dir("/usr/bin"),
                Content::File("/usr/bin/sh", b"#!/bin/sh shell\n"),
            ],
        );
        system.publish(
            "editors",
            &["os-core"],
            &[],
            &[
                Content::Dir("/usr/share/editors"),
                Content::File("/usr/share/editors/README", b"editors\n"),
                Content::File("/usr/share/doc/editing.txt", b"shared notes\n"),
            ],
        );
        system.publish(
            "vim",
            &["editors"],
            &[],
            &[
                Content::File("/usr/bin/vim", b"vim binary\n"),
                Content::Dir("/usr/share/vim"),
                Content::File("/usr/share/vim/vimrc", b"set nocompatible\n"),
                Content::File("/usr/share/doc/editing.txt", b"shared notes\n"),
            ],
        );
        system
    }

    fn version_dir(&self) -> PathBuf {
        self.content_dir.join(self.version.to_string())
    }

    fn write_manifest(&self, manifest: &Manifest) {
        std::fs::write(
            self.manifest_path(&manifest.component),
            manifest.to_yaml().unwrap(),
        )
        .unwrap();
    }

    /// Publish a bundle at the fixture version and list it in the MoM.
    ///
    /// The bundle's `/usr/share/bundles/<name>` marker is added to its files.
    pub fn publish(&self, name: &str, includes: &[&str], optional: &[&str], content: &[Content<'_>]) {
        let mut bundle = Manifest::new(name, self.version);
        bundle.includes = includes.iter().map(|s| (*s).to_string()).collect();
        bundle.optional = optional.iter().map(|s| (*s).to_string()).collect();

        for item in content {
            let entry = self.publish_entry(item, &mut bundle);
            bundle.files.push(entry);
        }
        let marker = format!("/usr/share/bundles/{name}");
        let entry = self.publish_entry(&Content::File(&marker, b""), &mut bundle);
        bundle.files.push(entry);
        self.write_manifest(&bundle);

        let mut mom = self.mom();
        mom.files.retain(|f| f.filename != name);
        mom.files.push(FileEntry {
            filename: name.to_string(),
            last_change: self.version,
            ..FileEntry::default()
        });
        self.write_manifest(&mom);
    }

    fn publish_entry(&self, item: &Content<'_>, bundle: &mut Manifest) -> FileEntry {
        match item {
            Content::Dir(path) => FileEntry {
                filename: (*path).to_string(),
                is_dir: true,
                last_change: self.version,
                ..FileEntry::default()
            },
            Content::File(path, data) => {
                let hash = hash::hash_bytes(data);
                std::fs::write(
                    self.version_dir().join("files").join(blob_name(&hash)),
                    data,
                )
                .unwrap();
                bundle.content_size += data.len() as u64;
                FileEntry {
                    filename: (*path).to_string(),
                    hash,
                    last_change: self.version,
                    ..FileEntry::default()
                }
            }
        }
    }

    /// Copy a published bundle's blobs into its pack directory
    pub fn publish_pack(&self, name: &str) {
        let pack = self.version_dir().join("packs").join(name);
        std::fs::create_dir_all(&pack).unwrap();
        for file in self.manifest(name).files.iter().filter(|f| !f.is_dir) {
            let blob = blob_name(&file.hash);
            std::fs::copy(self.version_dir().join("files").join(&blob), pack.join(&blob)).unwrap();
        }
    }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.version_dir().join(format!("Manifest.{name}"))
    }

    pub fn manifest(&self, name: &str) -> Manifest {
        Manifest::from_yaml(&std::fs::read_to_string(self.manifest_path(name)).unwrap()).unwrap()
    }

    pub fn mom(&self) -> Manifest {
        self.manifest(MOM_COMPONENT)
    }

    /// Drop the marker of an installed bundle
    pub fn mark_installed(&self, name: &str) {
        let dir = self.layout.system_bundles_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), "").unwrap();
    }

    /// Path of `path` under the target root
    pub fn target(&self, path: &str) -> PathBuf {
        self.layout.prefix.join(path.trim_start_matches('/'))
    }

    pub fn store(&self) -> LocalManifestStore {
        LocalManifestStore::new(self.layout.clone(), &self.content_dir)
    }

    pub fn fetcher(&self) -> LocalContentFetcher {
        LocalContentFetcher::new(self.layout.clone(), &self.content_dir)
    }

    pub fn filesystem(&self) -> SystemFilesystem {
        SystemFilesystem::new(self.layout.clone())
    }

    /// Real collaborators over this system, printing nothing
    pub fn system_services(&self) -> SystemServices {
        let mut services = SystemServices::for_layout(self.layout.clone(), &self.content_dir);
        services.console = crate::ui::Console::new(true);
        services
    }
}

/// In-memory catalog and inventory counting manifest loads
pub struct MemoryCatalog {
    pub mom: Manifest,
    manifests: BTreeMap<String, Manifest>,
    installed: BTreeSet<String>,
    broken: BTreeSet<String>,
    loads: Cell<usize>,
}

impl MemoryCatalog {
    pub fn new(version: Version) -> Self {
        Self {
            mom: Manifest::new(MOM_COMPONENT, version),
            manifests: BTreeMap::new(),
            installed: BTreeSet::new(),
            broken: BTreeSet::new(),
            loads: Cell::new(0),
        }
    }

    /// Add a bundle to the catalog
    pub fn bundle(&mut self, name: &str, includes: &[&str], optional: &[&str]) {
        let version = self.mom.version;
        let mut bundle = Manifest::new(name, version);
        bundle.includes = includes.iter().map(|s| (*s).to_string()).collect();
        bundle.optional = optional.iter().map(|s| (*s).to_string()).collect();
        self.manifests.insert(name.to_string(), bundle);

        self.mom.files.retain(|f| f.filename != name);
        self.mom.files.push(FileEntry {
            filename: name.to_string(),
            last_change: version,
            ..FileEntry::default()
        });
    }

    pub fn install(&mut self, name: &str) {
        self.installed.insert(name.to_string());
    }

    /// Make loading `name` fail
    pub fn break_manifest(&mut self, name: &str) {
        self.broken.insert(name.to_string());
    }

    /// Manifest loads so far
    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

impl ManifestStore for MemoryCatalog {
    fn current_version(&self) -> Result<Version> {
        Ok(self.mom.version)
    }

    fn load_mom(&self, version: Version, _mix: bool) -> Option<Manifest> {
        (version == self.mom.version).then(|| self.mom.clone())
    }

    fn load_manifest(
        &self,
        version: Version,
        descriptor: &FileEntry,
        _mom: &Manifest,
    ) -> Result<Manifest> {
        self.loads.set(self.loads.get() + 1);
        let name = &descriptor.filename;
        if self.broken.contains(name) {
            return Err(manifest::load_failed(name, version, "corrupt manifest"));
        }
        self.manifests
            .get(name)
            .cloned()
            .ok_or_else(|| manifest::load_failed(name, version, "not published"))
    }
}

impl Inventory for MemoryCatalog {
    fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(name)
    }

    fn installed(&self) -> Vec<String> {
        self.installed.iter().cloned().collect()
    }
}
