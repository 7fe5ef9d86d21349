//! Manifest domain types
//!
//! A [`Manifest`] is the version-scoped record of one bundle: its files and
//! the bundles it includes. The MoM ("manifest of manifests") reuses the same
//! shape; its file entries are bundle descriptors whose `last_change` is the
//! version of that bundle's manifest.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Content version number
pub type Version = u32;

/// Component name of the catalog manifest
pub const MOM_COMPONENT: &str = "MoM";

/// The base bundle, never a target of removal
pub const BASE_BUNDLE: &str = "os-core";

/// Prefix given to a file staged next to its final location
pub const STAGED_PREFIX: &str = ".update.";

/// One file (or bundle descriptor) listed in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileEntry {
    /// Absolute path inside the target root; unique within a manifest
    pub filename: String,

    /// Content hash of the file
    #[serde(default)]
    pub hash: String,

    /// Version in which this entry last changed
    #[serde(default)]
    pub last_change: Version,

    #[serde(default, rename = "deleted")]
    pub is_deleted: bool,

    #[serde(default, rename = "directory")]
    pub is_dir: bool,

    #[serde(default)]
    pub do_not_update: bool,

    #[serde(default, rename = "experimental")]
    pub is_experimental: bool,
}

impl FileEntry {
    /// Whether the filename names something strictly inside the target root.
    ///
    /// `..` components and an empty or root-only name are refused.
    pub fn is_confined(&self) -> bool {
        let mut named = false;
        for component in Path::new(&self.filename).components() {
            match component {
                Component::Normal(_) => named = true,
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => return false,
            }
        }
        named
    }

    /// Path of this entry under the target root.
    ///
    /// Only meaningful for entries that are [`is_confined`](Self::is_confined).
    pub fn target_path(&self, prefix: &Path) -> PathBuf {
        prefix.join(self.filename.trim_start_matches('/'))
    }

    /// Name under which the file is staged before its final rename.
    ///
    /// Directories are staged under their final name, so they have none.
    pub fn staged_name(&self, prefix: &Path) -> Option<PathBuf> {
        if self.is_dir {
            return None;
        }
        let target = self.target_path(prefix);
        let base = target.file_name()?.to_string_lossy().into_owned();
        Some(target.with_file_name(format!("{STAGED_PREFIX}{base}")))
    }
}

/// A loaded manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// Bundle name (or `MoM` for the catalog)
    pub component: String,

    pub version: Version,

    /// Declared size of the bundle content in bytes
    #[serde(default, rename = "contentsize")]
    pub content_size: u64,

    #[serde(default)]
    pub files: Vec<FileEntry>,

    /// Required includes
    #[serde(default)]
    pub includes: Vec<String>,

    /// Optional includes
    #[serde(default)]
    pub optional: Vec<String>,
}

impl Manifest {
    pub fn new(component: impl Into<String>, version: Version) -> Self {
        Self {
            component: component.into(),
            version,
            ..Self::default()
        }
    }

    /// Parse a manifest document from YAML
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> crate::error::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Look up a bundle descriptor in a MoM
    pub fn find_bundle(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.filename == name)
    }

    /// Whether this manifest lists `name` as a required include
    pub fn includes_bundle(&self, name: &str) -> bool {
        self.includes.iter().any(|i| i == name)
    }

    /// Bundle names listed by a MoM, sorted
    pub fn bundle_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.iter().map(|f| f.filename.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Move the manifest named `name` from one list to another.
///
/// Returns false when `from` holds no such manifest.
pub fn move_manifest(name: &str, from: &mut Vec<Manifest>, to: &mut Vec<Manifest>) -> bool {
    match from.iter().position(|m| m.component == name) {
        Some(pos) => {
            to.push(from.remove(pos));
            true
        }
        None => false,
    }
}

/// Display name for a bundle, marking experimental ones
pub fn printable_bundle_name(name: &str, experimental: bool) -> String {
    if experimental {
        format!("{name} (experimental)")
    } else {
        name.to_string()
    }
}
