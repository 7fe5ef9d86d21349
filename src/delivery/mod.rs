//! Content delivery
//!
//! A [`ContentFetcher`] brings file contents into the staged blob directory,
//! either as whole-bundle packs or one full file at a time.
//! [`LocalContentFetcher`] copies from a content directory:
//!
//! ```text
//! <content>/<version>/packs/<bundle>/<blob>   (pack for a bundle)
//! <content>/<version>/files/<blob>            (full file)
//! ```
//!
//! Blobs are named by content hash without the hash scheme.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::StateLayout;
use crate::config::layout::blob_name;
use crate::domain::{FileEntry, Manifest, Subscriptions, Version};
use crate::error::{Result, fs};
use crate::store::MIX_DIR;

const PACKS_DIR: &str = "packs";
const FILES_DIR: &str = "files";

/// Fetches content into the staged blob directory
pub trait ContentFetcher {
    /// Fetch the pack of every subscription at its pinned version.
    ///
    /// Missing packs are not an error; their files are fetched individually.
    fn fetch_packs(&self, subs: &Subscriptions, mom: &Manifest) -> Result<()>;

    /// Fetch every listed file not already staged
    fn fetch_full_files(&self, files: &[&FileEntry]) -> Result<()>;

    /// Bytes moved so far by this fetcher
    fn bytes_transferred(&self) -> u64;
}

/// Fetcher copying from a local content directory
#[derive(Debug)]
pub struct LocalContentFetcher {
    layout: StateLayout,
    content_dir: PathBuf,
    transferred: Cell<u64>,
}

impl LocalContentFetcher {
    pub fn new(layout: StateLayout, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout,
            content_dir: content_dir.into(),
            transferred: Cell::new(0),
        }
    }

    /// Candidate source directories for a version, official content first
    fn version_dirs(&self, version: Version) -> [PathBuf; 2] {
        let version = version.to_string();
        [
            self.content_dir.join(&version),
            self.content_dir.join(MIX_DIR).join(&version),
        ]
    }

    fn copy_blob(&self, source: &Path, dest: &Path) -> Result<()> {
        let parent = dest
            .parent()
            .ok_or_else(|| fs::staging_failed(dest, "no parent directory"))?;
        std::fs::create_dir_all(parent).map_err(|e| fs::staging_failed(parent, e))?;
        let copied = std::fs::copy(source, dest)
            .map_err(|e| fs::fetch_failed(format!("{}: {}", source.display(), e)))?;
        self.transferred.set(self.transferred.get() + copied);
        trace!("Fetched {} ({} bytes)", source.display(), copied);
        Ok(())
    }

    fn fetch_pack(&self, bundle: &str, version: Version) -> Result<usize> {
        let Some(pack_dir) = self
            .version_dirs(version)
            .into_iter()
            .map(|dir| dir.join(PACKS_DIR).join(bundle))
            .find(|dir| dir.is_dir())
        else {
            debug!("No pack for {} at version {}", bundle, version);
            return Ok(0);
        };

        let mut fetched = 0;
        for entry in walkdir::WalkDir::new(&pack_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(fs::fetch_failed)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let dest = self.layout.staged_dir().join(entry.file_name());
            if dest.exists() {
                continue;
            }
            self.copy_blob(entry.path(), &dest)?;
            fetched += 1;
        }
        Ok(fetched)
    }
}

impl ContentFetcher for LocalContentFetcher {
    fn fetch_packs(&self, subs: &Subscriptions, mom: &Manifest) -> Result<()> {
        for sub in subs {
            let version = match sub.version {
                0 => mom
                    .find_bundle(&sub.component)
                    .map_or(mom.version, |d| d.last_change),
                v => v,
            };
            let fetched = self.fetch_pack(&sub.component, version)?;
            debug!("Pack {}: {} blob(s) staged", sub.component, fetched);
        }
        Ok(())
    }

    fn fetch_full_files(&self, files: &[&FileEntry]) -> Result<()> {
        for file in files {
            if file.is_deleted || file.is_dir {
                continue;
            }
            let dest = self.layout.staged_blob(&file.hash);
            if dest.exists() {
                continue;
            }
            let blob = blob_name(&file.hash);
            let source = self
                .version_dirs(file.last_change)
                .into_iter()
                .map(|dir| dir.join(FILES_DIR).join(&blob))
                .find(|p| p.is_file())
                .ok_or_else(|| {
                    fs::fetch_failed(format!(
                        "{} (version {}) is not available",
                        file.filename, file.last_change
                    ))
                })?;
            self.copy_blob(&source, &dest)?;
        }
        Ok(())
    }

    fn bytes_transferred(&self) -> u64 {
        self.transferred.get()
    }
}
