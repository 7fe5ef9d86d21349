//! File system primitives for materializing and deleting bundle content
//!
//! Files are written in two phases. [`Filesystem::stage`] copies a fetched
//! blob next to its destination under a `.update.` name, then
//! [`Filesystem::commit_rename`] moves it into place. A crash between the two
//! leaves only staged names behind, never a half-written destination.

pub mod heuristics;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use sysinfo::Disks;
use tracing::{debug, warn};

use crate::config::StateLayout;
use crate::domain::FileEntry;
use crate::error::{Result, fs};
use crate::hash;

/// File system operations used by install and remove
pub trait Filesystem {
    /// Location of the fetched blob for a content hash
    fn staged_blob(&self, hash: &str) -> PathBuf;

    /// Whether the fetched blob for `file` exists and matches its hash
    fn verify_hash(&self, file: &FileEntry) -> bool;

    /// Drop the fetched blob for `file` so it is fetched again
    fn discard(&self, file: &FileEntry);

    /// Place `file` under its staged name (directories under their final name)
    fn stage(&self, file: &FileEntry) -> Result<()>;

    /// Rename a staged file to its final name
    fn commit_rename(&self, file: &FileEntry) -> Result<()>;

    /// Delete files, then directories left empty; returns how many were deleted
    fn delete_files(&self, files: &[&FileEntry]) -> usize;

    /// Free bytes on the file system holding `path`
    fn available_space(&self, path: &Path) -> Option<u64>;

    /// Flush directories written since the last sync
    fn sync(&self);
}

/// [`Filesystem`] over the real target root
#[derive(Debug)]
pub struct SystemFilesystem {
    layout: StateLayout,
    touched: RefCell<BTreeSet<PathBuf>>,
}

impl SystemFilesystem {
    pub fn new(layout: StateLayout) -> Self {
        Self {
            layout,
            touched: RefCell::new(BTreeSet::new()),
        }
    }

    fn touch(&self, dir: &Path) {
        self.touched.borrow_mut().insert(dir.to_path_buf());
    }

    fn ensure_parent(&self, target: &Path) -> Result<()> {
        let parent = target
            .parent()
            .ok_or_else(|| fs::staging_failed(target, "no parent directory"))?;
        if parent.exists() && !parent.is_dir() {
            return Err(fs::staging_failed(parent, "parent is not a directory"));
        }
        std::fs::create_dir_all(parent).map_err(|e| fs::staging_failed(parent, e))?;
        self.touch(parent);
        Ok(())
    }

    fn stage_dir(&self, target: &Path) -> Result<()> {
        if let Ok(meta) = std::fs::symlink_metadata(target) {
            if meta.is_dir() {
                return Ok(());
            }
            debug!("Replacing {} with a directory", target.display());
            std::fs::remove_file(target).map_err(|e| fs::staging_failed(target, e))?;
        }
        self.ensure_parent(target)?;
        std::fs::create_dir_all(target).map_err(|e| fs::staging_failed(target, e))
    }
}

fn remove_any(path: &Path) -> std::io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

impl Filesystem for SystemFilesystem {
    fn staged_blob(&self, hash: &str) -> PathBuf {
        self.layout.staged_blob(hash)
    }

    fn verify_hash(&self, file: &FileEntry) -> bool {
        file.is_dir || hash::file_matches(&self.staged_blob(&file.hash), &file.hash)
    }

    fn discard(&self, file: &FileEntry) {
        let blob = self.staged_blob(&file.hash);
        if let Err(e) = std::fs::remove_file(&blob) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not discard {}: {}", blob.display(), e);
            }
        }
    }

    fn stage(&self, file: &FileEntry) -> Result<()> {
        if !file.is_confined() {
            return Err(fs::staging_failed(&file.filename, "path leaves the target root"));
        }
        let prefix = self.layout.prefix();
        let target = file.target_path(prefix);
        let Some(staged) = file.staged_name(prefix) else {
            return self.stage_dir(&target);
        };

        let blob = self.staged_blob(&file.hash);
        if !blob.is_file() {
            return Err(fs::staging_failed(&target, "content was not fetched"));
        }
        self.ensure_parent(&target)?;

        if std::fs::symlink_metadata(&staged).is_ok() {
            remove_any(&staged).map_err(|e| fs::staging_failed(&staged, e))?;
        }
        if target.is_dir() && !target.is_symlink() {
            debug!("Replacing directory {} with a file", target.display());
            std::fs::remove_dir_all(&target).map_err(|e| fs::staging_failed(&target, e))?;
        }

        std::fs::copy(&blob, &staged).map_err(|e| fs::staging_failed(&staged, e))?;
        Ok(())
    }

    fn commit_rename(&self, file: &FileEntry) -> Result<()> {
        if !file.is_confined() {
            return Err(fs::staging_failed(&file.filename, "path leaves the target root"));
        }
        let prefix = self.layout.prefix();
        let Some(staged) = file.staged_name(prefix) else {
            return Ok(());
        };
        let target = file.target_path(prefix);
        std::fs::rename(&staged, &target).map_err(|e| fs::rename_failed(&staged, e))
    }

    fn delete_files(&self, files: &[&FileEntry]) -> usize {
        let prefix = self.layout.prefix();
        let mut deleted = 0;
        let mut dirs = Vec::new();

        for file in files {
            if !file.is_confined() {
                warn!("Not deleting {}: path leaves the target root", file.filename);
                continue;
            }
            let target = file.target_path(prefix);
            if file.is_dir {
                dirs.push(target);
                continue;
            }
            match std::fs::remove_file(&target) {
                Ok(()) => {
                    deleted += 1;
                    if let Some(parent) = target.parent() {
                        self.touch(parent);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("{}", fs::remove_failed(&target, e)),
            }
        }

        // Deepest first so parents empty out after their children
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        for dir in dirs {
            match std::fs::remove_dir(&dir) {
                Ok(()) => deleted += 1,
                Err(e) => debug!("Keeping directory {}: {}", dir.display(), e),
            }
        }

        deleted
    }

    fn available_space(&self, path: &Path) -> Option<u64> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let disks = Disks::new_with_refreshed_list();
        disks
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().components().count())
            .map(sysinfo::Disk::available_space)
    }

    fn sync(&self) {
        let dirs = std::mem::take(&mut *self.touched.borrow_mut());
        for dir in dirs {
            if let Err(e) = std::fs::File::open(&dir).and_then(|d| d.sync_all()) {
                debug!("Could not sync {}: {}", dir.display(), e);
            }
        }
    }
}
