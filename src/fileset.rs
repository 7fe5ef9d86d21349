//! File sets across bundle manifests
//!
//! Sets hold references into the manifests they were built from, sorted by
//! filename. A filename appears at most once; the first manifest listing it
//! wins, except that a live entry replaces a tombstone.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{FileEntry, Manifest};

/// Union of the file entries of `manifests`, sorted by filename
pub fn consolidate<'a, I>(manifests: I) -> Vec<&'a FileEntry>
where
    I: IntoIterator<Item = &'a Manifest>,
{
    let mut files: BTreeMap<&str, &FileEntry> = BTreeMap::new();
    for manifest in manifests {
        for file in &manifest.files {
            files
                .entry(file.filename.as_str())
                .and_modify(|kept| {
                    if kept.is_deleted && !file.is_deleted {
                        *kept = file;
                    }
                })
                .or_insert(file);
        }
    }
    files.into_values().collect()
}

/// Remove tombstoned entries
pub fn drop_deleted(files: Vec<&FileEntry>) -> Vec<&FileEntry> {
    files.into_iter().filter(|f| !f.is_deleted).collect()
}

/// Remove candidates already present, not deleted, in `installed`
pub fn drop_satisfied<'a>(
    candidates: Vec<&'a FileEntry>,
    installed: &[&FileEntry],
) -> Vec<&'a FileEntry> {
    let present: HashMap<&str, &FileEntry> = installed
        .iter()
        .filter(|f| !f.is_deleted)
        .map(|f| (f.filename.as_str(), *f))
        .collect();
    candidates
        .into_iter()
        .filter(|f| !present.contains_key(f.filename.as_str()))
        .collect()
}

/// Entries of `to_remove` that may be deleted from disk.
///
/// A file stays when a remaining bundle still ships it; a remaining entry that
/// is itself a tombstone does not keep it. Tombstones in `to_remove` have
/// nothing on disk and are dropped.
pub fn filter_removable<'a>(
    to_remove: Vec<&'a FileEntry>,
    remaining: &[&FileEntry],
) -> Vec<&'a FileEntry> {
    let kept: HashMap<&str, bool> = remaining
        .iter()
        .map(|f| (f.filename.as_str(), f.is_deleted))
        .collect();
    to_remove
        .into_iter()
        .filter(|f| !f.is_deleted)
        .filter(|f| kept.get(f.filename.as_str()).is_none_or(|deleted| *deleted))
        .collect()
}
