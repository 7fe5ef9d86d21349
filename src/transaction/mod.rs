//! Pending rename journal
//!
//! Installing commits staged files in a second pass of renames. Before that
//! pass starts, the list of files about to be renamed is written to the state
//! directory; it is cleared once every rename and the sync are done. A journal
//! found at startup means an earlier run stopped half way, and the renames it
//! lists are finished before anything else happens.
//!
//! ## Usage
//!
//! ```ignore
//! let journal = RenameJournal::new(&layout);
//! journal.recover();
//!
//! journal.record(&staged)?;
//! // rename every staged file...
//! journal.clear();
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StateLayout;
use crate::domain::FileEntry;
use crate::error::{Result, fs};

/// On-disk journal contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct JournalRecord {
    /// Target filenames whose staged copy is waiting to be renamed
    renames: Vec<String>,
}

/// Journal of staged files awaiting their final rename
#[derive(Debug, Clone)]
pub struct RenameJournal {
    path: PathBuf,
    prefix: PathBuf,
}

impl RenameJournal {
    pub fn new(layout: &StateLayout) -> Self {
        Self {
            path: layout.journal_path(),
            prefix: layout.prefix.clone(),
        }
    }

    /// Persist the files about to be renamed, replacing any previous journal
    pub fn record(&self, files: &[&FileEntry]) -> Result<()> {
        let record = JournalRecord {
            renames: files
                .iter()
                .filter(|f| !f.is_dir)
                .map(|f| f.filename.clone())
                .collect(),
        };

        let dir = self
            .path
            .parent()
            .ok_or_else(|| fs::io_error("journal path has no parent directory"))?;
        std::fs::create_dir_all(dir)?;

        // Write to a sibling temp file and rename so a crash never leaves half a journal
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &record)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| fs::io_error(format!("Failed to write {}: {}", self.path.display(), e)))?;

        debug!("Journaled {} pending rename(s)", record.renames.len());
        Ok(())
    }

    /// Forget the journal once all renames are committed
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not clear {}: {}", self.path.display(), e);
            }
        }
    }

    /// Filenames listed by a journal left behind, if any
    pub fn pending(&self) -> Result<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let record: JournalRecord = serde_json::from_str(&content)?;
                Ok(record.renames)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Finish the renames of an interrupted run, then clear the journal.
    ///
    /// Returns how many files were moved into place. Entries whose staged
    /// copy is gone were already committed.
    pub fn recover(&self) -> usize {
        let pending = match self.pending() {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Discarding unreadable journal {}: {}", self.path.display(), e);
                self.clear();
                return 0;
            }
        };
        if pending.is_empty() {
            return 0;
        }

        let mut recovered = 0;
        for filename in &pending {
            let entry = FileEntry {
                filename: filename.clone(),
                ..FileEntry::default()
            };
            if !entry.is_confined() {
                warn!("Skipping journal entry {}: path leaves the target root", filename);
                continue;
            }
            let Some(staged) = entry.staged_name(&self.prefix) else {
                continue;
            };
            if !staged.exists() {
                continue;
            }
            let target = entry.target_path(&self.prefix);
            match std::fs::rename(&staged, &target) {
                Ok(()) => recovered += 1,
                Err(e) => warn!("{}", fs::rename_failed(&staged, e)),
            }
        }

        info!(
            "Completed {} rename(s) left by an interrupted run",
            recovered
        );
        self.clear();
        recovered
    }
}
