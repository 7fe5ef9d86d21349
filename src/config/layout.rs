//! On-disk layout of one target system
//!
//! Path constants are relative to the target root (`--path`) unless they live
//! in the state directory.

use std::path::{Path, PathBuf};

/// System bundle markers shipped by every bundle's content
pub const SYSTEM_BUNDLES_DIR: &str = "usr/share/bundles";

/// Post-update hooks, run after files are committed
pub const HOOKS_DIR: &str = "usr/libexec/bundlectl/post-update.d";

pub const OS_RELEASE: &str = "usr/lib/os-release";

/// Marker present when the system runs mixed (locally built) content
pub const MIX_MARKER: &str = "usr/share/bundlectl/mixed";

pub const USER_ALIAS_DIR: &str = "etc/bundlectl/alias.d";
pub const SYSTEM_ALIAS_DIR: &str = "usr/share/defaults/bundlectl/alias.d";

/// Tracking markers (state directory)
pub const TRACKING_DIR: &str = "bundles";

/// Staged content blobs keyed by hash (state directory)
pub const STAGED_DIR: &str = "staged";

/// Pending rename journal (state directory)
pub const JOURNAL_FILE: &str = "pending-renames.json";

/// Paths of one target root and its state directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    pub prefix: PathBuf,
    pub state_dir: PathBuf,
}

impl StateLayout {
    pub fn new(prefix: impl Into<PathBuf>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            state_dir: state_dir.into(),
        }
    }

    pub fn system_bundles_dir(&self) -> PathBuf {
        self.prefix.join(SYSTEM_BUNDLES_DIR)
    }

    pub fn tracking_dir(&self) -> PathBuf {
        self.state_dir.join(TRACKING_DIR)
    }

    pub fn staged_dir(&self) -> PathBuf {
        self.state_dir.join(STAGED_DIR)
    }

    pub fn staged_blob(&self, hash: &str) -> PathBuf {
        self.staged_dir().join(blob_name(hash))
    }

    pub fn journal_path(&self) -> PathBuf {
        self.state_dir.join(JOURNAL_FILE)
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.prefix.join(HOOKS_DIR)
    }

    pub fn os_release(&self) -> PathBuf {
        self.prefix.join(OS_RELEASE)
    }

    pub fn mix_marker(&self) -> PathBuf {
        self.prefix.join(MIX_MARKER)
    }

    /// Alias directories, lowest precedence first
    pub fn alias_dirs(&self) -> [PathBuf; 2] {
        [
            self.prefix.join(SYSTEM_ALIAS_DIR),
            self.prefix.join(USER_ALIAS_DIR),
        ]
    }

    /// Mount point used for the disk space check
    pub fn usr_dir(&self) -> PathBuf {
        self.prefix.join("usr")
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }
}

/// File name for a content hash (the `blake3:` scheme prefix is dropped)
pub fn blob_name(hash: &str) -> String {
    hash.rsplit(':').next().unwrap_or(hash).to_string()
}
