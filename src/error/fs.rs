//! Disk, staging and file system errors

use std::path::Path;

use super::BundleError;

/// Creates an insufficient disk space error
pub fn disk_space(required: u64, available: u64) -> BundleError {
    BundleError::DiskSpace {
        required,
        available,
    }
}

/// Creates an error for free space that could not be measured
pub fn disk_space_unknown(path: impl AsRef<Path>) -> BundleError {
    BundleError::DiskSpaceUnknown {
        path: path.as_ref().display().to_string(),
    }
}

/// Creates a content fetch error
pub fn fetch_failed(reason: impl std::fmt::Display) -> BundleError {
    BundleError::FetchFailed {
        reason: reason.to_string(),
    }
}

/// Creates a staging error
pub fn staging_failed(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> BundleError {
    BundleError::StagingFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a rename error
pub fn rename_failed(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> BundleError {
    BundleError::RenameFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a remove error
pub fn remove_failed(path: impl AsRef<Path>, reason: impl std::fmt::Display) -> BundleError {
    BundleError::CouldntRemoveFile {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a generic IO error with context
pub fn io_error(message: impl Into<String>) -> BundleError {
    BundleError::IoError {
        message: message.into(),
    }
}
