//! Error types and handling for bundlectl
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every error maps onto exactly one public [`ResultCode`], which is what the
//! process exits with. Sub-modules hold small constructors per error area:
//! - [`bundle`]: per-bundle request errors
//! - [`manifest`]: catalog and manifest loading errors
//! - [`fs`]: disk, staging and file system errors

pub mod bundle;
pub mod fs;
pub mod manifest;

use miette::Diagnostic;
use thiserror::Error;

/// Closed set of result codes reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Ok = 0,
    CurrentVersionUnknown = 1,
    CouldntLoadMom = 2,
    CouldntLoadManifest = 3,
    InvalidBundle = 4,
    BundleNotTracked = 5,
    RequiredBundleError = 6,
    RecurseManifestFailed = 7,
    DiskSpaceError = 8,
    CouldntRemoveFile = 9,
    UnexpectedCondition = 10,
}

impl ResultCode {
    /// Process exit status for this code
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::CurrentVersionUnknown => "CURRENT_VERSION_UNKNOWN",
            ResultCode::CouldntLoadMom => "COULDNT_LOAD_MOM",
            ResultCode::CouldntLoadManifest => "COULDNT_LOAD_MANIFEST",
            ResultCode::InvalidBundle => "INVALID_BUNDLE",
            ResultCode::BundleNotTracked => "BUNDLE_NOT_TRACKED",
            ResultCode::RequiredBundleError => "REQUIRED_BUNDLE_ERROR",
            ResultCode::RecurseManifestFailed => "RECURSE_MANIFEST_FAILED",
            ResultCode::DiskSpaceError => "DISK_SPACE_ERROR",
            ResultCode::CouldntRemoveFile => "COULDNT_REMOVE_FILE",
            ResultCode::UnexpectedCondition => "UNEXPECTED_CONDITION",
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for bundlectl operations
#[derive(Error, Diagnostic, Debug)]
pub enum BundleError {
    // Environment errors
    #[error("Unable to determine current OS version")]
    #[diagnostic(
        code(bundlectl::env::version_unknown),
        help("Check that <prefix>/usr/lib/os-release contains a numeric VERSION_ID")
    )]
    CurrentVersionUnknown,

    #[error("Cannot load official manifest MoM for version {version}")]
    #[diagnostic(code(bundlectl::manifest::mom))]
    CouldntLoadMom { version: u32 },

    // Manifest errors
    #[error("Unable to load manifest {bundle} version {version}: {reason}")]
    #[diagnostic(code(bundlectl::manifest::load_failed))]
    CouldntLoadManifest {
        bundle: String,
        version: u32,
        reason: String,
    },

    #[error("Cannot load bundle manifests: {reason}")]
    #[diagnostic(code(bundlectl::manifest::recurse_failed))]
    RecurseManifestFailed { reason: String },

    // Bundle request errors
    #[error("Bundle \"{name}\" is invalid")]
    #[diagnostic(
        code(bundlectl::bundle::invalid),
        help("Run 'bundlectl bundle-list --all' to see the available bundles")
    )]
    InvalidBundle { name: String },

    #[error("Bundle \"{name}\" is not installed")]
    #[diagnostic(code(bundlectl::bundle::not_tracked))]
    BundleNotTracked { name: String },

    #[error("Bundle \"{name}\" is required by {count} bundle(s)")]
    #[diagnostic(
        code(bundlectl::bundle::required),
        help("Use --force to remove the bundle and every bundle that requires it")
    )]
    RequiredBundle { name: String, count: usize },

    #[error("Bundle \"{name}\" not allowed to be removed")]
    #[diagnostic(code(bundlectl::bundle::protected))]
    ProtectedBundle { name: String },

    // Resource errors
    #[error("Not enough disk space: {required} bytes required, {available} bytes available")]
    #[diagnostic(
        code(bundlectl::fs::disk_space),
        help("To skip this error and install anyway, add --skip-diskspace-check")
    )]
    DiskSpace { required: u64, available: u64 },

    #[error("Unable to determine free space on {path}")]
    #[diagnostic(
        code(bundlectl::fs::disk_space_unknown),
        help("To skip this error and install anyway, add --skip-diskspace-check")
    )]
    DiskSpaceUnknown { path: String },

    #[error("Could not remove file {path}: {reason}")]
    #[diagnostic(code(bundlectl::fs::remove_failed))]
    CouldntRemoveFile { path: String, reason: String },

    #[error("Could not download some files: {reason}")]
    #[diagnostic(code(bundlectl::delivery::fetch_failed))]
    FetchFailed { reason: String },

    #[error("Failed to stage {path}: {reason}")]
    #[diagnostic(code(bundlectl::fs::staging_failed))]
    StagingFailed { path: String, reason: String },

    #[error("Failed to rename {path} to its final name: {reason}")]
    #[diagnostic(code(bundlectl::fs::rename_failed))]
    RenameFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(bundlectl::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bundlectl::fs::io_error))]
    IoError { message: String },
}

impl BundleError {
    /// Translate into the public result code
    pub fn result_code(&self) -> ResultCode {
        match self {
            BundleError::CurrentVersionUnknown => ResultCode::CurrentVersionUnknown,
            BundleError::CouldntLoadMom { .. } => ResultCode::CouldntLoadMom,
            BundleError::CouldntLoadManifest { .. } => ResultCode::CouldntLoadManifest,
            BundleError::RecurseManifestFailed { .. } => ResultCode::RecurseManifestFailed,
            BundleError::InvalidBundle { .. } => ResultCode::InvalidBundle,
            BundleError::BundleNotTracked { .. } => ResultCode::BundleNotTracked,
            BundleError::RequiredBundle { .. } | BundleError::ProtectedBundle { .. } => {
                ResultCode::RequiredBundleError
            }
            BundleError::DiskSpace { .. } | BundleError::DiskSpaceUnknown { .. } => {
                ResultCode::DiskSpaceError
            }
            BundleError::CouldntRemoveFile { .. } => ResultCode::CouldntRemoveFile,
            BundleError::FetchFailed { .. }
            | BundleError::StagingFailed { .. }
            | BundleError::RenameFailed { .. }
            | BundleError::ConfigParseFailed { .. }
            | BundleError::IoError { .. } => ResultCode::UnexpectedCondition,
        }
    }
}

impl From<std::io::Error> for BundleError {
    fn from(err: std::io::Error) -> Self {
        BundleError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BundleError {
    fn from(err: serde_yaml::Error) -> Self {
        BundleError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        BundleError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BundleError>;
