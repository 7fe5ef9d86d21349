//! Catalog and manifest loading errors

use super::BundleError;

/// Creates a MoM load error
pub fn mom_unavailable(version: u32) -> BundleError {
    BundleError::CouldntLoadMom { version }
}

/// Creates a manifest load error
pub fn load_failed(
    bundle: impl Into<String>,
    version: u32,
    reason: impl std::fmt::Display,
) -> BundleError {
    BundleError::CouldntLoadManifest {
        bundle: bundle.into(),
        version,
        reason: reason.to_string(),
    }
}

/// Creates an error for a set of sub-manifests that could not be loaded
pub fn recurse_failed(reason: impl std::fmt::Display) -> BundleError {
    BundleError::RecurseManifestFailed {
        reason: reason.to_string(),
    }
}
