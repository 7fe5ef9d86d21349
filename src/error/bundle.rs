//! Per-bundle request errors

use super::BundleError;

/// Creates an invalid (unknown) bundle name error
pub fn invalid(name: impl Into<String>) -> BundleError {
    BundleError::InvalidBundle { name: name.into() }
}

/// Creates a bundle not installed error
pub fn not_tracked(name: impl Into<String>) -> BundleError {
    BundleError::BundleNotTracked { name: name.into() }
}

/// Creates an error for a bundle that other installed bundles depend on
pub fn required(name: impl Into<String>, count: usize) -> BundleError {
    BundleError::RequiredBundle {
        name: name.into(),
        count,
    }
}

/// Creates an error for the base bundle, which can never be removed
pub fn protected(name: impl Into<String>) -> BundleError {
    BundleError::ProtectedBundle { name: name.into() }
}
