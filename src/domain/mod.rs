//! Domain models for bundlectl
//!
//! This module contains pure domain objects: manifests, their file entries and
//! the per-operation subscription set.

pub mod manifest;
pub mod subscription;

pub use manifest::{
    BASE_BUNDLE, FileEntry, MOM_COMPONENT, Manifest, Version, move_manifest, printable_bundle_name,
};
pub use subscription::{Subscription, Subscriptions};
