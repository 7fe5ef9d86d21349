//! Operations module for adding, removing and querying bundles
//!
//! This module provides high-level operations that coordinate:
//! - InstallOperation: the seven-step bundle-add pipeline
//! - RemoveOperation: dependency-gated bundle removal
//! - ListOperation: read-only bundle queries
//!
//! The operations coordinate with:
//! - Resolver: include closure and reverse dependencies (from resolver module)
//! - Store and delivery: manifests and content
//! - Staging and transaction: two-phase file commit with a rename journal
//! - Tracking: explicitly requested bundle markers
//! - UI: Progress reporting and messages (from ui module)

pub mod context;
pub mod install;
pub mod list;
pub mod remove;

pub use context::SystemServices;
pub use list::ListOperation;
pub use remove::{RemoveOperation, RemoveOptions};
