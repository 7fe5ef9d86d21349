//! Command implementations for the bundlectl CLI
//!
//! Thin wrappers: build the services for the effective settings, run one
//! operation and hand its result code back to `main`.

pub mod add;
pub mod completions;
pub mod list;
pub mod remove;
