//! Dependency resolution for bundles
//!
//! This module handles:
//! - Expanding requested bundles into their include closure ([`DependencyResolver`])
//! - Finding the installed bundles that depend on a bundle ([`reverse`])
//!
//! Includes form a DAG. The forward walk stays finite because a bundle that is
//! already subscribed is not expanded again below the top level.

pub mod reverse;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::domain::{Manifest, Subscriptions};
use crate::error::BundleError;
use crate::store::ManifestStore;
use crate::tracking::Inventory;

pub use reverse::{TraversalContext, find_dependents};

/// Merged result of one resolution
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// At least one subscription was added
    pub added_new: bool,
    /// Requested or included names missing from the MoM
    pub bad_names: BTreeSet<String>,
    /// First manifest that could not be loaded; resolution stopped there
    pub load_error: Option<BundleError>,
}

impl ResolveOutcome {
    /// Merge a nested outcome into this one
    pub fn combine(&mut self, other: ResolveOutcome) {
        self.added_new |= other.added_new;
        self.bad_names.extend(other.bad_names);
        if self.load_error.is_none() {
            self.load_error = other.load_error;
        }
    }

    pub fn has_bad_names(&self) -> bool {
        !self.bad_names.is_empty()
    }
}

/// Expands bundle names into subscriptions
pub struct DependencyResolver<'a> {
    store: &'a dyn ManifestStore,
    inventory: &'a dyn Inventory,
    skip_optional: bool,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        store: &'a dyn ManifestStore,
        inventory: &'a dyn Inventory,
        skip_optional: bool,
    ) -> Self {
        Self {
            store,
            inventory,
            skip_optional,
        }
    }

    /// Add `names` and everything they include to `subs`.
    ///
    /// Unless `find_all` is set, bundles already installed are left out along
    /// with their includes. A name missing from the MoM is recorded and the
    /// rest are still processed; a manifest load failure stops everything.
    pub fn add_subscriptions(
        &self,
        names: &[String],
        subs: &mut Subscriptions,
        mom: &Manifest,
        find_all: bool,
        depth: usize,
    ) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::default();

        for name in names {
            let Some(descriptor) = mom.find_bundle(name) else {
                warn!("Bundle \"{}\" is invalid, skipping it...", name);
                outcome.bad_names.insert(name.clone());
                continue;
            };

            if !find_all && self.inventory.is_installed(name) {
                continue;
            }

            let manifest = match self.store.load_manifest(descriptor.last_change, descriptor, mom) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!(
                        "Unable to load manifest {} version {}",
                        name, descriptor.last_change
                    );
                    outcome.load_error = Some(e);
                    return outcome;
                }
            };

            if subs.contains(name) {
                if depth > 0 {
                    continue;
                }
            } else {
                subs.add(name.clone());
                outcome.added_new = true;
                debug!("Subscribed {} (depth {})", name, depth);
            }

            if !manifest.includes.is_empty() {
                outcome.combine(self.add_subscriptions(
                    &manifest.includes,
                    subs,
                    mom,
                    find_all,
                    depth + 1,
                ));
                if outcome.load_error.is_some() {
                    return outcome;
                }
            }

            if !self.skip_optional && !manifest.optional.is_empty() {
                outcome.combine(self.add_subscriptions(
                    &manifest.optional,
                    subs,
                    mom,
                    find_all,
                    depth + 1,
                ));
                if outcome.load_error.is_some() {
                    return outcome;
                }
            }
        }

        outcome
    }
}
