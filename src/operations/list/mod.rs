//! Bundle queries
//!
//! The `bundle-list` variants: installed bundles, installable bundles, the
//! bundles a bundle includes and the bundles that require it. Queries never
//! change the target. Each one prints its result and also returns it.

use crate::domain::{Manifest, Subscriptions, Version, printable_bundle_name};
use crate::error::{Result, bundle, manifest};
use crate::operations::context::Services;
use crate::resolver::{DependencyResolver, TraversalContext, find_dependents};
use crate::ui::display::plural;

/// Read-only bundle queries
pub struct ListOperation<'s, 'a> {
    services: &'s Services<'a>,
}

impl<'s, 'a> ListOperation<'s, 'a> {
    pub fn new(services: &'s Services<'a>) -> Self {
        Self { services }
    }

    fn current_mom(&self) -> Result<(Version, Manifest)> {
        let store = self.services.store;
        let version = store.current_version()?;
        let mom = store
            .load_mom(version, store.system_on_mix())
            .ok_or_else(|| manifest::mom_unavailable(version))?;
        Ok((version, mom))
    }

    /// Every bundle the MoM offers, sorted
    pub fn installable(&self) -> Result<Vec<String>> {
        let (_, mom) = self.current_mom()?;
        let names: Vec<String> = mom
            .bundle_names()
            .into_iter()
            .map(|name| {
                let experimental = mom.find_bundle(name).is_some_and(|d| d.is_experimental);
                printable_bundle_name(name, experimental)
            })
            .collect();
        for name in &names {
            self.services.console.print(name);
        }
        Ok(names)
    }

    /// Bundles installed on the target, sorted.
    ///
    /// Experimental bundles are only marked when the MoM can be loaded.
    pub fn installed(&self) -> Vec<String> {
        let mom = self.current_mom().ok().map(|(_, mom)| mom);
        let names: Vec<String> = self
            .services
            .inventory
            .installed()
            .into_iter()
            .map(|name| {
                let experimental = mom
                    .as_ref()
                    .and_then(|m| m.find_bundle(&name))
                    .is_some_and(|d| d.is_experimental);
                printable_bundle_name(&name, experimental)
            })
            .collect();
        for name in &names {
            self.services.console.print(name);
        }
        names
    }

    /// Every bundle `name` includes, directly or not, installed or not
    pub fn included(&self, name: &str, skip_optional: bool) -> Result<Vec<String>> {
        let services = self.services;
        let (_, mom) = self.current_mom()?;
        if mom.find_bundle(name).is_none() {
            return Err(bundle::invalid(name));
        }

        let resolver = DependencyResolver::new(services.store, services.inventory, skip_optional);
        let mut subs = Subscriptions::new();
        let outcome = resolver.add_subscriptions(&[name.to_string()], &mut subs, &mom, true, 0);
        if let Some(e) = outcome.load_error {
            return Err(e);
        }

        let mut included: Vec<String> = subs.names().into_iter().filter(|n| n != name).collect();
        included.sort();

        if included.is_empty() {
            services.console.print("No included bundles");
        } else {
            services.console.info(format!("Bundles included by {name}:"));
            services.console.info("");
            for bundle in &included {
                services.console.print(bundle);
            }
        }
        Ok(included)
    }

    /// Bundles that require `name`, among installed ones or, with `all`,
    /// among every bundle in the MoM
    pub fn required_by(&self, name: &str, all: bool, verbose: bool) -> Result<Vec<String>> {
        let services = self.services;
        let (_, mom) = self.current_mom()?;
        if mom.find_bundle(name).is_none() {
            return Err(bundle::invalid(name));
        }
        if !all && !services.inventory.is_installed(name) {
            return Err(bundle::not_tracked(name));
        }

        let mut subs = if all {
            Subscriptions::from_names(mom.bundle_names())
        } else {
            Subscriptions::from_names(services.inventory.installed())
        };
        subs.pin_versions(&mom);
        let manifests = services.store.load_submanifests(&mom, &subs)?;

        let scope = if all {
            "All installable and installed"
        } else {
            "Installed"
        };
        let mut ctx = TraversalContext::new(
            format!("{scope} bundles that have {name} as a dependency:"),
            verbose,
        );
        let dependents = find_dependents(name, &manifests, &[], &mut ctx);

        if dependents.is_empty() {
            services
                .console
                .print(format!("No bundles have {name} as a dependency"));
        } else {
            for line in ctx.lines() {
                services.console.print(line);
            }
            services.console.print("");
            services.console.print(format!(
                "Bundle '{}' is required by {}",
                name,
                plural(dependents.len(), "bundle")
            ));
        }
        Ok(dependents)
    }
}
