//! Subscriptions: the working set of bundles in scope for one operation

use super::manifest::{Manifest, Version};

/// A bundle pinned to a manifest version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub component: String,
    /// Pinned version; 0 until [`Subscriptions::pin_versions`] runs
    pub version: Version,
}

/// Ordered set of subscriptions, unique by component
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    items: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an unpinned set from bundle names, dropping duplicates
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut subs = Self::new();
        for name in names {
            subs.add(name);
        }
        subs
    }

    pub fn contains(&self, component: &str) -> bool {
        self.items.iter().any(|s| s.component == component)
    }

    /// Add a component; returns false if it was already subscribed
    pub fn add(&mut self, component: impl Into<String>) -> bool {
        let component = component.into();
        if self.contains(&component) {
            return false;
        }
        self.items.push(Subscription {
            component,
            version: 0,
        });
        true
    }

    /// Pin every subscription to the version its manifest last changed in.
    ///
    /// Subscriptions absent from the MoM keep version 0.
    pub fn pin_versions(&mut self, mom: &Manifest) {
        for sub in &mut self.items {
            if let Some(descriptor) = mom.find_bundle(&sub.component) {
                sub.version = descriptor.last_change;
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subscription> {
        self.items.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|s| s.component.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Subscriptions {
    type Item = &'a Subscription;
    type IntoIter = std::slice::Iter<'a, Subscription>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
