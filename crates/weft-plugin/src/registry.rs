//! Priority-ordered plugin registries.
//!
//! Registries are built once at discovery time and are immutable for the
//! rest of the run: every instance they hold is fully constructed, and the
//! ordering (descending priority, ties kept in load order) is fixed when
//! the registry is created.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use crate::plugin::{ContentPlugin, ProjectPlugin};

/// Content plugin chains keyed by extension.
///
/// An implementation declaring several extensions appears in each of those
/// chains independently. Each chain is sorted by descending priority with
/// a stable tie-break: equal-priority plugins keep the order they were
/// loaded in.
#[derive(Default)]
pub struct ContentRegistry {
    chains: HashMap<String, Vec<Arc<dyn ContentPlugin>>>,
}

impl ContentRegistry {
    /// Group loaded implementations by declared extension and order each
    /// chain.
    #[must_use]
    pub(crate) fn from_plugins(plugins: Vec<Arc<dyn ContentPlugin>>) -> Self {
        let mut chains: HashMap<String, Vec<Arc<dyn ContentPlugin>>> = HashMap::new();
        for plugin in plugins {
            for extension in plugin.extensions() {
                chains.entry(extension).or_default().push(Arc::clone(&plugin));
            }
        }
        for chain in chains.values_mut() {
            // Stable: equal priorities preserve load order
            chain.sort_by_key(|p| Reverse(p.register().priority));
        }
        Self { chains }
    }

    /// The plugin chain registered for an extension, in application order.
    ///
    /// Returns `None` when no plugins are registered for the extension;
    /// dispatch treats that as pass-through, not an error.
    #[must_use]
    pub fn chain(&self, extension: &str) -> Option<&[Arc<dyn ContentPlugin>]> {
        self.chains.get(extension).map(Vec::as_slice)
    }

    /// Extensions with at least one registered plugin.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Number of extensions with registered chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// True when no extension has a registered chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// A flat, priority-ordered plugin list for whole-project hooks.
///
/// Backup and publication discovery both produce this shape; several
/// categories may be merged into one list.
#[derive(Default, Debug)]
pub struct ProjectRegistry {
    plugins: Vec<Arc<dyn ProjectPlugin>>,
}

impl ProjectRegistry {
    /// Order loaded implementations by descending priority (stable).
    #[must_use]
    pub(crate) fn from_plugins(mut plugins: Vec<Arc<dyn ProjectPlugin>>) -> Self {
        plugins.sort_by_key(|p| Reverse(p.register().priority));
        Self { plugins }
    }

    /// Plugins in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProjectPlugin>> {
        self.plugins.iter()
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// True when the registry holds no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
