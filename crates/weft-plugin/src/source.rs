//! Plugin source abstraction.
//!
//! A [`PluginSource`] is the loading mechanism behind discovery: given a
//! category, it yields the constructed implementations available there.
//! The engine only requires loading to be deterministic per run; how the
//! implementations are addressed (filesystem entries, a fixed set wired at
//! startup) is the source's concern.

use std::sync::Arc;

use crate::discovery::{DiscoveryError, ProjectCategory};
use crate::plugin::{ContentPlugin, ProjectPlugin};

/// Category-addressed plugin loading.
pub trait PluginSource: Send + Sync {
    /// Every implementation available in the content category, in load
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if the category cannot be read or an
    /// implementation fails to construct.
    fn content_plugins(&self) -> Result<Vec<Arc<dyn ContentPlugin>>, DiscoveryError>;

    /// Every implementation available in a whole-project category, in
    /// load order.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] if the category cannot be read or an
    /// implementation fails to construct.
    fn project_plugins(
        &self,
        category: ProjectCategory,
    ) -> Result<Vec<Arc<dyn ProjectPlugin>>, DiscoveryError>;
}

/// A plugin source over fixed in-memory sets.
///
/// Used for wiring a compiled-in default plugin set and for tests that
/// need a source without touching the filesystem.
#[derive(Default)]
pub struct StaticSource {
    content: Vec<Arc<dyn ContentPlugin>>,
    backup: Vec<Arc<dyn ProjectPlugin>>,
    publication: Vec<Arc<dyn ProjectPlugin>>,
}

impl StaticSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content plugin. Load order follows call order.
    #[must_use]
    pub fn with_content(mut self, plugin: Arc<dyn ContentPlugin>) -> Self {
        self.content.push(plugin);
        self
    }

    /// Add a backup plugin. Load order follows call order.
    #[must_use]
    pub fn with_backup(mut self, plugin: Arc<dyn ProjectPlugin>) -> Self {
        self.backup.push(plugin);
        self
    }

    /// Add a publication plugin. Load order follows call order.
    #[must_use]
    pub fn with_publication(mut self, plugin: Arc<dyn ProjectPlugin>) -> Self {
        self.publication.push(plugin);
        self
    }
}

impl PluginSource for StaticSource {
    fn content_plugins(&self) -> Result<Vec<Arc<dyn ContentPlugin>>, DiscoveryError> {
        Ok(self.content.clone())
    }

    fn project_plugins(
        &self,
        category: ProjectCategory,
    ) -> Result<Vec<Arc<dyn ProjectPlugin>>, DiscoveryError> {
        let plugins = match category {
            ProjectCategory::Backup => &self.backup,
            ProjectCategory::Publication => &self.publication,
        };
        Ok(plugins.clone())
    }
}
