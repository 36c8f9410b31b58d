//! Filesystem-addressed plugin source.
//!
//! Plugins are enabled by entries in a category directory tree:
//!
//! ```text
//! plugins/
//!   content/        drafts.toml  clean_urls.toml
//!   backup/         snapshot.toml
//!   publication/    sitemap.toml
//! ```
//!
//! An entry (file stem or subdirectory name) names an implementation from
//! the source's factory table; the factory constructs the instance at
//! discovery time. Entries are loaded in sorted name order, which keeps
//! discovery deterministic for a fixed tree. Adding plugin code therefore
//! requires a fresh discovery scan to take effect.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::discovery::{DiscoveryError, ProjectCategory};
use crate::plugin::{ContentPlugin, ProjectPlugin};
use crate::source::PluginSource;

/// Directory name of the content category.
const CONTENT_DIR: &str = "content";

/// Constructor for a content plugin implementation.
///
/// Must be safe to run at startup: no I/O beyond trivial setup.
pub type ContentFactory = Box<
    dyn Fn() -> Result<Arc<dyn ContentPlugin>, Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// Constructor for a whole-project plugin implementation.
pub type ProjectFactory = Box<
    dyn Fn() -> Result<Arc<dyn ProjectPlugin>, Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// A plugin source addressed by category directories.
pub struct DirectorySource {
    root: PathBuf,
    content: BTreeMap<&'static str, ContentFactory>,
    project: BTreeMap<&'static str, ProjectFactory>,
}

impl DirectorySource {
    /// Create a source rooted at the plugin directory, with empty factory
    /// tables.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            content: BTreeMap::new(),
            project: BTreeMap::new(),
        }
    }

    /// Register a content plugin factory under an entry name.
    pub fn register_content(&mut self, name: &'static str, factory: ContentFactory) {
        self.content.insert(name, factory);
    }

    /// Register a whole-project plugin factory under an entry name.
    ///
    /// The same table serves the backup and publication categories; the
    /// directory an entry appears in decides which hook runs it.
    pub fn register_project(&mut self, name: &'static str, factory: ProjectFactory) {
        self.project.insert(name, factory);
    }

    /// Entry names present in a category directory, sorted.
    fn scan_entries(&self, dir_name: &str) -> Result<Vec<String>, DiscoveryError> {
        let dir = self.root.join(dir_name);
        if !dir.is_dir() {
            return Err(DiscoveryError::CategoryNotFound(dir));
        }

        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if let Some(name) = entry_name(&entry.path()) {
                names.insert(name);
            }
        }
        Ok(names.into_iter().collect())
    }
}

/// Entry name for a path: directory name or file stem, skipping hidden
/// entries.
fn entry_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') {
        return None;
    }
    if path.is_dir() {
        return Some(file_name.to_owned());
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
}

impl PluginSource for DirectorySource {
    fn content_plugins(&self) -> Result<Vec<Arc<dyn ContentPlugin>>, DiscoveryError> {
        let mut plugins = Vec::new();
        for name in self.scan_entries(CONTENT_DIR)? {
            let factory = self
                .content
                .get(name.as_str())
                .ok_or_else(|| DiscoveryError::UnknownPlugin(name.clone()))?;
            let plugin = factory().map_err(|e| DiscoveryError::Construction {
                name: name.clone(),
                message: e.to_string(),
            })?;
            tracing::debug!(plugin = %name, "content plugin constructed");
            plugins.push(plugin);
        }
        Ok(plugins)
    }

    fn project_plugins(
        &self,
        category: ProjectCategory,
    ) -> Result<Vec<Arc<dyn ProjectPlugin>>, DiscoveryError> {
        let mut plugins = Vec::new();
        for name in self.scan_entries(category.dir_name())? {
            let factory = self
                .project
                .get(name.as_str())
                .ok_or_else(|| DiscoveryError::UnknownPlugin(name.clone()))?;
            let plugin = factory().map_err(|e| DiscoveryError::Construction {
                name: name.clone(),
                message: e.to_string(),
            })?;
            tracing::debug!(plugin = %name, category = category.dir_name(), "project plugin constructed");
            plugins.push(plugin);
        }
        Ok(plugins)
    }
}
