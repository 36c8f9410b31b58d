//! Registry construction from a plugin source.
//!
//! Discovery runs once at startup: it loads every implementation a
//! [`PluginSource`] yields for the requested categories, then fixes the
//! ordering. It is deterministic for a fixed source state, does not mutate
//! the filesystem, and never hands back a partial registry: any loading
//! or construction failure surfaces as a [`DiscoveryError`].

use std::path::PathBuf;

use crate::registry::{ContentRegistry, ProjectRegistry};
use crate::source::PluginSource;

/// Whole-project plugin categories.
///
/// Content discovery is its own entry point ([`discover_content`]); these
/// categories feed the flat registries used by the backup and publication
/// hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectCategory {
    /// Plugins producing backup artifacts.
    Backup,
    /// Plugins publishing the built site.
    Publication,
}

impl ProjectCategory {
    /// Directory name used by filesystem-addressed sources.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Publication => "publication",
        }
    }
}

/// Error raised while building registries.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// A category directory is missing or is not a directory.
    #[error("Plugin category directory not found: {}", .0.display())]
    CategoryNotFound(PathBuf),
    /// A category entry names an implementation nothing registered.
    #[error("No implementation registered for plugin entry '{0}'")]
    UnknownPlugin(String),
    /// An implementation failed to construct.
    #[error("Plugin '{name}' failed to construct: {message}")]
    Construction {
        /// Plugin entry name.
        name: String,
        /// Constructor failure message.
        message: String,
    },
    /// Discovery was asked for an empty category set.
    #[error("Discovery requires at least one category")]
    NoCategories,
    /// I/O error while scanning a category directory.
    #[error("I/O error while scanning plugins: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the content registry from a source.
///
/// For every loaded implementation and every extension it declares, an
/// instance is appended to that extension's chain; chains are then sorted
/// by descending priority, stable with respect to load order.
///
/// # Errors
///
/// Returns [`DiscoveryError`] if the source fails to load or construct an
/// implementation. No partial registry is returned.
pub fn discover_content(source: &dyn PluginSource) -> Result<ContentRegistry, DiscoveryError> {
    let plugins = source.content_plugins()?;
    tracing::debug!(count = plugins.len(), "content plugins loaded");
    Ok(ContentRegistry::from_plugins(plugins))
}

/// Build a flat project registry from one or more categories.
///
/// Categories are loaded in the given order and merged into a single
/// list, then sorted by descending priority (stable, so the category
/// order is the tie-break between equal-priority plugins).
///
/// # Errors
///
/// Returns [`DiscoveryError::NoCategories`] for an empty category set and
/// propagates any load or construction failure.
pub fn discover_project(
    source: &dyn PluginSource,
    categories: &[ProjectCategory],
) -> Result<ProjectRegistry, DiscoveryError> {
    if categories.is_empty() {
        return Err(DiscoveryError::NoCategories);
    }

    let mut plugins = Vec::new();
    for category in categories {
        let loaded = source.project_plugins(*category)?;
        tracing::debug!(
            category = category.dir_name(),
            count = loaded.len(),
            "project plugins loaded"
        );
        plugins.extend(loaded);
    }
    Ok(ProjectRegistry::from_plugins(plugins))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::plugin::{
        ActionResult, ContentPlugin, Descriptor, PluginActionError, ProjectPlugin,
    };
    use crate::source::StaticSource;
    use serde_json::Value;

    struct Content {
        name: &'static str,
        priority: i32,
        exts: Vec<&'static str>,
    }

    impl ContentPlugin for Content {
        fn register(&self) -> Descriptor {
            Descriptor::new(self.name, self.priority)
        }

        fn extensions(&self) -> Vec<String> {
            self.exts.iter().map(|e| (*e).to_owned()).collect()
        }

        fn action(&self, item: Value) -> Result<ActionResult, PluginActionError> {
            Ok(item.into())
        }
    }

    struct Project {
        name: &'static str,
        priority: i32,
    }

    impl ProjectPlugin for Project {
        fn register(&self) -> Descriptor {
            Descriptor::new(self.name, self.priority)
        }

        fn action(&self) -> Result<(), PluginActionError> {
            Ok(())
        }
    }

    fn sample_source() -> StaticSource {
        StaticSource::new()
            .with_content(Arc::new(Content {
                name: "toc",
                priority: 2,
                exts: vec!["md"],
            }))
            .with_content(Arc::new(Content {
                name: "thumbs",
                priority: 7,
                exts: vec!["png", "jpg"],
            }))
            .with_backup(Arc::new(Project {
                name: "snapshot",
                priority: 1,
            }))
            .with_publication(Arc::new(Project {
                name: "sitemap",
                priority: 4,
            }))
    }

    fn registry_shape(registry: &ContentRegistry) -> Vec<(String, Vec<String>)> {
        let mut shape: Vec<(String, Vec<String>)> = registry
            .extensions()
            .map(|ext| {
                let names = registry
                    .chain(ext)
                    .unwrap()
                    .iter()
                    .map(|p| p.register().name)
                    .collect();
                (ext.to_owned(), names)
            })
            .collect();
        shape.sort();
        shape
    }

    #[test]
    fn content_discovery_groups_and_orders() {
        let registry = discover_content(&sample_source()).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry_shape(&registry),
            vec![
                ("jpg".to_owned(), vec!["thumbs".to_owned()]),
                ("md".to_owned(), vec!["toc".to_owned()]),
                ("png".to_owned(), vec!["thumbs".to_owned()]),
            ]
        );
    }

    #[test]
    fn content_discovery_is_deterministic() {
        let source = sample_source();
        let first = discover_content(&source).unwrap();
        let second = discover_content(&source).unwrap();

        assert_eq!(registry_shape(&first), registry_shape(&second));
    }

    #[test]
    fn project_discovery_merges_categories() {
        let registry = discover_project(
            &sample_source(),
            &[ProjectCategory::Backup, ProjectCategory::Publication],
        )
        .unwrap();

        let names: Vec<String> = registry.iter().map(|p| p.register().name).collect();
        // sitemap (priority 4) outranks snapshot (priority 1)
        assert_eq!(names, vec!["sitemap", "snapshot"]);
    }

    #[test]
    fn project_discovery_single_category() {
        let registry = discover_project(&sample_source(), &[ProjectCategory::Backup]).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn project_discovery_rejects_empty_category_set() {
        let err = discover_project(&sample_source(), &[]).unwrap_err();
        assert!(matches!(err, DiscoveryError::NoCategories));
    }
}
