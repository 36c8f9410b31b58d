//! Template resolution for source documents.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Error determining the template for a source document.
#[derive(Debug, thiserror::Error)]
#[error("No template could be determined for {}: {message}", .path.display())]
pub struct TemplateResolutionError {
    /// Source document path.
    pub path: PathBuf,
    /// Resolution failure detail.
    pub message: String,
}

/// Maps a source document to a template identifier.
pub trait TemplateResolver: Send + Sync {
    /// Resolve the template name for a source document.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateResolutionError`] when no template can be
    /// determined.
    fn resolve(&self, source: &Path) -> Result<String, TemplateResolutionError>;
}

/// Resolves templates from the document's front matter.
///
/// The `template` key names the template; documents without the key use
/// the configured fallback.
pub struct FrontMatterResolver {
    fallback: String,
}

impl FrontMatterResolver {
    /// Create a resolver with a custom fallback template name.
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl Default for FrontMatterResolver {
    fn default() -> Self {
        Self::new("default.html")
    }
}

impl TemplateResolver for FrontMatterResolver {
    fn resolve(&self, source: &Path) -> Result<String, TemplateResolutionError> {
        let metadata =
            weft_content::extract_metadata(source).map_err(|e| TemplateResolutionError {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        match metadata.get("template") {
            Some(Value::String(name)) => Ok(name.clone()),
            Some(other) => Err(TemplateResolutionError {
                path: source.to_path_buf(),
                message: format!("front matter 'template' must be a string, got {other}"),
            }),
            None => Ok(self.fallback.clone()),
        }
    }
}
