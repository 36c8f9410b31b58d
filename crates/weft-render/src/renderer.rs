//! The render engine.
//!
//! One render call combines a resolved template, the extracted body and
//! metadata of a source document, and the media files sitting next to it
//! into a single output artifact.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use minijinja::{AutoEscape, Environment, context, path_loader};

use weft_content::ContentError;

use crate::resolve::{FrontMatterResolver, TemplateResolutionError, TemplateResolver};
use crate::rewrite::{DevToWeb, PathRewrite};

/// Error returned when rendering a document fails.
///
/// The rendered counter is not incremented on any of these.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No template could be determined or loaded.
    #[error(transparent)]
    Template(#[from] TemplateResolutionError),
    /// Body or metadata extraction failed.
    #[error(transparent)]
    Content(#[from] ContentError),
    /// The template engine rejected the render.
    #[error("Template rendering failed: {0}")]
    Render(#[from] minijinja::Error),
    /// Reading siblings or writing the destination failed.
    #[error("I/O error: {source} (path: {})", .path.display())]
    Io {
        /// Path the operation failed on.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for [`Renderer`].
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Directory templates are loaded from.
    pub templates_dir: PathBuf,
    /// Extensions (without the dot) treated as template/content sources.
    /// Sibling files outside this set are gathered as media.
    pub renderable: HashSet<String>,
    /// Development root, for the default path rewrite.
    pub dev_root: PathBuf,
    /// Web root, for the default path rewrite.
    pub web_root: PathBuf,
}

/// Renders source documents to output files.
///
/// The renderer owns the template environment and the rendered-count
/// counter; one instance lives for one build run. Registries and
/// configuration around it are read-only, so the counter is the only
/// state callers must not share without the atomic it already is.
pub struct Renderer {
    env: Environment<'static>,
    renderable: HashSet<String>,
    resolver: Box<dyn TemplateResolver>,
    rewrite: Box<dyn PathRewrite>,
    rendered: AtomicU64,
}

impl Renderer {
    /// Create a renderer with the default collaborators: front matter
    /// template resolution and dev-to-web prefix rewriting.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(&config.templates_dir));
        // Templates receive pre-rendered HTML as `content`
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let rewrite = DevToWeb::new(&config.dev_root, &config.web_root);

        Self {
            env,
            renderable: config.renderable,
            resolver: Box::new(FrontMatterResolver::default()),
            rewrite: Box::new(rewrite),
            rendered: AtomicU64::new(0),
        }
    }

    /// Replace the template resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn TemplateResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the path rewrite rule.
    #[must_use]
    pub fn with_rewrite(mut self, rewrite: Box<dyn PathRewrite>) -> Self {
        self.rewrite = rewrite;
        self
    }

    /// Render one source document to a destination file.
    ///
    /// Resolves the template, extracts body and metadata, gathers sibling
    /// media, renders the template with the named inputs `content`,
    /// `context` and `media`, and writes the result to `dest`, fully
    /// overwriting any existing file. The rendered count increases by
    /// exactly one on a successful write and is untouched on any error.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] for resolution, extraction, rendering or
    /// write failures; write failures wrap the underlying I/O error.
    pub fn render(&self, src: &Path, dest: &Path) -> Result<(), RenderError> {
        let template_name = self.resolver.resolve(src)?;
        let content = weft_content::extract_body(src)?;
        let metadata = weft_content::extract_metadata(src)?;
        let media = self.gather_media(src)?;

        let template = self.env.get_template(&template_name).map_err(|e| {
            if matches!(e.kind(), minijinja::ErrorKind::TemplateNotFound) {
                RenderError::Template(TemplateResolutionError {
                    path: src.to_path_buf(),
                    message: e.to_string(),
                })
            } else {
                RenderError::Render(e)
            }
        })?;

        let page = template.render(context! {
            content => content,
            context => metadata,
            media => media,
        })?;

        std::fs::write(dest, page).map_err(|source| RenderError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        self.rendered.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(src = %src.display(), dest = %dest.display(), "rendered");
        Ok(())
    }

    /// Gather the media files sitting next to a source document.
    ///
    /// Lists the directory containing `path` (or `path` itself if it
    /// names a directory) and keeps every non-directory entry whose
    /// extension is not renderable, rewritten to its web-servable name.
    /// Order follows the directory listing and is not guaranteed stable
    /// across filesystems.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the directory cannot be listed.
    pub fn gather_media(&self, path: &Path) -> Result<Vec<String>, RenderError> {
        let dir = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or(Path::new("."))
        };

        let entries = std::fs::read_dir(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut media = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let entry_path = entry.path();
            if entry_path.is_dir() {
                continue;
            }
            let extension = entry_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if self.renderable.contains(extension) {
                continue;
            }
            let rewritten = self.rewrite.dev_to_web(&entry_path.to_string_lossy());
            if let Some(name) = Path::new(&rewritten).file_name().and_then(|n| n.to_str()) {
                media.push(name.to_owned());
            }
        }
        Ok(media)
    }

    /// Number of documents rendered by this instance. Purely
    /// observational; never reset during a run.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.rendered.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Standard fixture: a site tree with templates and one document
    /// surrounded by media.
    fn fixture() -> (tempfile::TempDir, Renderer, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let site = tmp.path().join("site");
        let templates = site.join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("default.html"),
            "{{ context.title }}|{{ content }}|{% for m in media %}{{ m }},{% endfor %}",
        )
        .unwrap();

        let doc = site.join("doc.md");
        fs::write(&doc, "---\ntitle: Guide\n---\n# Hello\n").unwrap();
        fs::write(site.join("cover.png"), b"png").unwrap();
        fs::write(site.join("notes.md"), "sibling renderable\n").unwrap();

        let renderer = Renderer::new(RendererConfig {
            templates_dir: templates,
            renderable: HashSet::from(["md".to_owned()]),
            dev_root: site.clone(),
            web_root: tmp.path().join("public"),
        });

        (tmp, renderer, doc)
    }

    #[test]
    fn render_composes_template_content_context_and_media() {
        let (tmp, renderer, doc) = fixture();
        let dest = tmp.path().join("doc.html");

        renderer.render(&doc, &dest).unwrap();

        let out = fs::read_to_string(&dest).unwrap();
        assert!(out.starts_with("Guide|"));
        assert!(out.contains("<h1>Hello</h1>"));
        assert!(out.contains("cover.png,"));
        assert!(!out.contains("notes.md"));
    }

    #[test]
    fn render_overwrites_existing_destination() {
        let (tmp, renderer, doc) = fixture();
        let dest = tmp.path().join("doc.html");
        fs::write(&dest, "stale").unwrap();

        renderer.render(&doc, &dest).unwrap();

        let out = fs::read_to_string(&dest).unwrap();
        assert!(!out.contains("stale"));
    }

    #[test]
    fn count_increments_once_per_successful_render() {
        let (tmp, renderer, doc) = fixture();
        assert_eq!(renderer.count(), 0);

        renderer.render(&doc, &tmp.path().join("a.html")).unwrap();
        assert_eq!(renderer.count(), 1);

        renderer.render(&doc, &tmp.path().join("b.html")).unwrap();
        assert_eq!(renderer.count(), 2);
    }

    #[test]
    fn write_failure_is_io_error_and_count_unchanged() {
        let (tmp, renderer, doc) = fixture();
        let dest = tmp.path().join("missing-dir").join("doc.html");

        let err = renderer.render(&doc, &dest).unwrap_err();

        assert!(matches!(err, RenderError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(renderer.count(), 0);
    }

    #[test]
    fn unknown_template_is_a_resolution_error() {
        let (tmp, renderer, doc) = fixture();
        fs::write(&doc, "---\ntemplate: absent.html\n---\nbody\n").unwrap();

        let err = renderer.render(&doc, &tmp.path().join("doc.html")).unwrap_err();

        assert!(matches!(err, RenderError::Template(_)));
        assert_eq!(renderer.count(), 0);
    }

    #[test]
    fn gather_media_excludes_renderable_and_directories() {
        let (tmp, renderer, doc) = fixture();
        fs::create_dir(tmp.path().join("site").join("assets")).unwrap();
        fs::write(tmp.path().join("site").join("video.mp4"), b"mp4").unwrap();

        let mut media = renderer.gather_media(&doc).unwrap();
        media.sort();

        assert_eq!(media, vec!["cover.png".to_owned(), "video.mp4".to_owned()]);
    }

    #[test]
    fn gather_media_accepts_a_directory_path() {
        let (tmp, renderer, _doc) = fixture();

        let mut media = renderer.gather_media(&tmp.path().join("site")).unwrap();
        media.sort();

        assert_eq!(media, vec!["cover.png".to_owned()]);
    }

    #[test]
    fn gather_media_applies_the_rewrite_rule() {
        struct Versioned;

        impl PathRewrite for Versioned {
            fn dev_to_web(&self, name: &str) -> String {
                name.replace("cover", "cover-v2")
            }
        }

        let (_tmp, renderer, doc) = fixture();
        let renderer = renderer.with_rewrite(Box::new(Versioned));

        let media = renderer.gather_media(&doc).unwrap();

        assert_eq!(media, vec!["cover-v2.png".to_owned()]);
    }

    #[test]
    fn gather_media_missing_directory_is_io_error() {
        let (tmp, renderer, _doc) = fixture();
        let gone = tmp.path().join("site").join("gone").join("doc.md");

        let err = renderer.gather_media(&gone).unwrap_err();

        assert!(matches!(err, RenderError::Io { .. }));
    }
}
