//! Front matter and markdown body extraction for weft.
//!
//! Source documents are markdown files with an optional YAML front matter
//! block. This crate supplies the two extraction operations the render
//! engine composes:
//!
//! - [`extract_body`]: markdown body rendered to HTML
//! - [`extract_metadata`]: front matter parsed into a string-keyed mapping
//!
//! Both fail with [`ContentError`] when the source is unreadable or its
//! front matter is malformed.

mod front_matter;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Options, Parser, html};
use serde_json::Value;

/// Error extracting content or metadata from a source document.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The source could not be read.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Source document path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The front matter block is malformed.
    #[error("Malformed front matter in {}: {message}", .path.display())]
    FrontMatter {
        /// Source document path.
        path: PathBuf,
        /// Parse failure detail.
        message: String,
    },
}

/// Markdown options used for body rendering.
fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

/// Extract the document body as rendered HTML.
///
/// The front matter block, if present, is stripped before rendering.
///
/// # Errors
///
/// Returns [`ContentError`] if the file cannot be read or its front
/// matter fence is unterminated.
pub fn extract_body(path: &Path) -> Result<String, ContentError> {
    let content = read(path)?;
    let split = split_or_err(&content, path)?;
    Ok(body_to_html(split.body))
}

/// Extract the front matter as a string-keyed mapping.
///
/// A document without front matter yields an empty mapping.
///
/// # Errors
///
/// Returns [`ContentError`] if the file cannot be read, the fence is
/// unterminated, or the block is not a YAML mapping.
pub fn extract_metadata(path: &Path) -> Result<HashMap<String, Value>, ContentError> {
    let content = read(path)?;
    let split = split_or_err(&content, path)?;

    let Some(matter) = split.matter else {
        return Ok(HashMap::new());
    };
    if matter.trim().is_empty() {
        return Ok(HashMap::new());
    }

    serde_yaml::from_str(matter).map_err(|e| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Render a markdown body to HTML.
#[must_use]
pub fn body_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn split_or_err<'a>(
    content: &'a str,
    path: &Path,
) -> Result<front_matter::Split<'a>, ContentError> {
    front_matter::split(content).map_err(|message| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn write_doc(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn body_without_front_matter() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(&tmp, "plain.md", "# Hello\n\nSome *emphasis*.\n");

        let html = extract_body(&path).unwrap();

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn body_strips_front_matter() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(&tmp, "doc.md", "---\ntitle: Guide\n---\n# Body\n");

        let html = extract_body(&path).unwrap();

        assert!(html.contains("<h1>Body</h1>"));
        assert!(!html.contains("title"));
    }

    #[test]
    fn metadata_parses_yaml_mapping() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(
            &tmp,
            "doc.md",
            "---\ntitle: Guide\ndraft: true\ntags: [a, b]\n---\nbody\n",
        );

        let meta = extract_metadata(&path).unwrap();

        assert_eq!(meta.get("title"), Some(&json!("Guide")));
        assert_eq!(meta.get("draft"), Some(&json!(true)));
        assert_eq!(meta.get("tags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn metadata_empty_without_front_matter() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(&tmp, "doc.md", "just a body\n");

        assert!(extract_metadata(&path).unwrap().is_empty());
    }

    #[test]
    fn metadata_empty_for_empty_block() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(&tmp, "doc.md", "---\n---\nbody\n");

        assert!(extract_metadata(&path).unwrap().is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_front_matter_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(&tmp, "doc.md", "---\n: [unbalanced\n---\nbody\n");

        let err = extract_metadata(&path).unwrap_err();

        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn unterminated_fence_is_a_front_matter_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_doc(&tmp, "doc.md", "---\ntitle: Guide\n");

        let err = extract_body(&path).unwrap_err();

        assert!(matches!(err, ContentError::FrontMatter { .. }));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = extract_body(Path::new("/nonexistent/doc.md")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn tables_are_enabled() {
        let html = body_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }
}
