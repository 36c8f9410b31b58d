//! Sitemap publication.

use std::fmt::Write as _;
use std::path::PathBuf;

use weft_plugin::{Descriptor, PluginActionError, ProjectPlugin};

/// Writes a `sitemap.xml` over the rendered web root.
///
/// Every `.html` file under the web root becomes one `<url>` entry;
/// `index.html` files map to their directory URL. Entries are sorted so
/// repeated runs over an unchanged tree produce identical output.
pub struct Sitemap {
    web_root: PathBuf,
}

impl Sitemap {
    /// Create a sitemap plugin for the given web root.
    #[must_use]
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
        }
    }

    /// Collect sorted URL paths for every rendered page.
    fn collect_urls(&self) -> Result<Vec<String>, PluginActionError> {
        let mut urls = Vec::new();
        for entry in ignore::WalkBuilder::new(&self.web_root).build() {
            let entry = entry.map_err(|e| {
                PluginActionError::new("sitemap", "walking the web root failed").with_source(e)
            })?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if path.extension().is_none_or(|e| e != "html") {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.web_root) else {
                continue;
            };
            let mut url = format!("/{}", relative.to_string_lossy().replace('\\', "/"));
            if let Some(stripped) = url.strip_suffix("index.html") {
                url = stripped.to_owned();
            }
            urls.push(url);
        }
        urls.sort();
        Ok(urls)
    }
}

impl ProjectPlugin for Sitemap {
    fn register(&self) -> Descriptor {
        Descriptor::new("sitemap", 0)
    }

    fn action(&self) -> Result<(), PluginActionError> {
        let urls = self.collect_urls()?;

        let mut xml = String::with_capacity(urls.len() * 48 + 128);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
        for url in &urls {
            let _ = writeln!(xml, "  <url><loc>{}</loc></url>", escape(url));
        }
        xml.push_str("</urlset>\n");

        let target = self.web_root.join("sitemap.xml");
        std::fs::write(&target, xml).map_err(|e| {
            PluginActionError::new("sitemap", format!("cannot write {}", target.display()))
                .with_source(e)
        })?;

        tracing::info!(entries = urls.len(), sitemap = %target.display(), "sitemap written");
        Ok(())
    }
}

/// Escape XML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("&apos;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn sitemap_lists_rendered_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let web = tmp.path().join("public");
        fs::create_dir_all(web.join("blog/post")).unwrap();
        fs::write(web.join("index.html"), "home").unwrap();
        fs::write(web.join("about.html"), "about").unwrap();
        fs::write(web.join("blog/post/index.html"), "post").unwrap();
        fs::write(web.join("styles.css"), "body{}").unwrap();

        Sitemap::new(&web).action().unwrap();

        let xml = fs::read_to_string(web.join("sitemap.xml")).unwrap();
        assert!(xml.contains("<loc>/</loc>"));
        assert!(xml.contains("<loc>/about.html</loc>"));
        assert!(xml.contains("<loc>/blog/post/</loc>"));
        assert!(!xml.contains("styles.css"));
    }

    #[test]
    fn repeated_runs_produce_identical_output() {
        let tmp = tempfile::tempdir().unwrap();
        let web = tmp.path().join("public");
        fs::create_dir_all(&web).unwrap();
        fs::write(web.join("a.html"), "a").unwrap();
        fs::write(web.join("b.html"), "b").unwrap();

        let plugin = Sitemap::new(&web);
        plugin.action().unwrap();
        let first = fs::read_to_string(web.join("sitemap.xml")).unwrap();
        plugin.action().unwrap();
        let second = fs::read_to_string(web.join("sitemap.xml")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_web_root_is_an_error() {
        let err = Sitemap::new("/nonexistent/public").action().unwrap_err();
        assert_eq!(err.plugin, "sitemap");
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape("/a&b"), "/a&amp;b");
        assert_eq!(escape("/<x>"), "/&lt;x&gt;");
    }
}
