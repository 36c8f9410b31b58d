//! Pretty URL rewriting.

use std::path::Path;

use serde_json::{Value, json};
use weft_plugin::{ActionResult, ContentPlugin, Descriptor, PluginActionError};

/// Rewrites destinations from `name.html` to `name/index.html`.
///
/// Pages then serve under `/name/` instead of `/name.html`. Files already
/// named `index.html` are left alone. Runs late (low priority) so earlier
/// plugins see the plain destination.
#[derive(Default)]
pub struct CleanUrls;

impl ContentPlugin for CleanUrls {
    fn register(&self) -> Descriptor {
        Descriptor::new("clean_urls", 10)
    }

    fn extensions(&self) -> Vec<String> {
        vec!["md".to_owned()]
    }

    fn action(&self, mut item: Value) -> Result<ActionResult, PluginActionError> {
        let destination = item
            .get("destination")
            .and_then(Value::as_str)
            .ok_or_else(|| PluginActionError::new("clean_urls", "item has no destination field"))?;

        let path = Path::new(destination);
        let is_index = path.file_name().is_some_and(|n| n == "index.html");
        let stem = path.file_stem().and_then(|s| s.to_str());

        if let (false, Some(stem)) = (is_index, stem)
            && path.extension().is_some_and(|e| e == "html")
        {
            let pretty = path.with_file_name(stem).join("index.html");
            item["destination"] = json!(pretty.to_string_lossy());
        }

        Ok(item.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn destination_after(dest: &str) -> String {
        let item = json!({"extension": "md", "destination": dest});
        match CleanUrls.action(item).unwrap() {
            ActionResult::One(value) => value["destination"].as_str().unwrap().to_owned(),
            ActionResult::Many(_) => panic!("clean_urls never fans out"),
        }
    }

    #[test]
    fn page_moves_under_its_own_directory() {
        assert_eq!(destination_after("public/about.html"), "public/about/index.html");
    }

    #[test]
    fn nested_page_keeps_its_directory() {
        assert_eq!(
            destination_after("public/blog/post.html"),
            "public/blog/post/index.html"
        );
    }

    #[test]
    fn index_is_untouched() {
        assert_eq!(destination_after("public/index.html"), "public/index.html");
    }

    #[test]
    fn non_html_destination_is_untouched() {
        assert_eq!(destination_after("public/feed.xml"), "public/feed.xml");
    }

    #[test]
    fn missing_destination_is_an_error() {
        let err = CleanUrls.action(json!({"extension": "md"})).unwrap_err();
        assert_eq!(err.plugin, "clean_urls");
    }
}
