//! Draft filtering.

use std::path::Path;

use serde_json::Value;
use weft_plugin::{ActionResult, ContentPlugin, Descriptor, PluginActionError};

/// Drops items whose source document marks itself as a draft.
///
/// Runs early in the chain (high priority) so later plugins never see
/// draft items. A dropped item is an explicit empty fan-out.
#[derive(Default)]
pub struct Drafts;

impl ContentPlugin for Drafts {
    fn register(&self) -> Descriptor {
        Descriptor::new("drafts", 80)
    }

    fn extensions(&self) -> Vec<String> {
        vec!["md".to_owned()]
    }

    fn action(&self, item: Value) -> Result<ActionResult, PluginActionError> {
        let origin = item
            .get("origin")
            .and_then(Value::as_str)
            .ok_or_else(|| PluginActionError::new("drafts", "item has no origin field"))?;

        let metadata = weft_content::extract_metadata(Path::new(origin))
            .map_err(|e| PluginActionError::new("drafts", "metadata extraction failed").with_source(e))?;

        if metadata.get("draft").and_then(Value::as_bool) == Some(true) {
            tracing::debug!(origin, "draft dropped");
            return Ok(ActionResult::Many(vec![]));
        }
        Ok(item.into())
    }
}
