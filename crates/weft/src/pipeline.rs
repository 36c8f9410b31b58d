//! Whole-project rebuild pipeline.
//!
//! Discovery has already produced the registries; this module drives one
//! build: walk the dev tree, route every file through the content hook,
//! render or copy each surviving item, then run the backup and
//! publication hooks.

use std::path::Path;

use serde_json::{Value, json};

use weft_config::Config;
use weft_plugin::Dispatcher;
use weft_render::Renderer;

use crate::error::CliError;
use crate::output::Output;

/// Counters for one rebuild run.
pub(crate) struct BuildReport {
    /// Documents rendered through templates.
    pub rendered: u64,
    /// Media files copied as-is.
    pub copied: usize,
    /// Items that failed per-document (build continued).
    pub failed: usize,
}

/// Rebuild the whole project.
///
/// Per-document extraction, resolution and render failures are reported
/// and counted but do not abort the batch. Plugin failures follow the
/// dispatcher's policy: under abort they end the build, under continue
/// they are already absorbed by the dispatcher.
pub(crate) fn rebuild(
    config: &Config,
    dispatcher: &Dispatcher,
    renderer: &Renderer,
    output: &Output,
) -> Result<BuildReport, CliError> {
    let dev = &config.roots_resolved.dev;
    let web = &config.roots_resolved.web;
    let templates = config.roots_resolved.templates_dir();

    let mut copied = 0usize;
    let mut failed = 0usize;

    let walker = ignore::WalkBuilder::new(dev)
        .filter_entry(move |entry| entry.path() != templates)
        .build();

    for entry in walker {
        let entry = entry.map_err(std::io::Error::other)?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let origin = entry.path();
        let Ok(relative) = origin.strip_prefix(dev) else {
            continue;
        };

        let extension = origin
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_owned();
        let renderable = config.filetypes.renderable.contains(&extension);
        let destination = if renderable {
            web.join(relative).with_extension("html")
        } else {
            web.join(relative)
        };

        let item = json!({
            "origin": origin.to_string_lossy(),
            "destination": destination.to_string_lossy(),
            "extension": extension,
        });

        for result in dispatcher.hook_content(item)? {
            match handle_item(&result, config, renderer) {
                Ok(Handled::Rendered) => {}
                Ok(Handled::Copied) => copied += 1,
                Err(message) => {
                    output.warning(&message);
                    failed += 1;
                }
            }
        }
    }

    dispatcher.hook_backup()?;
    dispatcher.hook_publication()?;

    Ok(BuildReport {
        rendered: renderer.count(),
        copied,
        failed,
    })
}

enum Handled {
    Rendered,
    Copied,
}

/// Render or copy one item produced by the content hook.
fn handle_item(item: &Value, config: &Config, renderer: &Renderer) -> Result<Handled, String> {
    let origin = item
        .get("origin")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("skipping plugin result without origin: {item}"))?;
    let destination = item
        .get("destination")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("skipping plugin result without destination: {item}"))?;
    let extension = item
        .get("extension")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let origin = Path::new(origin);
    let destination = Path::new(destination);
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create {}: {e}", parent.display()))?;
    }

    if config.filetypes.renderable.iter().any(|e| e == extension) {
        renderer
            .render(origin, destination)
            .map_err(|e| format!("{}: {e}", origin.display()))?;
        tracing::debug!(origin = %origin.display(), "rendered");
        Ok(Handled::Rendered)
    } else {
        std::fs::copy(origin, destination)
            .map_err(|e| format!("cannot copy {}: {e}", origin.display()))?;
        tracing::debug!(origin = %origin.display(), "copied");
        Ok(Handled::Copied)
    }
}
