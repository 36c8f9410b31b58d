//! Engine wiring from loaded configuration.

use std::collections::HashSet;

use weft_builtins::BuiltinContext;
use weft_config::{Config, PluginErrorPolicy};
use weft_plugin::{
    DirectorySource, Dispatcher, FailurePolicy, ProjectCategory, discover_content,
    discover_project,
};
use weft_render::{Renderer, RendererConfig};

use crate::error::CliError;

/// Build the dispatcher by discovering all three plugin categories.
///
/// The built-in factory table is registered on a directory source rooted
/// at the configured plugin directory; the category directories are
/// provisioned first so a fresh project discovers an empty (but valid)
/// plugin tree.
pub(crate) fn build_dispatcher(config: &Config) -> Result<Dispatcher, CliError> {
    let plugin_dir = &config.plugins_resolved.dir;
    for category in ["content", "backup", "publication"] {
        std::fs::create_dir_all(plugin_dir.join(category))?;
    }

    let mut source = DirectorySource::new(plugin_dir);
    weft_builtins::register_defaults(
        &mut source,
        &BuiltinContext {
            dev_root: config.roots_resolved.dev.clone(),
            web_root: config.roots_resolved.web.clone(),
            snapshots_dir: config.roots_resolved.snapshots_dir(),
        },
    );

    let content = discover_content(&source)?;
    let backup = discover_project(&source, &[ProjectCategory::Backup])?;
    let publication = discover_project(&source, &[ProjectCategory::Publication])?;

    let policy = match config.plugins_resolved.on_error {
        PluginErrorPolicy::Abort => FailurePolicy::Abort,
        PluginErrorPolicy::Continue => FailurePolicy::Continue,
    };

    Ok(Dispatcher::new(content, backup, publication, policy))
}

/// Build the render engine for one build run.
pub(crate) fn build_renderer(config: &Config) -> Renderer {
    Renderer::new(RendererConfig {
        templates_dir: config.roots_resolved.templates_dir(),
        renderable: config
            .filetypes
            .renderable
            .iter()
            .cloned()
            .collect::<HashSet<_>>(),
        dev_root: config.roots_resolved.dev.clone(),
        web_root: config.roots_resolved.web.clone(),
    })
}
