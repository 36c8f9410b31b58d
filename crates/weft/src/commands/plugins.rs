//! The `plugins` command: show the discovered registries.

use std::path::PathBuf;

use clap::Args;

use weft_config::Config;

use crate::error::CliError;
use crate::output::Output;
use crate::setup::build_dispatcher;

/// Arguments for the `plugins` command.
#[derive(Args)]
pub(crate) struct PluginsArgs {
    /// Path to the configuration file (default: discover weft.toml upward).
    #[arg(long, env = "WEFT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl PluginsArgs {
    /// Discover all categories and print the resulting registries.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let dispatcher = build_dispatcher(&config)?;

        output.highlight("Content plugins");
        let registry = dispatcher.content_registry();
        if registry.is_empty() {
            output.info("  (none)");
        }
        let mut extensions: Vec<&str> = registry.extensions().collect();
        extensions.sort_unstable();
        for extension in extensions {
            let chain = registry.chain(extension).unwrap_or_default();
            let names: Vec<String> = chain
                .iter()
                .map(|p| {
                    let d = p.register();
                    format!("{} ({})", d.name, d.priority)
                })
                .collect();
            output.info(&format!("  .{extension}: {}", names.join(" -> ")));
        }

        for (title, registry) in [
            ("Backup plugins", dispatcher.backup_registry()),
            ("Publication plugins", dispatcher.publication_registry()),
        ] {
            output.highlight(title);
            if registry.is_empty() {
                output.info("  (none)");
            }
            for plugin in registry.iter() {
                let d = plugin.register();
                output.info(&format!("  {} ({})", d.name, d.priority));
            }
        }

        Ok(())
    }
}
