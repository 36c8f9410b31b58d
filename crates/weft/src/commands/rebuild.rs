//! The `rebuild` command: build the entire project.

use std::path::PathBuf;

use clap::Args;

use weft_config::{CliSettings, Config, PluginErrorPolicy};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline;
use crate::setup::{build_dispatcher, build_renderer};

/// Arguments for the `rebuild` command.
#[derive(Args)]
pub(crate) struct RebuildArgs {
    /// Path to the configuration file (default: discover weft.toml upward).
    #[arg(long, env = "WEFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the development (source) root.
    #[arg(long)]
    pub dev_root: Option<PathBuf>,

    /// Override the web (output) root.
    #[arg(long)]
    pub web_root: Option<PathBuf>,

    /// Keep building when a plugin fails instead of aborting.
    #[arg(long)]
    pub keep_going: bool,

    /// Print build logs.
    #[arg(long, short)]
    pub verbose: bool,
}

impl RebuildArgs {
    /// Execute the rebuild.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let settings = CliSettings {
            dev_root: self.dev_root,
            web_root: self.web_root,
            on_error: self.keep_going.then_some(PluginErrorPolicy::Continue),
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;

        let dispatcher = build_dispatcher(&config)?;
        let renderer = build_renderer(&config);

        output.info(&format!(
            "Building {} -> {}",
            config.roots_resolved.dev.display(),
            config.roots_resolved.web.display()
        ));

        let report = pipeline::rebuild(&config, &dispatcher, &renderer, output)?;

        if report.failed > 0 {
            output.warning(&format!("{} document(s) failed", report.failed));
        }
        output.success(&format!(
            "Done: {} rendered, {} copied",
            report.rendered, report.copied
        ));
        Ok(())
    }
}
