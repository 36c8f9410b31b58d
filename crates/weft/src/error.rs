//! CLI error types.

use weft_config::ConfigError;
use weft_plugin::{DiscoveryError, PluginActionError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Discovery(#[from] DiscoveryError),

    #[error("{0}")]
    Plugin(#[from] PluginActionError),
}
