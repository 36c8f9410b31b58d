//! CLI command implementations.

pub(crate) mod plugins;
pub(crate) mod rebuild;

pub(crate) use plugins::PluginsArgs;
pub(crate) use rebuild::RebuildArgs;
