//! Environment variable and tilde expansion for configuration strings.

use crate::ConfigError;

/// Expand `~`, `$VAR` and `${VAR}` references in a configuration string.
///
/// `${VAR:-default}` falls back to the default when `VAR` is unset.
/// An unset variable without a default is an error.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.to_string(),
        })
}
