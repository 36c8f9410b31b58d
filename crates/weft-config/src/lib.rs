//! Configuration management for weft.
//!
//! Parses `weft.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `roots.dev`
//! - `roots.web`
//! - `plugins.dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the development (source) root.
    pub dev_root: Option<PathBuf>,
    /// Override the web (output) root.
    pub web_root: Option<PathBuf>,
    /// Override the plugin failure policy.
    pub on_error: Option<PluginErrorPolicy>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "weft.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root path configuration (paths are relative strings from TOML).
    roots: RootsRaw,
    /// Filetype classification.
    pub filetypes: FiletypesConfig,
    /// Plugin loading configuration (paths are relative strings from TOML).
    plugins: PluginsRaw,

    /// Resolved root paths (set after loading).
    #[serde(skip)]
    pub roots_resolved: RootsConfig,
    /// Resolved plugin configuration (set after loading).
    #[serde(skip)]
    pub plugins_resolved: PluginsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw root configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RootsRaw {
    dev: Option<String>,
    web: Option<String>,
}

/// Resolved root paths with the config directory applied.
#[derive(Debug, Default, Clone)]
pub struct RootsConfig {
    /// Development root: the source tree that gets built.
    pub dev: PathBuf,
    /// Web root: where rendered output is placed.
    pub web: PathBuf,
    /// Project directory for weft data (.weft/).
    pub project_dir: PathBuf,
}

impl RootsConfig {
    /// Template directory inside the dev root.
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.dev.join("templates")
    }

    /// Snapshot directory for backup plugins (.weft/snapshots/).
    #[must_use]
    pub fn snapshots_dir(&self) -> PathBuf {
        self.project_dir.join("snapshots")
    }
}

/// Filetype classification.
///
/// Extensions in `renderable` are template/content sources; everything else
/// is treated as opaque media.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FiletypesConfig {
    /// Extensions (without the dot) rendered through templates.
    pub renderable: Vec<String>,
}

impl Default for FiletypesConfig {
    fn default() -> Self {
        Self {
            renderable: vec!["md".to_owned()],
        }
    }
}

/// Raw plugin configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PluginsRaw {
    dir: Option<String>,
    on_error: Option<PluginErrorPolicy>,
}

/// Resolved plugin configuration.
#[derive(Debug, Default, Clone)]
pub struct PluginsConfig {
    /// Root directory holding `content/`, `backup/` and `publication/`
    /// category subdirectories.
    pub dir: PathBuf,
    /// What the dispatch engine does when a plugin action fails.
    pub on_error: PluginErrorPolicy,
}

/// Failure policy for plugin actions during a hook invocation.
///
/// Applied uniformly across content, backup and publication hooks.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PluginErrorPolicy {
    /// The first failing plugin aborts the hook.
    #[default]
    Abort,
    /// Failures are logged; remaining plugins still run.
    Continue,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`roots.dev`").
        field: String,
        /// Error message (e.g., "${`WEFT_SITE`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `weft.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dev) = &settings.dev_root {
            self.roots_resolved.dev.clone_from(dev);
        }
        if let Some(web) = &settings.web_root {
            self.roots_resolved.web.clone_from(web);
        }
        if let Some(on_error) = settings.on_error {
            self.plugins_resolved.on_error = on_error;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            roots: RootsRaw::default(),
            filetypes: FiletypesConfig::default(),
            plugins: PluginsRaw::default(),
            roots_resolved: RootsConfig {
                dev: base.join("site"),
                web: base.join("public"),
                project_dir: base.join(".weft"),
            },
            plugins_resolved: PluginsConfig {
                dir: base.join("plugins"),
                on_error: PluginErrorPolicy::Abort,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid
    /// values. Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filetypes.renderable.is_empty() {
            return Err(ConfigError::Validation(
                "filetypes.renderable cannot be empty".to_owned(),
            ));
        }
        for ext in &self.filetypes.renderable {
            if ext.is_empty() {
                return Err(ConfigError::Validation(
                    "filetypes.renderable entries cannot be empty".to_owned(),
                ));
            }
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "filetypes.renderable entries are written without a leading dot: {ext}"
                )));
            }
        }
        if self.roots_resolved.dev == self.roots_resolved.web {
            return Err(ConfigError::Validation(
                "roots.dev and roots.web must differ".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dev) = self.roots.dev {
            self.roots.dev = Some(expand::expand_env(dev, "roots.dev")?);
        }
        if let Some(ref web) = self.roots.web {
            self.roots.web = Some(expand::expand_env(web, "roots.web")?);
        }
        if let Some(ref dir) = self.plugins.dir {
            self.plugins.dir = Some(expand::expand_env(dir, "plugins.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.roots_resolved = RootsConfig {
            dev: resolve(self.roots.dev.as_deref(), "site"),
            web: resolve(self.roots.web.as_deref(), "public"),
            project_dir: config_dir.join(".weft"),
        };

        self.plugins_resolved = PluginsConfig {
            dir: resolve(self.plugins.dir.as_deref(), "plugins"),
            on_error: self.plugins.on_error.unwrap_or_default(),
        };
    }
}
