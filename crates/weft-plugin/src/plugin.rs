//! The plugin capability contract.
//!
//! Every plugin exposes exactly two operations: `register`, a pure call
//! returning its [`Descriptor`], and `action`, the processing step. The
//! two trait variants differ only in how the dispatch engine invokes
//! `action`: content plugins receive one item per element flowing through
//! their chain, whole-project plugins are invoked once per build with no
//! argument.

use serde_json::Value;

/// Plugin identity used for ordering and identification.
///
/// Produced by `register()`; never stored separately from the instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Human-readable plugin name.
    pub name: String,
    /// Chain position: higher priority runs earlier.
    pub priority: i32,
}

impl Descriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

/// Result of a content plugin's `action` call.
///
/// The tagged shape makes the chain fold purely data-driven: `One` passes
/// a single value to the next stage, `Many` fans an item out into several
/// (or drops it entirely with an empty sequence). Dropping is an explicit
/// `Many(vec![])`, never an implicit falsy check.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionResult {
    /// A single value replaces the input element.
    One(Value),
    /// The input element is replaced by all listed values; empty drops it.
    Many(Vec<Value>),
}

impl From<Value> for ActionResult {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Value>> for ActionResult {
    fn from(values: Vec<Value>) -> Self {
        Self::Many(values)
    }
}

/// Error raised by a plugin's `action` call.
#[derive(Debug)]
pub struct PluginActionError {
    /// Name of the failing plugin.
    pub plugin: String,
    /// What went wrong.
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PluginActionError {
    /// Create a new action error.
    #[must_use]
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl std::fmt::Display for PluginActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "plugin '{}': {}", self.plugin, self.message)
    }
}

impl std::error::Error for PluginActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// A plugin participating in content processing.
///
/// Instances are constructed at discovery time and reused for every item
/// of a build, so implementations must be stateless or interior-mutable
/// in a thread-safe way.
pub trait ContentPlugin: Send + Sync {
    /// Plugin identity. Pure; callable repeatedly.
    fn register(&self) -> Descriptor;

    /// Extensions this plugin handles (without the dot, e.g. `"md"`).
    ///
    /// An implementation declaring multiple extensions is inserted into
    /// each extension's chain independently.
    fn extensions(&self) -> Vec<String>;

    /// Process one item flowing through the chain.
    ///
    /// Items are free-form JSON values; the build driver populates at
    /// least `extension`, `origin` and `destination`, but plugins may
    /// read and write arbitrary fields, and may return values of any
    /// shape for downstream stages.
    ///
    /// # Errors
    ///
    /// Returns [`PluginActionError`] when processing fails; the dispatch
    /// engine's failure policy decides what happens next.
    fn action(&self, item: Value) -> Result<ActionResult, PluginActionError>;
}

/// A plugin invoked once per build for its side effect.
///
/// Covers the backup and publication categories; which hook runs an
/// instance is decided by the category it was discovered under.
pub trait ProjectPlugin: Send + Sync {
    /// Plugin identity. Pure; callable repeatedly.
    fn register(&self) -> Descriptor;

    /// Perform the whole-project side effect (e.g. produce a backup
    /// artifact). Return values carry no meaning to the dispatch engine.
    ///
    /// # Errors
    ///
    /// Returns [`PluginActionError`] when the side effect fails.
    fn action(&self) -> Result<(), PluginActionError>;
}

impl std::fmt::Debug for dyn ContentPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentPlugin")
            .field("descriptor", &self.register())
            .finish()
    }
}

impl std::fmt::Debug for dyn ProjectPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectPlugin")
            .field("descriptor", &self.register())
            .finish()
    }
}
