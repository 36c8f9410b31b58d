//! Plugin capability, discovery and dispatch engine for weft.
//!
//! This crate is the extension seam of the build tool. It provides:
//!
//! - [`ContentPlugin`] / [`ProjectPlugin`]: the two-operation plugin
//!   capability (`register` for identity and ordering, `action` for the
//!   processing step)
//! - [`PluginSource`]: abstraction over the category-addressed loading
//!   mechanism, with [`DirectorySource`] for filesystem-addressed plugin
//!   sets and [`StaticSource`] for fixed in-memory sets
//! - [`discover_content`] / [`discover_project`]: registry construction
//!   with priority ordering
//! - [`Dispatcher`]: the hook entry points that drive plugins for a build
//!
//! # Architecture
//!
//! Discovery runs once per process invocation and produces immutable,
//! priority-sorted registries. The dispatch engine then routes content
//! items through per-extension plugin chains (a fold where each plugin
//! can multiply, replace or drop the elements produced by the previous
//! one) and runs backup/publication plugins for their side effects.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use weft_plugin::{
//!     ActionResult, ContentPlugin, Descriptor, Dispatcher, FailurePolicy,
//!     PluginActionError, ProjectRegistry, StaticSource, discover_content,
//! };
//!
//! struct Upper;
//!
//! impl ContentPlugin for Upper {
//!     fn register(&self) -> Descriptor {
//!         Descriptor::new("upper", 10)
//!     }
//!
//!     fn extensions(&self) -> Vec<String> {
//!         vec!["md".to_owned()]
//!     }
//!
//!     fn action(&self, item: serde_json::Value) -> Result<ActionResult, PluginActionError> {
//!         Ok(item.into())
//!     }
//! }
//!
//! let source = StaticSource::new().with_content(Arc::new(Upper));
//! let registry = discover_content(&source).unwrap();
//! let dispatcher = Dispatcher::new(
//!     registry,
//!     ProjectRegistry::default(),
//!     ProjectRegistry::default(),
//!     FailurePolicy::Abort,
//! );
//! let results = dispatcher.hook_content(json!({"extension": "md"})).unwrap();
//! assert_eq!(results.len(), 1);
//! ```

mod directory;
mod discovery;
mod dispatch;
mod plugin;
mod registry;
mod source;

pub use directory::{ContentFactory, DirectorySource, ProjectFactory};
pub use discovery::{DiscoveryError, ProjectCategory, discover_content, discover_project};
pub use dispatch::{Dispatcher, FailurePolicy};
pub use plugin::{ActionResult, ContentPlugin, Descriptor, PluginActionError, ProjectPlugin};
pub use registry::{ContentRegistry, ProjectRegistry};
pub use source::{PluginSource, StaticSource};
