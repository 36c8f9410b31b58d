//! Template render engine for weft.
//!
//! This crate turns one source document into one output artifact: it
//! resolves a template, extracts body and metadata through
//! [`weft_content`], gathers the sibling media files, and renders the
//! template with the three named inputs `content`, `context` and `media`.
//!
//! # Architecture
//!
//! The engine delegates through two collaborator traits:
//! - [`TemplateResolver`]: maps a source document to a template
//!   identifier ([`FrontMatterResolver`] reads the `template` front
//!   matter key)
//! - [`PathRewrite`]: pure dev-to-web name transform applied to gathered
//!   media ([`DevToWeb`] swaps the dev root prefix for the web root)
//!
//! Templates are minijinja, loaded from the configured template
//! directory.
//!
//! # Example
//!
//! ```ignore
//! use std::collections::HashSet;
//! use std::path::PathBuf;
//! use weft_render::{Renderer, RendererConfig};
//!
//! let renderer = Renderer::new(RendererConfig {
//!     templates_dir: PathBuf::from("site/templates"),
//!     renderable: HashSet::from(["md".to_string()]),
//!     dev_root: PathBuf::from("site"),
//!     web_root: PathBuf::from("public"),
//! });
//! renderer.render(&PathBuf::from("site/doc.md"), &PathBuf::from("public/doc.html"))?;
//! assert_eq!(renderer.count(), 1);
//! ```

mod renderer;
mod resolve;
mod rewrite;

pub use renderer::{RenderError, Renderer, RendererConfig};
pub use resolve::{FrontMatterResolver, TemplateResolutionError, TemplateResolver};
pub use rewrite::{DevToWeb, PathRewrite};
