//! Built-in content, backup and publication plugins for weft.
//!
//! These are the implementations shipped with the tool:
//!
//! - [`Drafts`] (content): drops documents marked `draft: true`
//! - [`CleanUrls`] (content): rewrites `name.html` destinations to
//!   `name/index.html`
//! - [`SnapshotBackup`] (backup): copies the dev tree into a timestamped
//!   snapshot directory
//! - [`Sitemap`] (publication): writes `sitemap.xml` over the web root
//!
//! [`register_defaults`] wires all of them into a
//! [`DirectorySource`](weft_plugin::DirectorySource) factory table; which
//! ones actually load is decided by the entries present in the project's
//! plugin directory tree.

mod clean_urls;
mod drafts;
mod sitemap;
mod snapshot;

use std::path::PathBuf;
use std::sync::Arc;

use weft_plugin::DirectorySource;

pub use clean_urls::CleanUrls;
pub use drafts::Drafts;
pub use sitemap::Sitemap;
pub use snapshot::SnapshotBackup;

/// Paths the built-in plugins operate on.
#[derive(Clone, Debug)]
pub struct BuiltinContext {
    /// Development root (source tree).
    pub dev_root: PathBuf,
    /// Web root (rendered output).
    pub web_root: PathBuf,
    /// Where backup snapshots are placed.
    pub snapshots_dir: PathBuf,
}

/// Register every built-in plugin factory on a directory source.
pub fn register_defaults(source: &mut DirectorySource, context: &BuiltinContext) {
    source.register_content("drafts", Box::new(|| Ok(Arc::new(Drafts))));
    source.register_content("clean_urls", Box::new(|| Ok(Arc::new(CleanUrls))));

    let dev_root = context.dev_root.clone();
    let snapshots_dir = context.snapshots_dir.clone();
    source.register_project(
        "snapshot",
        Box::new(move || Ok(Arc::new(SnapshotBackup::new(&dev_root, &snapshots_dir)))),
    );

    let web_root = context.web_root.clone();
    source.register_project(
        "sitemap",
        Box::new(move || Ok(Arc::new(Sitemap::new(&web_root)))),
    );
}
