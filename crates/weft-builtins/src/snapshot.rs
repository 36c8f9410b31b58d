//! Dev-tree snapshot backups.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use weft_plugin::{Descriptor, PluginActionError, ProjectPlugin};

/// Copies the development tree into a timestamped snapshot directory.
///
/// Snapshots land under the configured snapshot root, one directory per
/// run, named by the Unix timestamp (with a numeric suffix if two runs
/// share a second).
pub struct SnapshotBackup {
    dev_root: PathBuf,
    snapshots_dir: PathBuf,
}

impl SnapshotBackup {
    /// Create a backup plugin for the given trees.
    #[must_use]
    pub fn new(dev_root: impl Into<PathBuf>, snapshots_dir: impl Into<PathBuf>) -> Self {
        Self {
            dev_root: dev_root.into(),
            snapshots_dir: snapshots_dir.into(),
        }
    }

    /// Pick a fresh snapshot directory name.
    fn target_dir(&self) -> PathBuf {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let base = self.snapshots_dir.join(seconds.to_string());
        if !base.exists() {
            return base;
        }
        let mut counter = 1u32;
        loop {
            let candidate = self.snapshots_dir.join(format!("{seconds}-{counter}"));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn io_error(context: &str, path: &Path, source: std::io::Error) -> PluginActionError {
    PluginActionError::new("snapshot", format!("{context} {}", path.display())).with_source(source)
}

impl ProjectPlugin for SnapshotBackup {
    fn register(&self) -> Descriptor {
        Descriptor::new("snapshot", 0)
    }

    fn action(&self) -> Result<(), PluginActionError> {
        let target = self.target_dir();
        std::fs::create_dir_all(&target).map_err(|e| io_error("cannot create", &target, e))?;

        let walker = ignore::WalkBuilder::new(&self.dev_root).build();
        let mut copied = 0usize;
        for entry in walker {
            let entry = entry.map_err(|e| {
                PluginActionError::new("snapshot", "walking the dev tree failed").with_source(e)
            })?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.dev_root) else {
                continue;
            };
            let destination = target.join(relative);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent).map_err(|e| io_error("cannot create", parent, e))?;
            }
            std::fs::copy(path, &destination).map_err(|e| io_error("cannot copy", path, e))?;
            copied += 1;
        }

        tracing::info!(snapshot = %target.display(), files = copied, "backup snapshot written");
        Ok(())
    }
}
