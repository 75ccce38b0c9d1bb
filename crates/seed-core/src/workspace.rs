//! Workspace inspection for the safety check
//!
//! Generated elements install their bower dependencies as siblings, so the
//! directory the generator runs in should hold nothing but components.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use walkdir::WalkDir;

/// Manifest that marks a directory as a component
pub const COMPONENT_MANIFEST: &str = "bower.json";

/// Top-level entries of a workspace, split into components and everything else
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceScan {
    /// Non-hidden top-level entry names, sorted
    pub entries: Vec<OsString>,
    /// Directories holding a component manifest, sorted
    pub component_dirs: Vec<OsString>,
}

impl WorkspaceScan {
    /// Entries that are not component directories
    pub fn foreign(&self) -> Vec<&OsStr> {
        self.entries
            .iter()
            .filter(|entry| !self.component_dirs.contains(entry))
            .map(OsString::as_os_str)
            .collect()
    }

    pub fn has_foreign_entries(&self) -> bool {
        !self.foreign().is_empty()
    }
}

/// List the top level of `dir` the way a `*` glob would (hidden entries skipped)
pub fn scan_workspace(dir: &Path) -> Result<WorkspaceScan> {
    let mut scan = WorkspaceScan::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !is_hidden(entry.file_name().to_string_lossy().as_ref())
        });

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to list workspace: {}", dir.display()))?;
        let name = entry.file_name().to_os_string();

        // Symlinked checkouts count as components too
        if entry.path().is_dir() && entry.path().join(COMPONENT_MANIFEST).is_file() {
            scan.component_dirs.push(name.clone());
        }
        scan.entries.push(name);
    }

    tracing::debug!(
        dir = %dir.display(),
        entries = scan.entries.len(),
        components = scan.component_dirs.len(),
        "scanned workspace"
    );

    Ok(scan)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
