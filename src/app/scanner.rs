use crate::app::error::{Error, Result};
use crate::app::models::{MatchKind, MatchedFile, ScanConfig, INFRASTRUCTURE_FILES};
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::collections::BTreeSet;
use std::path::Path;

/// Walks the configured root and selects the files that go into the document.
pub struct Scanner<'a> {
    config: &'a ScanConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Depth-first walk, entries at each level sorted by name, excluded
    /// directories pruned before they are entered.
    pub fn scan(&self) -> Result<Vec<MatchedFile>> {
        let root = self.config.root();
        if !root.is_dir() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let excluded = self.config.excluded_dirs().clone();

        // Plain traversal: no gitignore, no hidden-file rules.
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !is_pruned(entry, &excluded))
            .build();

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    // Symlinked files are read through; symlinked directories are not entered.
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file())
                        || (entry.path_is_symlink() && entry.path().is_file());
                    if !is_file {
                        continue;
                    }
                    if let Some(matched) = self.process_entry(entry.path()) {
                        log::debug!("Matched {} (depth {})", matched.relative_path, matched.depth);
                        files.push(matched);
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        Ok(files)
    }

    fn process_entry(&self, path: &Path) -> Option<MatchedFile> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("Skipping non UTF-8 file name: {}", path.display());
            return None;
        };

        // Would break the headings and the tree lines.
        if name.contains(['\n', '\r']) {
            log::warn!("Skipping file with a line break in its name: {:?}", path);
            return None;
        }

        if self.config.is_excluded_file(name) {
            return None;
        }

        let kind = if self.config.filter().matches(name) {
            MatchKind::Source
        } else if INFRASTRUCTURE_FILES.contains(&name) || self.config.is_extra_file(name) {
            MatchKind::Infrastructure
        } else {
            return None;
        };

        let relative = diff_paths(path, self.config.root())?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        Some(MatchedFile {
            path: path.to_path_buf(),
            relative_path: parts.join("/"),
            depth: parts.len().saturating_sub(1),
            kind,
        })
    }
}

/// Directories named in the exclusion set are never descended into.
/// The root itself is always walked.
fn is_pruned(entry: &DirEntry, excluded: &BTreeSet<String>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
        return false;
    }
    let pruned = entry
        .file_name()
        .to_str()
        .is_some_and(|name| excluded.contains(name));
    if pruned {
        log::debug!("Pruning excluded directory {}", entry.path().display());
    }
    pruned
}
