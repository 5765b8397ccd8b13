use crate::app::error::{Error, Result};
use crate::app::models::{FileSection, MatchedFile, UnreadablePolicy};
use std::fs;
use std::path::Path;

/// Outcome of reading the matched files.
#[derive(Debug, Default)]
pub struct Collection {
    /// Readable files, in scan order.
    pub sections: Vec<FileSection>,
    /// Files left out under [`UnreadablePolicy::Skip`].
    pub skipped: Vec<(MatchedFile, Error)>,
}

pub struct ContentCollector {
    policy: UnreadablePolicy,
}

impl ContentCollector {
    pub fn new(policy: UnreadablePolicy) -> Self {
        Self { policy }
    }

    pub fn collect(&self, files: Vec<MatchedFile>) -> Result<Collection> {
        let mut collection = Collection::default();

        for file in files {
            match read_text(&file.path) {
                Ok(content) => collection.sections.push(FileSection { file, content }),
                Err(err) => match self.policy {
                    UnreadablePolicy::Abort => return Err(err),
                    UnreadablePolicy::Skip => {
                        log::warn!("Skipping {}: {}", file.relative_path, err);
                        collection.skipped.push((file, err));
                    }
                },
            }
        }

        Ok(collection)
    }
}

/// Reads the whole file and decodes it as UTF-8, unchanged.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    String::from_utf8(bytes).map_err(|e| Error::UnreadableFile {
        path: path.to_path_buf(),
        reason: format!("not valid UTF-8 ({})", e.utf8_error()),
    })
}
