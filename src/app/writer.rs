use crate::app::error::{Error, Result};
use crate::app::models::ScanConfig;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<output_dir>/<title-or-dirname>_<YYYYMMDD_HHMMSS>.md`
pub fn output_path(config: &ScanConfig, now: DateTime<Local>) -> PathBuf {
    let name: String = config
        .display_name()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    config
        .output_dir()
        .join(format!("{}_{}.md", name, now.format(TIMESTAMP_FORMAT)))
}

/// Creates missing parent directories and writes the document in one go.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| Error::io(path, e))
}
