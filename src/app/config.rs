use crate::app::cli::Cli;
use crate::app::error::Error;
use crate::app::models::{ExtensionFilter, ScanConfig, UnreadablePolicy};
use crate::app::profile::{merge_vecs, resolve_profile, Profile};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Project file read with `--config`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub path: PathBuf,
    pub extension: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub exclude_dir: Vec<String>,
}

impl ProjectConfig {
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        let parsed: Self = serde_yml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid project file {}: {}", path.display(), e)))?;
        Ok(parsed)
    }
}

/// Merges, in order of precedence: CLI arguments, the YAML project file and
/// the language profile. Exclusion lists are concatenated, not replaced.
pub fn resolve_config(cli: &Cli, user_profiles: &HashMap<String, Profile>) -> Result<ScanConfig> {
    let project = cli
        .config
        .as_deref()
        .map(ProjectConfig::from_yaml)
        .transpose()?;

    let path = cli
        .path
        .clone()
        .or_else(|| project.as_ref().map(|p| p.path.clone()))
        .ok_or_else(|| Error::config("no directory given (pass PATH or set `path` in --config)"))?;

    let extension = cli
        .extension
        .clone()
        .or_else(|| project.as_ref().map(|p| p.extension.clone()))
        .ok_or_else(|| {
            Error::config("no extension given (pass EXTENSION or set `extension` in --config)")
        })?;

    let title = cli
        .title
        .clone()
        .or_else(|| project.as_ref().and_then(|p| p.title.clone()));

    let project_dirs = project.map(|p| p.exclude_dir).unwrap_or_default();
    let mut exclude_dir = merge_vecs(project_dirs, cli.exclude_dir.clone());

    let profile = if cli.no_profile {
        Profile::default()
    } else {
        let filter: ExtensionFilter = extension.parse()?;
        resolve_profile(filter, user_profiles)
    };
    exclude_dir = merge_vecs(exclude_dir, profile.exclude_dir);

    let policy = if cli.strict {
        UnreadablePolicy::Abort
    } else {
        UnreadablePolicy::Skip
    };

    log::debug!(
        "Resolved config: path={}, extension={}, exclude_dir={:?}",
        path.display(),
        extension,
        exclude_dir
    );

    let mut builder = ScanConfig::builder(path, extension)
        .exclude_dirs(exclude_dir)
        .exclude_files(profile.exclude_file)
        .include_files(profile.include_file)
        .title(title)
        .unreadable_policy(policy);
    if let Some(dir) = &cli.output_dir {
        builder = builder.output_dir(dir);
    }

    Ok(builder.build()?)
}
