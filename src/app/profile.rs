use crate::app::error::Error;
use crate::app::models::ExtensionFilter;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-language exclusions and extra inclusions merged into the scan config.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub exclude_dir: Vec<String>,
    pub exclude_file: Vec<String>,
    pub include_file: Vec<String>,
}

impl Profile {
    fn from_slices(exclude_dir: &[&str], exclude_file: &[&str], include_file: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            exclude_dir: owned(exclude_dir),
            exclude_file: owned(exclude_file),
            include_file: owned(include_file),
        }
    }

    /// Shared by every language.
    pub fn common() -> Self {
        Self::from_slices(
            &[".vscode", ".idea", ".githook", ".githooks", ".git", ".aider.tags.cache.v3"],
            &[".gitignore", ".gitkeep"],
            &["Makefile"],
        )
    }

    pub fn builtin(filter: ExtensionFilter) -> Self {
        match filter {
            ExtensionFilter::Py => Self::from_slices(
                &[".venv", "venv", "__pycache__", ".mypy_cache"],
                &["__init__.py", "*.pyc"],
                &[],
            ),
            ExtensionFilter::Dart => Self::from_slices(
                &["ios", "android", "macos", "window", "web", "build", "assets", ".dart_tool"],
                &["*.g.dart", "*.gr.dart"],
                &["pubspec.yaml"],
            ),
            ExtensionFilter::Sql => Self::default(),
        }
    }

    /// Appends `other`'s entries, keeping the first occurrence of duplicates.
    pub fn merge(mut self, other: Profile) -> Self {
        self.exclude_dir = merge_vecs(self.exclude_dir, other.exclude_dir);
        self.exclude_file = merge_vecs(self.exclude_file, other.exclude_file);
        self.include_file = merge_vecs(self.include_file, other.include_file);
        self
    }
}

pub fn merge_vecs(mut base: Vec<String>, mut extra: Vec<String>) -> Vec<String> {
    base.append(&mut extra);
    let mut seen = std::collections::HashSet::new();
    base.retain(|item| seen.insert(item.clone()));
    base
}

/// `~/.config/code_digest/profiles.toml`
pub fn user_profiles_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("code_digest")
            .join("profiles.toml")
    })
}

/// Tables keyed by extension (`[py]`, `[dart]`, `[sql]`). A missing file
/// yields no overrides.
pub fn load_user_profiles(path: &Path) -> Result<HashMap<String, Profile>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profiles at {}", path.display()))?;

    let parsed: HashMap<String, Profile> = toml::from_str(&content)
        .map_err(|e| Error::config(format!("invalid profiles file {}: {}", path.display(), e)))?;

    for key in parsed.keys() {
        if key.parse::<ExtensionFilter>().is_err() {
            log::warn!(
                "Ignoring profile '{}' in {}: not a supported extension",
                key,
                path.display()
            );
        }
    }

    Ok(parsed)
}

/// Common defaults, then the language's built-ins, then any user overrides.
pub fn resolve_profile(filter: ExtensionFilter, user: &HashMap<String, Profile>) -> Profile {
    let mut profile = Profile::common().merge(Profile::builtin(filter));
    if let Some(extra) = user.get(filter.as_str()) {
        profile = profile.merge(extra.clone());
    }
    profile
}
