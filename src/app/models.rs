use crate::app::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File names collected no matter which extension is configured.
pub const INFRASTRUCTURE_FILES: [&str; 3] =
    ["Dockerfile", "docker-compose.yaml", "docker-compose.yml"];

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// The supported source-file classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionFilter {
    Dart,
    Py,
    Sql,
}

impl ExtensionFilter {
    pub const ALL: [ExtensionFilter; 3] = [Self::Dart, Self::Py, Self::Sql];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dart => "dart",
            Self::Py => "py",
            Self::Sql => "sql",
        }
    }

    /// True when `file_name` ends with `.<ext>`, compared case-sensitively.
    pub fn matches(self, file_name: &str) -> bool {
        file_name
            .strip_suffix(self.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }
}

impl FromStr for ExtensionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                Error::config(format!(
                    "unsupported extension '{}'; expected one of dart, py, sql",
                    s
                ))
            })
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when a matched file cannot be read as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreadablePolicy {
    /// Leave the file out and log a warning.
    #[default]
    Skip,
    /// Fail the whole run on the first unreadable file.
    Abort,
}

/// Fully resolved, validated scan settings. Built once per invocation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    root: PathBuf,
    filter: ExtensionFilter,
    excluded_dirs: BTreeSet<String>,
    excluded_files: GlobSet,
    extra_files: BTreeSet<String>,
    title: Option<String>,
    output_dir: PathBuf,
    unreadable: UnreadablePolicy,
}

impl ScanConfig {
    pub fn builder(root: impl Into<PathBuf>, extension: impl Into<String>) -> ScanConfigBuilder {
        ScanConfigBuilder {
            root: root.into(),
            extension: extension.into(),
            excluded_dirs: Vec::new(),
            excluded_files: Vec::new(),
            extra_files: Vec::new(),
            title: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            unreadable: UnreadablePolicy::default(),
        }
    }

    /// Canonical absolute path of the scanned directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> ExtensionFilter {
        self.filter
    }

    pub fn excluded_dirs(&self) -> &BTreeSet<String> {
        &self.excluded_dirs
    }

    pub fn is_excluded_file(&self, file_name: &str) -> bool {
        self.excluded_files.is_match(file_name)
    }

    /// Extra names compare case-insensitively, so `Makefile` also finds `makefile`.
    pub fn is_extra_file(&self, file_name: &str) -> bool {
        self.extra_files.contains(&file_name.to_lowercase())
    }

    /// The document heading: the title if one was given, else the root's name.
    pub fn display_name(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| dir_name(&self.root))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn unreadable_policy(&self) -> UnreadablePolicy {
        self.unreadable
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfigBuilder {
    root: PathBuf,
    extension: String,
    excluded_dirs: Vec<String>,
    excluded_files: Vec<String>,
    extra_files: Vec<String>,
    title: Option<String>,
    output_dir: PathBuf,
    unreadable: UnreadablePolicy,
}

impl ScanConfigBuilder {
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Glob patterns matched against file names, e.g. `__init__.py` or `*.g.dart`.
    pub fn exclude_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_files.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// File names (any case) collected in addition to the fixed infrastructure names.
    pub fn include_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_files.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn unreadable_policy(mut self, policy: UnreadablePolicy) -> Self {
        self.unreadable = policy;
        self
    }

    /// Validates everything up front so no scan starts with a bad config.
    pub fn build(self) -> Result<ScanConfig> {
        let filter: ExtensionFilter = self.extension.parse()?;

        let root = fs::canonicalize(&self.root)
            .map_err(|_| Error::PathNotFound(self.root.clone()))?;
        if !root.is_dir() {
            return Err(Error::PathNotFound(self.root));
        }

        Ok(ScanConfig {
            root,
            filter,
            excluded_dirs: self.excluded_dirs.into_iter().collect(),
            excluded_files: build_globset(&self.excluded_files)?,
            extra_files: self.extra_files.iter().map(|n| n.to_lowercase()).collect(),
            title: self.title,
            output_dir: self.output_dir,
            unreadable: self.unreadable,
        })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .map_err(|e| Error::config(format!("invalid file pattern '{}': {}", pat, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("failed to compile file patterns: {}", e)))
}

/// Last path component as a display string.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Matched by the configured extension.
    Source,
    /// Matched by name (Dockerfile, compose files, profile extras).
    Infrastructure,
}

/// A file selected by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    /// Relative to the scan root, always `/`-separated.
    pub relative_path: String,
    /// Directory nesting level; 0 for files directly in the root.
    pub depth: usize,
    pub kind: MatchKind,
}

impl MatchedFile {
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Code fence language tag; empty for names without an extension.
    pub fn language(&self) -> &str {
        Path::new(self.file_name())
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }
}

/// A matched file together with its text.
#[derive(Debug, Clone)]
pub struct FileSection {
    pub file: MatchedFile,
    pub content: String,
}

/// Everything needed to render the final Markdown.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub header: String,
    pub filter: ExtensionFilter,
    pub tree_text: String,
    pub sections: Vec<FileSection>,
}

impl GeneratedDocument {
    pub fn file_count(&self) -> usize {
        self.sections.len()
    }

    pub fn count_of(&self, kind: MatchKind) -> usize {
        self.sections.iter().filter(|s| s.file.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_filter_parse() {
        assert_eq!("py".parse::<ExtensionFilter>().unwrap(), ExtensionFilter::Py);
        assert_eq!("dart".parse::<ExtensionFilter>().unwrap(), ExtensionFilter::Dart);
        assert!(matches!(
            "rs".parse::<ExtensionFilter>(),
            Err(Error::Configuration(_))
        ));
        assert!("PY".parse::<ExtensionFilter>().is_err());
    }

    #[test]
    fn test_extension_filter_matches_exact_suffix() {
        let py = ExtensionFilter::Py;
        assert!(py.matches("main.py"));
        assert!(py.matches("archive.tar.py"));
        assert!(!py.matches("main.PY"));
        assert!(!py.matches("happy"));
        assert!(!py.matches("main.pyc"));
    }

    #[test]
    fn test_build_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let err = ScanConfig::builder(dir.path(), "rs").build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_build_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let err = ScanConfig::builder(dir.path().join("nope"), "py")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
    }

    #[test]
    fn test_build_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "x = 1\n").unwrap();
        let err = ScanConfig::builder(&file, "py").build().unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
    }

    #[test]
    fn test_build_rejects_bad_glob() {
        let dir = tempdir().unwrap();
        let err = ScanConfig::builder(dir.path(), "py")
            .exclude_files(["[unclosed"])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_display_name_prefers_title() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("my_project");
        fs::create_dir(&project).unwrap();

        let titled = ScanConfig::builder(&project, "py")
            .title(Some("Demo".into()))
            .build()
            .unwrap();
        assert_eq!(titled.display_name(), "Demo");

        let untitled = ScanConfig::builder(&project, "py")
            .title(Some("  ".into()))
            .build()
            .unwrap();
        assert_eq!(untitled.display_name(), "my_project");
    }

    #[test]
    fn test_extra_files_ignore_case() {
        let dir = tempdir().unwrap();
        let config = ScanConfig::builder(dir.path(), "py")
            .include_files(["Makefile"])
            .build()
            .unwrap();
        assert!(config.is_extra_file("Makefile"));
        assert!(config.is_extra_file("makefile"));
        assert!(config.is_extra_file("MAKEFILE"));
        assert!(!config.is_extra_file("Makefile.am"));
    }

    #[test]
    fn test_language_tag() {
        let file = |rel: &str| MatchedFile {
            path: PathBuf::from(rel),
            relative_path: rel.to_string(),
            depth: 0,
            kind: MatchKind::Source,
        };
        assert_eq!(file("sub/b.py").language(), "py");
        assert_eq!(file("docker-compose.yml").language(), "yml");
        assert_eq!(file("infra/Dockerfile").language(), "");
    }
}
