//! Source file discovery.
//!
//! Walks each configured source root below the project base and yields the
//! files whose extension is recognized. Excluded directory names prune whole
//! subtrees; entries containing glob syntax are matched against the path
//! relative to the base. Directory entries are visited in file-name order so
//! two runs over an unchanged tree yield the same sequence.

use miette::Diagnostic;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;

/// Errors that abort a scan.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ScanError {
    /// A configured source root does not exist.
    #[error("source root not found: {0}")]
    #[diagnostic(
        code(arch_health::scan::root_not_found),
        help("check `analyzer.root` and `analyzer.sources` in arch-health.toml")
    )]
    RootNotFound(PathBuf),

    /// An exclude entry is not a valid glob pattern.
    #[error("invalid exclude pattern '{pattern}': {message}")]
    #[diagnostic(code(arch_health::scan::pattern))]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Parser message.
        message: String,
    },
}

/// A file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk.
    pub path: PathBuf,
    /// Path relative to the project base, `/`-separated.
    pub id: String,
}

/// Enumerates source files under one or more roots.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    base: PathBuf,
    sources: Vec<PathBuf>,
    exclude_names: Vec<String>,
    exclude_globs: Vec<glob::Pattern>,
    extensions: Vec<String>,
    respect_gitignore: bool,
}

impl SourceScanner {
    /// Builds a scanner from analyzer settings, resolving `config.root`
    /// against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Pattern`] if an exclude glob does not parse.
    pub fn from_config(base: &Path, config: &AnalyzerConfig) -> Result<Self, ScanError> {
        let base = if config.root.is_absolute() {
            config.root.clone()
        } else {
            base.join(&config.root)
        };

        let mut exclude_names = Vec::new();
        let mut exclude_globs = Vec::new();
        for entry in &config.exclude {
            if is_glob(entry) {
                let pattern = glob::Pattern::new(entry).map_err(|e| ScanError::Pattern {
                    pattern: entry.clone(),
                    message: e.to_string(),
                })?;
                exclude_globs.push(pattern);
            } else {
                exclude_names.push(entry.trim_matches('/').to_string());
            }
        }

        Ok(Self {
            base,
            sources: config.sources.clone(),
            exclude_names,
            exclude_globs,
            extensions: config.extensions.clone(),
            respect_gitignore: config.respect_gitignore,
        })
    }

    /// The resolved project base.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Lazily walks every source root.
    ///
    /// Unreadable entries are logged and skipped. Files reachable from two
    /// overlapping roots are yielded once.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RootNotFound`] before walking if any root is missing.
    pub fn files(&self) -> Result<impl Iterator<Item = SourceFile> + '_, ScanError> {
        let roots = self
            .sources
            .iter()
            .map(|s| self.base.join(s))
            .collect::<Vec<_>>();

        if let Some(missing) = roots.iter().find(|r| !r.is_dir()) {
            return Err(ScanError::RootNotFound(missing.clone()));
        }

        let mut seen = HashSet::new();
        Ok(roots
            .into_iter()
            .flat_map(move |root| self.walk(&root))
            .filter(move |file| seen.insert(file.id.clone())))
    }

    fn walk(&self, root: &Path) -> impl Iterator<Item = SourceFile> + '_ {
        debug!("Scanning {}", root.display());

        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .ignore(false)
            .parents(false)
            .git_global(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let base = self.base.clone();
        let names = self.exclude_names.clone();
        let globs = self.exclude_globs.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir && names.iter().any(|n| entry.file_name() == n.as_str()) {
                return false;
            }
            let rel = relative_id(&base, entry.path());
            !globs.iter().any(|g| g.matches(&rel))
        });

        builder.build().filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    return None;
                }
                let path = entry.into_path();
                if !self.has_source_extension(&path) {
                    return None;
                }
                let id = relative_id(&self.base, &path);
                Some(SourceFile { path, id })
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                None
            }
        })
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '[', '/'])
}

/// Path of `path` relative to `base`, joined with `/`.
#[must_use]
pub fn relative_id(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
