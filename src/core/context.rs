use std::{
    cell::OnceCell,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use rayon::prelude::*;

use crate::{
    config::{Config, load_config},
    core::file_scanner::scan_files,
    issues::ParseErrorIssue,
};

/// A manifest read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
}

/// Analysis context for one `check` run.
///
/// Holds the merged configuration and the manifests to check. Sources are
/// read lazily, in parallel, on first access.
///
/// # Configuration Priority
///
/// 1. CLI arguments (explicit paths)
/// 2. `.modrefrc.json` found from the root directory upwards
/// 3. Built-in defaults
pub struct CheckContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (for resolving relative paths).
    pub root_dir: PathBuf,

    /// Manifests to check, sorted.
    pub files: Vec<String>,

    /// Number of paths that could not be walked.
    pub skipped_count: usize,

    sources: OnceCell<Vec<SourceFile>>,
    source_errors: OnceCell<Vec<ParseErrorIssue>>,
}

impl CheckContext {
    /// Load configuration from `root_dir` and scan for manifests.
    ///
    /// Non-empty `paths` replace the configured includes.
    ///
    /// # Errors
    ///
    /// Returns error if the root is not a directory or the config file is
    /// invalid.
    pub fn new(root_dir: &Path, paths: &[PathBuf]) -> Result<Self> {
        if !root_dir.is_dir() {
            anyhow::bail!("Root directory does not exist: {}", root_dir.display());
        }

        let config_result = load_config(root_dir)
            .with_context(|| format!("Failed to load configuration from {}", root_dir.display()))?;

        match &config_result.path {
            Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
            None => tracing::debug!("no config file found, using defaults"),
        }

        let mut config = config_result.config;

        if !paths.is_empty() {
            config.includes = paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
        }

        let scan_result = scan_files(root_dir, &config.includes, &config.ignores);
        let mut files: Vec<String> = scan_result.files.into_iter().collect();
        files.sort();

        if scan_result.skipped_count > 0 {
            tracing::warn!(
                count = scan_result.skipped_count,
                "path(s) skipped due to access errors"
            );
        }

        Ok(Self::from_parts(config, root_dir.to_path_buf(), files, scan_result.skipped_count))
    }

    fn from_parts(config: Config, root_dir: PathBuf, files: Vec<String>, skipped_count: usize) -> Self {
        Self {
            config,
            root_dir,
            files,
            skipped_count,
            sources: OnceCell::new(),
            source_errors: OnceCell::new(),
        }
    }

    /// Contents of every readable manifest, in file order.
    pub fn sources(&self) -> &Vec<SourceFile> {
        self.load_sources();
        self.sources.get_or_init(Vec::new)
    }

    /// Manifests that could not be read.
    pub fn source_errors(&self) -> &Vec<ParseErrorIssue> {
        self.load_sources();
        self.source_errors.get_or_init(Vec::new)
    }

    fn load_sources(&self) {
        if self.sources.get().is_some() {
            return;
        }

        let results: Vec<Result<SourceFile, ParseErrorIssue>> = self
            .files
            .par_iter()
            .map(|path| {
                fs::read_to_string(path)
                    .map(|source| SourceFile {
                        path: path.clone(),
                        source,
                    })
                    .map_err(|e| {
                        tracing::debug!(path = %path, error = %e, "failed to read manifest");
                        ParseErrorIssue {
                            file_path: path.clone(),
                            error: e.to_string(),
                        }
                    })
            })
            .collect();

        let mut sources = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(file) => sources.push(file),
                Err(issue) => errors.push(issue),
            }
        }

        let _ = self.sources.set(sources);
        let _ = self.source_errors.set(errors);
    }
}
