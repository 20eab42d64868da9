use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::extract::ReferencePolicy;
use crate::core::validate::DEFAULT_FORGE_URL;

pub const CONFIG_FILE_NAME: &str = ".modrefrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_internal_prefixes")]
    pub internal_prefixes: Vec<String>,
    #[serde(default = "default_forge_url")]
    pub forge_url: String,
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
}

fn default_includes() -> Vec<String> {
    ["manifests", "site"].map(String::from).to_vec()
}

fn default_internal_prefixes() -> Vec<String> {
    ["role", "profile"].map(String::from).to_vec()
}

fn default_forge_url() -> String {
    DEFAULT_FORGE_URL.to_string()
}

fn default_fail_fast() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            internal_prefixes: default_internal_prefixes(),
            forge_url: default_forge_url(),
            fail_fast: default_fail_fast(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns, unusable internal prefixes
    /// or an empty forge URL.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.internal_prefixes.is_empty() {
            bail!("'internalPrefixes' must name at least one prefix");
        }
        for prefix in &self.internal_prefixes {
            if prefix.trim().is_empty() || prefix.contains("::") {
                bail!(
                    "Invalid prefix in 'internalPrefixes': \"{}\" (expected a single namespace segment)",
                    prefix
                );
            }
        }

        if self.forge_url.trim().is_empty() {
            bail!("'forgeUrl' must not be empty");
        }

        Ok(())
    }

    /// Classification rules derived from `internalPrefixes`.
    pub fn reference_policy(&self) -> ReferencePolicy {
        ReferencePolicy::new(self.internal_prefixes.iter().map(|p| p.trim()))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config came from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {:?}", path))?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
