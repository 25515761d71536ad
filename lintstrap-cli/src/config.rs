//! Configuration file loading for lintstrap.
//!
//! Discovers and loads `.lintstrap.toml` from the project root and
//! merges it with CLI flags (CLI takes precedence).

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

use lintstrap_catalog::important_plugins;
use lintstrap_prompt::DEFAULT_MAX_RETRIES;
use lintstrap_types::Capability;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = ".lintstrap.toml";

/// Top-level configuration from `.lintstrap.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LintstrapConfig {
    /// Selection knobs (allowlist additions, coverage target).
    pub selection: SelectionTable,

    /// Prompt knobs.
    pub prompt: PromptTable,
}

/// `[selection]` section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectionTable {
    /// Extra allowlist entries, extending the built-in table per language.
    pub allowlist: BTreeMap<String, Vec<String>>,

    /// Capability names overriding the default coverage target.
    pub coverage: Vec<String>,
}

/// `[prompt]` section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptTable {
    /// Retry cap for interactive questions.
    pub max_retries: Option<usize>,
}

/// Discover the `.lintstrap.toml` config file at the project root.
pub fn discover_config(project_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a `.lintstrap.toml` config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<LintstrapConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<LintstrapConfig> {
    let config: LintstrapConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return defaults if not found.
pub fn load_or_default(project_dir: &Utf8Path) -> anyhow::Result<LintstrapConfig> {
    match discover_config(project_dir) {
        Some(path) => load_config(&path),
        None => Ok(LintstrapConfig::default()),
    }
}

/// Merged configuration combining the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Built-in allowlist extended by config file entries.
    pub allowlist: BTreeMap<String, BTreeSet<String>>,

    /// Coverage target from the config file, if overridden there.
    pub coverage_target: Option<BTreeSet<Capability>>,

    /// Whether prompts are allowed at all.
    pub interactive: bool,

    /// Whether the capability filtering phases run.
    pub filter_by_capabilities: bool,

    /// Retry cap for interactive questions.
    pub max_retries: usize,
}

/// Builder for merging the config file with CLI flags.
pub struct ConfigMerger {
    config: LintstrapConfig,
}

impl ConfigMerger {
    pub fn new(config: LintstrapConfig) -> Self {
        Self { config }
    }

    pub fn merge_args(
        self,
        non_interactive: bool,
        no_filter_by_capabilities: bool,
    ) -> anyhow::Result<MergedConfig> {
        let mut allowlist = important_plugins();
        for (language, names) in self.config.selection.allowlist {
            allowlist
                .entry(language)
                .or_default()
                .extend(names);
        }

        let coverage_target = if self.config.selection.coverage.is_empty() {
            None
        } else {
            let mut target = BTreeSet::new();
            for name in &self.config.selection.coverage {
                let cap: Capability = name
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("unknown capability `{name}` in [selection].coverage"))?;
                target.insert(cap);
            }
            Some(target)
        };

        Ok(MergedConfig {
            allowlist,
            coverage_target,
            interactive: !non_interactive,
            filter_by_capabilities: !no_filter_by_capabilities,
            max_retries: self
                .config
                .prompt
                .max_retries
                .unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}
