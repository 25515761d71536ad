//! Wire format for a JSON export of the host's plugin pool.
//!
//! The loader is tolerant the way the host's own exports are: unknown
//! fields are ignored and optional fields may be absent. Stricter schema
//! enforcement is the host's job.

use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use lintstrap_types::{Capability, Plugin, PluginRequirement, RequiredSetting, TypeSig};

use crate::InMemoryCatalog;

#[derive(Debug, Error)]
pub enum CatalogWireError {
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct PluginRecord {
    name: String,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    can_detect: Vec<String>,
    #[serde(default)]
    can_fix: Vec<String>,
    #[serde(default)]
    requirements: Vec<PluginRequirement>,
    #[serde(default)]
    settings: Vec<SettingRecord>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    requirements_satisfied: bool,
}

#[derive(Debug, Deserialize)]
struct SettingRecord {
    key: String,
    #[serde(default)]
    help: String,
    #[serde(rename = "type", default)]
    kind: TypeRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TypeRecord {
    Str,
    Int,
    Bool,
    OneOf(Vec<String>),
    ListOf(Box<TypeRecord>),
    AnyOf(Vec<TypeRecord>),
}

impl Default for TypeRecord {
    fn default() -> Self {
        TypeRecord::Str
    }
}

impl From<TypeRecord> for TypeSig {
    fn from(record: TypeRecord) -> Self {
        match record {
            TypeRecord::Str => TypeSig::Str,
            TypeRecord::Int => TypeSig::Int,
            TypeRecord::Bool => TypeSig::Bool,
            TypeRecord::OneOf(allowed) => TypeSig::OneOf(allowed),
            TypeRecord::ListOf(inner) => TypeSig::ListOf(Box::new((*inner).into())),
            TypeRecord::AnyOf(alts) => {
                TypeSig::AnyOf(alts.into_iter().map(Into::into).collect())
            }
        }
    }
}

fn capabilities(names: &[String], plugin: &str) -> BTreeSet<Capability> {
    let mut out = BTreeSet::new();
    for name in names {
        match name.parse() {
            Ok(cap) => {
                out.insert(cap);
            }
            Err(_) => {
                // Third-party metadata is not validated; skip what we
                // do not know.
                warn!(plugin, capability = %name, "unknown capability in catalog, ignoring");
            }
        }
    }
    out
}

impl From<PluginRecord> for Plugin {
    fn from(record: PluginRecord) -> Self {
        let can_detect = capabilities(&record.can_detect, &record.name);
        let can_fix = capabilities(&record.can_fix, &record.name);
        Plugin {
            can_detect,
            can_fix,
            languages: record.languages.into_iter().collect(),
            requirements: record.requirements,
            settings: record
                .settings
                .into_iter()
                .map(|s| RequiredSetting {
                    key: s.key,
                    help: s.help,
                    kind: s.kind.into(),
                })
                .collect(),
            dependencies: record.dependencies,
            requirements_satisfied: record.requirements_satisfied,
            name: record.name,
        }
    }
}

/// Parse a catalog from the host's JSON export (a top-level array of
/// plugin records).
pub fn catalog_from_json(contents: &str) -> Result<InMemoryCatalog, CatalogWireError> {
    let records: Vec<PluginRecord> = serde_json::from_str(contents)?;
    Ok(InMemoryCatalog::new(records.into_iter().map(Plugin::from)))
}
