//! Adapter over the externally supplied plugin pool.
//!
//! The lint host's discovery mechanism owns the real plugin registry;
//! this crate only wraps whatever records it hands over (or a JSON
//! export of them), partitions them into per-language pools, and carries
//! the constant tables the selection engine is configured with.

mod allowlist;
mod builtin;
mod languages;
mod wire;

use std::collections::BTreeMap;

use lintstrap_types::{Plugin, ALL_LANGUAGE};

pub use allowlist::important_plugins;
pub use builtin::builtin_catalog;
pub use languages::{extensions_by_language, language_for_extension, split_by_language};
pub use wire::{catalog_from_json, CatalogWireError};

/// Read-only view over the host's plugin records.
pub trait PluginCatalog {
    fn all_plugins(&self) -> Vec<&Plugin>;

    fn get(&self, name: &str) -> Option<&Plugin>;

    /// Plugins applicable to `language` (not including the `All` pool
    /// unless asked for `All` itself).
    fn plugins_for(&self, language: &str) -> Vec<&Plugin> {
        self.all_plugins()
            .into_iter()
            .filter(|p| p.languages.contains(language))
            .collect()
    }
}

/// Catalog backed by an owned list of records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    plugins: BTreeMap<String, Plugin>,
}

impl InMemoryCatalog {
    pub fn new(plugins: impl IntoIterator<Item = Plugin>) -> Self {
        Self {
            plugins: plugins
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }
}

impl PluginCatalog for InMemoryCatalog {
    fn all_plugins(&self) -> Vec<&Plugin> {
        self.plugins.values().collect()
    }

    fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }
}

/// Partition the catalog into per-language pools for the given detected
/// languages plus `All`. Members of the `All` pool are excluded from
/// every specific-language pool.
pub fn partition_pools(
    catalog: &dyn PluginCatalog,
    languages: &[String],
) -> BTreeMap<String, Vec<Plugin>> {
    let all_pool: Vec<Plugin> = catalog
        .plugins_for(ALL_LANGUAGE)
        .into_iter()
        .cloned()
        .collect();

    let mut pools = BTreeMap::new();
    for lang in languages {
        if lang == ALL_LANGUAGE {
            continue;
        }
        let pool: Vec<Plugin> = catalog
            .plugins_for(lang)
            .into_iter()
            .filter(|p| !all_pool.iter().any(|a| a.name == p.name))
            .cloned()
            .collect();
        pools.insert(lang.clone(), pool);
    }
    pools.insert(ALL_LANGUAGE.to_string(), all_pool);
    pools
}
