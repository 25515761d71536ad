use std::collections::{BTreeMap, BTreeSet};

use crate::ALL_LANGUAGE;

/// Mapping from language name to the chosen plugin names.
///
/// A plugin present under the `All` key is never duplicated inside a
/// specific-language entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    by_language: BTreeMap<String, BTreeSet<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin under a language, preserving the `All` disjointness
    /// invariant.
    pub fn insert(&mut self, language: &str, plugin: &str) {
        if language != ALL_LANGUAGE
            && self
                .by_language
                .get(ALL_LANGUAGE)
                .is_some_and(|all| all.contains(plugin))
        {
            return;
        }
        if language == ALL_LANGUAGE {
            for plugins in self.by_language.values_mut() {
                plugins.remove(plugin);
            }
        }
        self.by_language
            .entry(language.to_string())
            .or_default()
            .insert(plugin.to_string());
    }

    pub fn for_language(&self, language: &str) -> BTreeSet<String> {
        self.by_language.get(language).cloned().unwrap_or_default()
    }

    pub fn languages(&self) -> impl Iterator<Item = &String> {
        self.by_language.keys()
    }

    pub fn contains(&self, language: &str, plugin: &str) -> bool {
        self.by_language
            .get(language)
            .is_some_and(|set| set.contains(plugin))
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.values().all(BTreeSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_plugins_are_never_duplicated_per_language() {
        let mut sel = Selection::new();
        sel.insert(ALL_LANGUAGE, "FilenameLint");
        sel.insert("Python", "FilenameLint");
        sel.insert("Python", "Pep8Lint");

        assert!(sel.contains(ALL_LANGUAGE, "FilenameLint"));
        assert!(!sel.contains("Python", "FilenameLint"));
        assert!(sel.contains("Python", "Pep8Lint"));
    }

    #[test]
    fn inserting_into_all_evicts_language_copies() {
        let mut sel = Selection::new();
        sel.insert("Python", "FilenameLint");
        sel.insert(ALL_LANGUAGE, "FilenameLint");

        assert!(sel.contains(ALL_LANGUAGE, "FilenameLint"));
        assert!(!sel.contains("Python", "FilenameLint"));
    }
}
