//! Target sections of the generated configuration.

use std::collections::BTreeMap;

use lintstrap_types::{ALL_LANGUAGE, Plugin, Selection, SettingValue};

/// Fallback glob when no language files were detected at all.
const CATCH_ALL_GLOB: &str = "**";
const DEFAULT_IGNORE: &[&str] = &[".git/**"];

/// One named group of chosen plugins plus the file globs they target.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub name: String,
    pub files: Vec<String>,
    pub ignore: Vec<String>,
    pub plugins: Vec<Plugin>,
    pub settings: Vec<SettingValue>,
}

impl Section {
    pub fn setting(&self, key: &str) -> Option<&SettingValue> {
        self.settings.iter().find(|s| s.key == key)
    }
}

/// Build the section list for a selection: one catch-all section holding
/// the language-agnostic plugins, then one section per language, named
/// after it, with the language's file globs.
pub fn generate_sections(
    selection: &Selection,
    files_by_language: &BTreeMap<String, Vec<String>>,
    resolve: impl Fn(&str) -> Option<Plugin>,
) -> Vec<Section> {
    let mut sections = Vec::new();

    let plugins_of = |language: &str| -> Vec<Plugin> {
        selection
            .for_language(language)
            .iter()
            .filter_map(|name| resolve(name))
            .collect()
    };

    // The catch-all section targets every detected language's globs.
    let mut default_files: Vec<String> = files_by_language
        .values()
        .flatten()
        .cloned()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    if default_files.is_empty() {
        default_files.push(CATCH_ALL_GLOB.to_string());
    }
    sections.push(Section {
        name: "default".to_string(),
        files: default_files,
        ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
        plugins: plugins_of(ALL_LANGUAGE),
        settings: Vec::new(),
    });

    for language in selection.languages() {
        if language == ALL_LANGUAGE {
            continue;
        }
        sections.push(Section {
            name: language.to_lowercase(),
            files: files_by_language.get(language).cloned().unwrap_or_default(),
            ignore: Vec::new(),
            plugins: plugins_of(language),
            settings: Vec::new(),
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn plugin(name: &str) -> Plugin {
        Plugin {
            name: name.to_string(),
            languages: BTreeSet::new(),
            can_detect: BTreeSet::new(),
            can_fix: BTreeSet::new(),
            requirements: vec![],
            settings: vec![],
            dependencies: vec![],
            requirements_satisfied: true,
        }
    }

    #[test]
    fn catch_all_section_comes_first_with_agnostic_plugins() {
        let mut selection = Selection::new();
        selection.insert(ALL_LANGUAGE, "FilenameLint");
        selection.insert("Python", "Pep8Lint");

        let files = BTreeMap::from([(
            "Python".to_string(),
            vec!["**.py".to_string()],
        )]);
        let sections = generate_sections(&selection, &files, |name| Some(plugin(name)));

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "default");
        assert_eq!(sections[0].files, vec!["**.py".to_string()]);
        assert_eq!(sections[0].ignore, vec![".git/**".to_string()]);
        assert_eq!(sections[0].plugins[0].name, "FilenameLint");
        assert_eq!(sections[1].name, "python");
        assert_eq!(sections[1].files, vec!["**.py".to_string()]);
    }

    #[test]
    fn empty_projects_fall_back_to_the_catch_all_glob() {
        let mut selection = Selection::new();
        selection.insert(ALL_LANGUAGE, "FilenameLint");
        let sections = generate_sections(&selection, &BTreeMap::new(), |name| Some(plugin(name)));
        assert_eq!(sections[0].files, vec!["**".to_string()]);
    }

    #[test]
    fn languages_without_known_files_get_empty_globs() {
        let mut selection = Selection::new();
        selection.insert("Ruby", "RubocopLint");
        let sections = generate_sections(&selection, &BTreeMap::new(), |name| Some(plugin(name)));
        assert_eq!(sections[1].name, "ruby");
        assert!(sections[1].files.is_empty());
    }
}
