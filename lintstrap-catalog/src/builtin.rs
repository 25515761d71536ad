use std::collections::BTreeSet;

use lintstrap_types::{Capability, Plugin, PluginRequirement, RequiredSetting, TypeSig};

use crate::InMemoryCatalog;

fn caps(list: &[Capability]) -> BTreeSet<Capability> {
    list.iter().copied().collect()
}

fn langs(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|l| l.to_string()).collect()
}

struct Spec {
    name: &'static str,
    languages: &'static [&'static str],
    detect: &'static [Capability],
    fix: &'static [Capability],
    requirement: Option<(&'static str, Option<&'static str>)>,
    settings: &'static [(&'static str, &'static str, SettingKind)],
    dependencies: &'static [&'static str],
}

enum SettingKind {
    Str,
    Int,
    Bool,
}

/// Fallback plugin pool used when the host does not hand over a catalog
/// export. Mirrors the kind of records the discovery mechanism emits.
pub fn builtin_catalog() -> InMemoryCatalog {
    use Capability::*;

    let specs: &[Spec] = &[
        Spec {
            name: "FilenameLint",
            languages: &["All"],
            detect: &[Smell],
            fix: &[],
            requirement: None,
            settings: &[("file_naming_convention", "Naming convention for files", SettingKind::Str)],
            dependencies: &[],
        },
        Spec {
            name: "BrokenLinkLint",
            languages: &["All"],
            detect: &[Documentation],
            fix: &[],
            requirement: None,
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "LineCountLint",
            languages: &["All"],
            detect: &[Complexity],
            fix: &[],
            requirement: None,
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "KeywordLint",
            languages: &["All"],
            detect: &[Smell],
            fix: &[],
            settings: &[("keywords", "Keywords to flag in source", SettingKind::Str)],
            requirement: None,
            dependencies: &[],
        },
        Spec {
            name: "SpaceConsistencyLint",
            languages: &["All"],
            detect: &[Formatting],
            fix: &[Formatting],
            requirement: None,
            settings: &[("use_spaces", "Use spaces instead of tabs", SettingKind::Bool)],
            dependencies: &[],
        },
        Spec {
            name: "Pep8Lint",
            languages: &["Python"],
            detect: &[Formatting],
            fix: &[Formatting],
            requirement: Some(("pycodestyle", Some("2.0"))),
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "PyDocStyleLint",
            languages: &["Python"],
            detect: &[Documentation],
            fix: &[],
            requirement: Some(("pydocstyle", None)),
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "PyFlakesLint",
            languages: &["Python"],
            detect: &[Syntax, Redundancy],
            fix: &[],
            requirement: Some(("pyflakes", Some("1.5"))),
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "JsHintLint",
            languages: &["JavaScript"],
            detect: &[Syntax, Smell],
            fix: &[],
            requirement: Some(("jshint", None)),
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "JsComplexityLint",
            languages: &["JavaScript"],
            detect: &[Complexity],
            fix: &[],
            requirement: Some(("complexity-report", Some("2.0"))),
            settings: &[("maxcc", "Maximum cyclomatic complexity", SettingKind::Int)],
            dependencies: &[],
        },
        Spec {
            name: "EsPrettifyLint",
            languages: &["JavaScript"],
            detect: &[Formatting],
            fix: &[Formatting],
            requirement: Some(("js-beautify", None)),
            settings: &[("indent_size", "Columns per indentation level", SettingKind::Int)],
            dependencies: &[],
        },
        Spec {
            name: "CssHintLint",
            languages: &["CSS"],
            detect: &[Syntax, Formatting],
            fix: &[],
            requirement: Some(("csslint", None)),
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "IndentLint",
            languages: &["C", "C++"],
            detect: &[Formatting],
            fix: &[Formatting],
            requirement: Some(("indent", None)),
            settings: &[("indent_size", "Columns per indentation level", SettingKind::Int)],
            dependencies: &[],
        },
        Spec {
            name: "ClangComplexityLint",
            languages: &["C", "C++"],
            detect: &[Complexity],
            fix: &[],
            requirement: Some(("libclang", None)),
            settings: &[],
            dependencies: &[],
        },
        Spec {
            name: "RubocopLint",
            languages: &["Ruby"],
            detect: &[Formatting, Smell],
            fix: &[Formatting],
            requirement: Some(("rubocop", Some("0.47"))),
            settings: &[],
            dependencies: &[],
        },
    ];

    InMemoryCatalog::new(specs.iter().map(|spec| Plugin {
        name: spec.name.to_string(),
        languages: langs(spec.languages),
        can_detect: caps(spec.detect),
        can_fix: caps(spec.fix),
        requirements: spec
            .requirement
            .iter()
            .map(|(name, version)| PluginRequirement {
                name: name.to_string(),
                version: version.map(str::to_string),
            })
            .collect(),
        settings: spec
            .settings
            .iter()
            .map(|(key, help, kind)| RequiredSetting {
                key: key.to_string(),
                help: help.to_string(),
                kind: match kind {
                    SettingKind::Str => TypeSig::Str,
                    SettingKind::Int => TypeSig::Int,
                    SettingKind::Bool => TypeSig::Bool,
                },
            })
            .collect(),
        dependencies: spec.dependencies.iter().map(|d| d.to_string()).collect(),
        requirements_satisfied: spec.requirement.is_none(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PluginCatalog;

    #[test]
    fn builtin_catalog_covers_the_allowlist_languages() {
        let catalog = builtin_catalog();
        assert!(catalog.get("Pep8Lint").is_some());
        assert!(catalog.get("FilenameLint").is_some());
        assert!(!catalog.plugins_for("JavaScript").is_empty());
    }

    #[test]
    fn plugins_without_requirements_probe_satisfied() {
        let catalog = builtin_catalog();
        assert!(catalog.get("LineCountLint").unwrap().requirements_satisfied);
        assert!(!catalog.get("Pep8Lint").unwrap().requirements_satisfied);
    }
}
