//! Extraction-to-settings scenarios across the whole decision pipeline.

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8Path;
use pretty_assertions::assert_eq;

use lintstrap_catalog::{PluginCatalog, builtin_catalog, partition_pools};
use lintstrap_domain::{
    FirstMatch, MappingTable, Section, SelectionConfig, SelectionEngine, SettingsResolver,
    generate_sections,
};
use lintstrap_extract::Extractor;
use lintstrap_extract::editorconfig::EditorconfigExtractor;
use lintstrap_extract::package_json::PackageManifestExtractor;
use lintstrap_prompt::ScriptedPrompt;
use lintstrap_types::{Capability, FactKind, FactSet, Provenance};

fn facts_from_editorconfig(content: &str) -> FactSet {
    let mut facts = FactSet::new();
    facts.extend(
        EditorconfigExtractor
            .extract(Utf8Path::new(".editorconfig"), content)
            .unwrap(),
    );
    facts
}

#[test]
fn style_config_drives_use_spaces_autofill_end_to_end() {
    let facts = facts_from_editorconfig("[*]\nindent_style=space\nindent_size=4\n");
    let style = &facts.get(FactKind::IndentStyle)[0];
    assert_eq!(style.value().as_str(), Some("space"));
    assert_eq!(style.scope(), Some("*"));

    let catalog = builtin_catalog();
    let mappings = MappingTable::builtin();
    let resolver = SettingsResolver::new(&mappings, &catalog, false);
    let mut section = Section {
        name: "python".to_string(),
        files: vec!["**.py".to_string()],
        ignore: vec![],
        plugins: vec![catalog.get("SpaceConsistencyLint").unwrap().clone()],
        settings: vec![],
    };
    let mut prompt = ScriptedPrompt::new(&[]);
    resolver.resolve(&mut section, &facts, &mut prompt).unwrap();

    let use_spaces = section.setting("use_spaces").unwrap();
    assert_eq!(use_spaces.value, "true");
    assert_eq!(use_spaces.provenance, Provenance::Autofilled);
}

#[test]
fn conflicting_style_sections_need_the_operator() {
    let facts =
        facts_from_editorconfig("[*]\nindent_style=space\n[*]\nindent_style=tab\n");
    assert_eq!(facts.get(FactKind::IndentStyle).len(), 2);

    let catalog = builtin_catalog();
    let mappings = MappingTable::builtin();
    let resolver = SettingsResolver::new(&mappings, &catalog, true);
    let mut section = Section {
        name: "python".to_string(),
        files: vec!["**.py".to_string()],
        ignore: vec![],
        plugins: vec![catalog.get("SpaceConsistencyLint").unwrap().clone()],
        settings: vec![],
    };
    let mut prompt = ScriptedPrompt::new(&["true"]);
    resolver.resolve(&mut section, &facts, &mut prompt).unwrap();

    let use_spaces = section.setting("use_spaces").unwrap();
    assert_eq!(use_spaces.provenance, Provenance::UserProvided);
}

#[test]
fn package_manifest_dependencies_propose_matching_plugins() {
    let mut facts = FactSet::new();
    facts.extend(
        PackageManifestExtractor
            .extract(
                Utf8Path::new("package.json"),
                r#"{"license": "MIT", "devDependencies": {"jshint": "2.9"}}"#,
            )
            .unwrap(),
    );
    assert_eq!(facts.get(FactKind::LicenseUsed).len(), 1);

    let catalog = builtin_catalog();
    let pools = partition_pools(&catalog, &["JavaScript".to_string()]);
    let mappings = MappingTable::builtin();
    let mut engine = SelectionEngine::new(
        SelectionConfig {
            allowlist: BTreeMap::from([
                // Keep the JavaScript pool seedless so only the proposal
                // can add plugins.
                ("JavaScript".to_string(), BTreeSet::new()),
                ("All".to_string(), BTreeSet::new()),
            ]),
            coverage_target: Capability::default_targets(),
            filter_by_capabilities: false,
            interactive: false,
        },
        &mappings,
        Box::new(FirstMatch),
    );
    let mut prompt = ScriptedPrompt::new(&[]);
    let selection = engine
        .select(&pools, &facts, &BTreeMap::new(), &mut prompt)
        .unwrap();

    // JsHintLint requires the `jshint` package the project declares;
    // JsComplexityLint's requirement is absent and stays out.
    assert!(selection.contains("JavaScript", "JsHintLint"));
    assert!(!selection.contains("JavaScript", "JsComplexityLint"));
}

#[test]
fn full_run_sections_carry_selection_and_settings() {
    let facts = facts_from_editorconfig("[*]\nindent_style=space\n");
    let catalog = builtin_catalog();
    let languages = vec!["Python".to_string()];
    let globs = BTreeMap::from([("Python".to_string(), vec!["**.py".to_string()])]);

    let pools = partition_pools(&catalog, &languages);
    let mappings = MappingTable::builtin();
    let mut engine = SelectionEngine::new(
        SelectionConfig {
            allowlist: lintstrap_catalog::important_plugins(),
            coverage_target: Capability::default_targets(),
            filter_by_capabilities: true,
            interactive: false,
        },
        &mappings,
        Box::new(FirstMatch),
    );
    let mut prompt = ScriptedPrompt::new(&[]);
    let selection = engine.select(&pools, &facts, &globs, &mut prompt).unwrap();
    assert!(selection.contains("Python", "Pep8Lint"));
    assert!(selection.contains("All", "FilenameLint"));

    let mut sections =
        generate_sections(&selection, &globs, |name| catalog.get(name).cloned());
    let resolver = SettingsResolver::new(&mappings, &catalog, false);
    for section in &mut sections {
        resolver.resolve(section, &facts, &mut prompt).unwrap();
    }

    let default = &sections[0];
    assert_eq!(default.name, "default");
    // SpaceConsistencyLint lands in All via residual coverage and its
    // required key autofills from the style fact.
    assert!(default.plugins.iter().any(|p| p.name == "SpaceConsistencyLint"));
    assert_eq!(default.setting("use_spaces").unwrap().value, "true");
}
