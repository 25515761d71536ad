//! Setting resolution for a target section.
//!
//! For each required key of a section's plugins, the resolver first tries
//! the fact-to-setting mapping table, then anomaly resolution when the
//! facts disagree, and finally typed interactive acquisition. In
//! non-interactive mode anything that would need a prompt is dropped.

use std::collections::BTreeMap;

use tracing::debug;

use lintstrap_catalog::PluginCatalog;
use lintstrap_extract::editorconfig::section_files_match;
use lintstrap_prompt::{Prompt, PromptError};
use lintstrap_types::{
    Fact, FactKind, FactScope, FactSet, SettingValue, TypeSig,
};

use crate::sections::Section;

/// Key autofilled with the section's own name, bypassing the table.
const LANGUAGE_KEY: &str = "language";

/// One registered fact-to-setting mapping: which fact kind feeds which
/// setting key, under what scope, through what value transform.
pub struct FactSettingMap {
    pub setting_key: String,
    pub fact_kind: FactKind,
    pub scope: FactScope,
    pub transform: fn(&Fact) -> Option<String>,
}

/// The registered mappings, consulted in registration order.
#[derive(Default)]
pub struct MappingTable {
    maps: Vec<FactSettingMap>,
}

impl MappingTable {
    pub fn new(maps: Vec<FactSettingMap>) -> Self {
        Self { maps }
    }

    /// The built-in table: style-config facts feeding whitespace and
    /// indentation settings.
    pub fn builtin() -> Self {
        let style_scope = || {
            FactScope::global()
                .with_sources(&[".editorconfig"])
                .with_section_match(section_files_match)
        };
        Self::new(vec![
            FactSettingMap {
                setting_key: "use_spaces".to_string(),
                fact_kind: FactKind::IndentStyle,
                scope: style_scope(),
                transform: |fact| {
                    fact.value().as_str().map(|style| (style == "space").to_string())
                },
            },
            FactSettingMap {
                setting_key: "indent_size".to_string(),
                fact_kind: FactKind::IndentSize,
                scope: style_scope(),
                transform: |fact| fact.value().as_int().map(|n| n.to_string()),
            },
            FactSettingMap {
                setting_key: "allow_trailing_whitespace".to_string(),
                fact_kind: FactKind::TrailingWhitespace,
                scope: style_scope(),
                transform: |fact| fact.value().as_bool().map(|b| b.to_string()),
            },
            FactSettingMap {
                setting_key: "enforce_newline_at_EOF".to_string(),
                fact_kind: FactKind::FinalNewline,
                scope: style_scope(),
                transform: |fact| fact.value().as_bool().map(|b| b.to_string()),
            },
        ])
    }

    /// Distinct candidate values for a key, in first-seen order, from
    /// every mapping whose scope accepts the (section, plugin) pair and
    /// whose facts pass the scope's restrictions.
    pub fn candidate_values(
        &self,
        key: &str,
        section_name: &str,
        section_files: &[String],
        plugin_names: &[String],
        facts: &FactSet,
    ) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for map in self.maps.iter().filter(|m| m.setting_key == key) {
            let in_scope = plugin_names
                .iter()
                .any(|plugin| map.scope.check_belongs_to_scope(section_name, plugin));
            if !in_scope {
                continue;
            }
            for fact in facts.get(map.fact_kind) {
                if !map.scope.applies_to_fact(section_files, fact) {
                    continue;
                }
                if let Some(value) = (map.transform)(fact)
                    && !values.contains(&value)
                {
                    values.push(value);
                }
            }
        }
        values
    }

    /// Whether a key resolves to exactly one value without interaction.
    pub fn can_autofill(
        &self,
        key: &str,
        section_name: &str,
        section_files: &[String],
        plugin_names: &[String],
        facts: &FactSet,
    ) -> bool {
        key == LANGUAGE_KEY
            || self
                .candidate_values(key, section_name, section_files, plugin_names, facts)
                .len()
                == 1
    }
}

/// A required key together with everything needed to ask for it.
struct NeededKey {
    sig: TypeSig,
    help: String,
    requested_by: Vec<String>,
}

pub struct SettingsResolver<'a> {
    mappings: &'a MappingTable,
    catalog: &'a dyn PluginCatalog,
    interactive: bool,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(
        mappings: &'a MappingTable,
        catalog: &'a dyn PluginCatalog,
        interactive: bool,
    ) -> Self {
        Self {
            mappings,
            catalog,
            interactive,
        }
    }

    /// Fill in the section's missing required settings, in key order.
    pub fn resolve(
        &self,
        section: &mut Section,
        facts: &FactSet,
        prompt: &mut dyn Prompt,
    ) -> Result<(), PromptError> {
        let plugin_names: Vec<String> =
            section.plugins.iter().map(|p| p.name.clone()).collect();

        for (key, needed) in self.needed_keys(section) {
            if key == LANGUAGE_KEY {
                section
                    .settings
                    .push(SettingValue::autofilled(key, section.name.clone()));
                continue;
            }

            let candidates = self.mappings.candidate_values(
                &key,
                &section.name,
                &section.files,
                &plugin_names,
                facts,
            );
            match candidates.len() {
                1 => {
                    debug!(key, value = %candidates[0], "autofilled setting");
                    section
                        .settings
                        .push(SettingValue::autofilled(key, candidates[0].clone()));
                }
                n if n > 1 => {
                    if !self.interactive {
                        debug!(key, "conflicting fact values, dropping in non-interactive mode");
                        continue;
                    }
                    let value = self.resolve_anomaly(&key, &needed, &candidates, prompt)?;
                    section.settings.push(SettingValue::user_provided(key, value));
                }
                _ => {
                    if !self.interactive {
                        debug!(key, "no fact value, dropping in non-interactive mode");
                        continue;
                    }
                    let value = self.acquire(&key, &needed, prompt)?;
                    section.settings.push(SettingValue::user_provided(key, value));
                }
            }
        }
        Ok(())
    }

    /// Required keys across the section's plugins and their direct
    /// dependency plugins, minus keys the section already carries.
    fn needed_keys(&self, section: &Section) -> BTreeMap<String, NeededKey> {
        let mut needed: BTreeMap<String, NeededKey> = BTreeMap::new();
        let mut note = |plugin_name: &str, key: &str, sig: &TypeSig, help: &str| {
            let entry = needed.entry(key.to_string()).or_insert_with(|| NeededKey {
                sig: sig.clone(),
                help: help.to_string(),
                requested_by: Vec::new(),
            });
            if !entry.requested_by.iter().any(|n| n == plugin_name) {
                entry.requested_by.push(plugin_name.to_string());
            }
        };

        for plugin in &section.plugins {
            for setting in &plugin.settings {
                note(&plugin.name, &setting.key, &setting.kind, &setting.help);
            }
            // Direct dependencies only; transitive ones are not chased.
            for dep_name in &plugin.dependencies {
                if let Some(dep) = self.catalog.get(dep_name) {
                    for setting in &dep.settings {
                        note(&plugin.name, &setting.key, &setting.kind, &setting.help);
                    }
                }
            }
        }

        needed.retain(|key, _| section.setting(key).is_none());
        needed
    }

    /// The facts disagree: show every distinct value and let the
    /// operator pick one.
    fn resolve_anomaly(
        &self,
        key: &str,
        needed: &NeededKey,
        candidates: &[String],
        prompt: &mut dyn Prompt,
    ) -> Result<String, PromptError> {
        prompt.report(&format!(
            "Conflicting values for `{key}` ({}), needed by {}:",
            needed.help,
            needed.requested_by.join(", "),
        ));
        for value in candidates {
            prompt.report(&format!("  - {value}"));
        }
        let choice = TypeSig::OneOf(candidates.to_vec());
        prompt.ask_typed(&format!("Which value should `{key}` take? "), &choice)
    }

    fn acquire(
        &self,
        key: &str,
        needed: &NeededKey,
        prompt: &mut dyn Prompt,
    ) -> Result<String, PromptError> {
        prompt.ask_typed(
            &format!(
                "Please enter a value for `{key}` ({}): {} [needed by {}] ",
                needed.sig.describe(),
                needed.help,
                needed.requested_by.join(", "),
            ),
            &needed.sig,
        )
    }
}
