//! Plugin selection per language.
//!
//! Five phases over each language pool: allowlist seeding, capability
//! filtering, proposal from mined facts, the required-settings gate, and
//! residual capability coverage with conflict resolution.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use lintstrap_prompt::{MultiSelect, Prompt, PromptError};
use lintstrap_types::{Capability, FactKind, FactSet, FactValue, Plugin, Selection};

use crate::settings::MappingTable;
use crate::tiebreak::TieBreak;
use crate::version::constraint_satisfies;

/// Per-run knobs for the selection engine, passed in at construction so
/// tests can substitute their own tables.
pub struct SelectionConfig {
    /// Language name to the plugin names always chosen for it.
    pub allowlist: BTreeMap<String, BTreeSet<String>>,
    /// Capabilities the final selection should cover.
    pub coverage_target: BTreeSet<Capability>,
    /// When false, phases 2 and 5 are skipped entirely.
    pub filter_by_capabilities: bool,
    /// When false, anything needing confirmation is excluded instead.
    pub interactive: bool,
}

pub struct SelectionEngine<'a> {
    config: SelectionConfig,
    mappings: &'a MappingTable,
    tiebreak: Box<dyn TieBreak>,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(
        config: SelectionConfig,
        mappings: &'a MappingTable,
        tiebreak: Box<dyn TieBreak>,
    ) -> Self {
        Self {
            config,
            mappings,
            tiebreak,
        }
    }

    /// Choose plugins for every language pool.
    ///
    /// `files_by_language` supplies each language's file globs for the
    /// required-settings gate; absent languages gate against no files.
    pub fn select(
        &mut self,
        pools: &BTreeMap<String, Vec<Plugin>>,
        facts: &FactSet,
        files_by_language: &BTreeMap<String, Vec<String>>,
        prompt: &mut dyn Prompt,
    ) -> Result<Selection, PromptError> {
        let mut selection = Selection::new();
        for (language, pool) in pools {
            let files = files_by_language
                .get(language)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for plugin in self.select_for_language(language, pool, facts, files, prompt)? {
                selection.insert(language, &plugin.name);
            }
        }
        Ok(selection)
    }

    fn select_for_language<'p>(
        &mut self,
        language: &str,
        pool: &'p [Plugin],
        facts: &FactSet,
        section_files: &[String],
        prompt: &mut dyn Prompt,
    ) -> Result<Vec<&'p Plugin>, PromptError> {
        // Phase 1: allowlist seeding. A language absent from the
        // allowlist takes its whole pool and leaves no candidates.
        let (mut selected, mut candidates): (Vec<&Plugin>, Vec<&Plugin>) =
            match self.config.allowlist.get(language) {
                Some(names) => pool.iter().partition(|p| names.contains(&p.name)),
                None => (pool.iter().collect(), Vec::new()),
            };
        for plugin in &selected {
            debug!(language, plugin = %plugin.name, "seeded from allowlist");
        }

        // Phase 2: capability filter.
        if self.config.filter_by_capabilities {
            candidates.retain(|p| !p.covers().is_disjoint(&self.config.coverage_target));
        }

        // Phase 3: proposal from mined facts.
        let proposed: Vec<&Plugin> = candidates
            .iter()
            .copied()
            .filter(|p| self.is_proposed(p, facts))
            .collect();

        // Phase 4: required-settings gate on each proposal. Proposals
        // rejected here stay rejected; residual coverage must not
        // resurrect them.
        let mut rejected: BTreeSet<&str> = BTreeSet::new();
        for plugin in &proposed {
            if self.passes_settings_gate(plugin, language, section_files, facts) {
                selected.push(plugin);
            } else if self.config.interactive {
                let question = format!(
                    "`{}` looks useful for {language} based on your project files. Use it? ",
                    plugin.name,
                );
                if prompt.confirm(&question)? {
                    selected.push(plugin);
                } else {
                    rejected.insert(plugin.name.as_str());
                }
            } else {
                debug!(language, plugin = %plugin.name, "proposal needs input, dropped");
                rejected.insert(plugin.name.as_str());
            }
        }

        // Phase 5: residual capability coverage.
        if self.config.filter_by_capabilities {
            let covered: BTreeSet<Capability> = selected
                .iter()
                .flat_map(|p| p.covers())
                .filter(|cap| self.config.coverage_target.contains(cap))
                .collect();
            let residual: BTreeSet<Capability> = self
                .config
                .coverage_target
                .difference(&covered)
                .copied()
                .collect();
            let selected_names: BTreeSet<&str> =
                selected.iter().map(|p| p.name.as_str()).collect();
            let remaining: Vec<&Plugin> = candidates
                .iter()
                .copied()
                .filter(|p| {
                    !selected_names.contains(p.name.as_str())
                        && !rejected.contains(p.name.as_str())
                })
                .collect();
            for plugin in self.cover_residual(&remaining, &residual) {
                prompt.report(&format!(
                    "Adding `{}` to cover remaining {language} capabilities.",
                    plugin.name,
                ));
                selected.push(plugin);
            }
        }

        Ok(selected)
    }

    /// Whether any of the plugin's external requirements matches a mined
    /// lint task name or a declared project dependency.
    fn is_proposed(&self, plugin: &Plugin, facts: &FactSet) -> bool {
        plugin.requirements.iter().any(|req| {
            let task_match = facts.get(FactKind::LintTask).iter().any(|fact| {
                matches!(fact.value(), FactValue::LintTask { task, .. } if *task == req.name)
            });
            let mentioned_match = facts.get(FactKind::MentionedTasks).iter().any(|fact| {
                matches!(fact.value(), FactValue::List(tasks) if tasks.contains(&req.name))
            });
            let dependency_match = facts.get(FactKind::ProjectDependency).iter().any(|fact| {
                matches!(
                    fact.value(),
                    FactValue::Dependency { name, version, .. }
                        if *name == req.name
                            && constraint_satisfies(req.version.as_deref(), version.as_deref())
                )
            });
            task_match || mentioned_match || dependency_match
        })
    }

    /// A proposal is selected unconditionally when it has no required
    /// keys or when every one of them autofills from the facts.
    fn passes_settings_gate(
        &self,
        plugin: &Plugin,
        language: &str,
        section_files: &[String],
        facts: &FactSet,
    ) -> bool {
        let names = vec![plugin.name.clone()];
        plugin.settings.iter().all(|setting| {
            self.mappings
                .can_autofill(&setting.key, language, section_files, &names, facts)
        })
    }

    /// Pick one plugin per uncovered capability: fixers beat detectors,
    /// locally-satisfied requirements beat unsatisfied ones, anything
    /// left is settled by the tie-breaker.
    fn cover_residual<'p>(
        &mut self,
        candidates: &[&'p Plugin],
        residual: &BTreeSet<Capability>,
    ) -> Vec<&'p Plugin> {
        let mut chosen: Vec<&Plugin> = Vec::new();
        for cap in residual {
            let covering: Vec<&Plugin> = candidates
                .iter()
                .copied()
                .filter(|p| p.fixes(*cap) || p.detects(*cap))
                .collect();
            if covering.is_empty() {
                continue;
            }
            let fixers: Vec<&Plugin> =
                covering.iter().copied().filter(|p| p.fixes(*cap)).collect();
            let pool = if fixers.is_empty() { covering } else { fixers };
            let satisfied: Vec<&Plugin> = pool
                .iter()
                .copied()
                .filter(|p| p.requirements_satisfied)
                .collect();
            let pool = if satisfied.is_empty() { pool } else { satisfied };
            let pick = if pool.len() == 1 {
                pool[0]
            } else {
                pool[self.tiebreak.pick(pool.len())]
            };
            if !chosen.iter().any(|p| p.name == pick.name) {
                chosen.push(pick);
            }
        }
        chosen
    }
}

/// Ask which capabilities the generated config should cover; the
/// sentinel answer keeps the defaults.
pub fn prompt_coverage_target(
    prompt: &mut dyn Prompt,
) -> Result<BTreeSet<Capability>, PromptError> {
    let options: Vec<String> = Capability::ALL.iter().map(|c| c.to_string()).collect();
    match prompt.choose_many(
        "Which kinds of issues should the configuration cover?",
        &options,
    )? {
        MultiSelect::Defaults => Ok(Capability::default_targets()),
        MultiSelect::Picked(picks) => Ok(picks
            .into_iter()
            .filter_map(|i| Capability::ALL.get(i).copied())
            .collect()),
    }
}
