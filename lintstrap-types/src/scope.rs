use crate::fact::{ExtractorKind, Fact};

/// Broad level at which a fact-to-setting mapping applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    Global,
    PerSection,
    PerPlugin,
}

/// Compares a target section's file globs against a fact's own scope glob.
pub type SectionMatch = fn(section_files: &[String], fact_scope: &str) -> bool;

/// Applicability predicate restricting which (section, plugin) pair and
/// which facts a fact-to-setting mapping covers.
#[derive(Debug, Clone)]
pub struct FactScope {
    pub level: ScopeLevel,
    /// Qualifying section names; consulted for `PerSection` and `PerPlugin`.
    pub sections: Vec<String>,
    /// Qualifying plugin names; consulted for `PerPlugin` only.
    pub plugins: Vec<String>,
    /// Optional matcher comparing the section's file globs to a fact's
    /// scope glob.
    pub section_match: Option<SectionMatch>,
    /// Fact sources the mapping accepts; empty means any.
    pub allowed_sources: Vec<String>,
    /// Extractor kinds the mapping accepts; empty means any.
    pub allowed_origins: Vec<ExtractorKind>,
}

impl FactScope {
    pub fn global() -> Self {
        Self {
            level: ScopeLevel::Global,
            sections: vec![],
            plugins: vec![],
            section_match: None,
            allowed_sources: vec![],
            allowed_origins: vec![],
        }
    }

    pub fn with_sources(mut self, sources: &[&str]) -> Self {
        self.allowed_sources = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_section_match(mut self, matcher: SectionMatch) -> Self {
        self.section_match = Some(matcher);
        self
    }

    /// Whether the (section, plugin) pair falls inside this scope.
    ///
    /// `PerPlugin` with an empty section list means the scope is global
    /// for that plugin across all sections.
    pub fn check_belongs_to_scope(&self, section_name: &str, plugin_name: &str) -> bool {
        match self.level {
            ScopeLevel::Global => true,
            ScopeLevel::PerSection => self.sections.iter().any(|s| s == section_name),
            ScopeLevel::PerPlugin => {
                let plugin_ok = self.plugins.iter().any(|b| b == plugin_name);
                if self.sections.is_empty() {
                    plugin_ok
                } else {
                    plugin_ok && self.sections.iter().any(|s| s == section_name)
                }
            }
        }
    }

    /// Whether an individual fact is usable under this scope, given the
    /// target section's file globs.
    pub fn applies_to_fact(&self, section_files: &[String], fact: &Fact) -> bool {
        if let (Some(matcher), Some(fact_scope)) = (self.section_match, fact.scope())
            && !matcher(section_files, fact_scope)
        {
            return false;
        }

        let source_ok = self
            .allowed_sources
            .iter()
            .any(|s| fact.source().as_str() == s);
        let origin_ok = self.allowed_origins.contains(&fact.origin());

        match (
            self.allowed_sources.is_empty(),
            self.allowed_origins.is_empty(),
        ) {
            (true, true) => true,
            (false, false) => source_ok && origin_ok,
            (false, true) => source_ok,
            (true, false) => origin_ok,
        }
    }
}
