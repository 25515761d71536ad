//! Manifest metadata extractors.
//!
//! Each supported manifest format is a distinct [`Extractor`]. The
//! driver locates target files by glob under the project root, parses
//! them, and aggregates the derived facts into one [`FactSet`] keyed by
//! kind. Extractors declare the fact kinds they may emit; emitting an
//! undeclared kind is a wiring mistake and aborts the run, while
//! malformed project data only costs the affected file its facts.

pub mod deplist;
pub mod editorconfig;
pub mod package_json;
pub mod taskfile;

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use thiserror::Error;
use tracing::{debug, warn};

use lintstrap_types::{ExtractorKind, Fact, FactError, FactKind, FactSet};

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A file matched a target glob but not the extractor's supported
    /// naming pattern. Contract violation.
    #[error("file {file} does not match the supported globs {supported:?} of {extractor:?}")]
    PatternMismatch {
        extractor: ExtractorKind,
        file: Utf8PathBuf,
        supported: Vec<String>,
    },

    /// An extractor emitted a fact kind outside its declared set.
    /// Contract violation.
    #[error("{extractor:?} emitted undeclared fact kind {kind:?}")]
    UndeclaredKind {
        extractor: ExtractorKind,
        kind: FactKind,
    },

    /// A fact value failed its kind's type signature. Contract violation.
    #[error(transparent)]
    Fact(#[from] FactError),

    #[error("glob error: {0}")]
    Glob(String),
}

impl ExtractError {
    /// Glob failures are environmental; everything else indicates a
    /// wiring mistake and aborts the run.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, ExtractError::Glob(_))
    }
}

/// One manifest format's extraction logic.
pub trait Extractor {
    fn kind(&self) -> ExtractorKind;

    /// Globs used to locate candidate files under the project root.
    fn target_globs(&self) -> &[&str];

    /// Naming patterns a located file must satisfy.
    fn supported_globs(&self) -> &[&str];

    /// The finite set of fact kinds this extractor may emit.
    fn declared_kinds(&self) -> &[FactKind];

    /// Derive facts from one file's content. `source` is the path
    /// relative to the project root.
    fn extract(&self, source: &Utf8Path, content: &str) -> Result<Vec<Fact>, ExtractError>;
}

/// All extractors in invocation order.
pub fn builtin_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(editorconfig::EditorconfigExtractor),
        Box::new(package_json::PackageManifestExtractor),
        Box::new(deplist::DependencyListExtractor),
        Box::new(taskfile::BuildTaskExtractor),
    ]
}

/// Run one extractor over the project, enforcing its contract.
pub fn run_extractor(
    extractor: &dyn Extractor,
    project_dir: &Utf8Path,
) -> Result<Vec<Fact>, ExtractError> {
    let mut facts = Vec::new();

    for target in extractor.target_globs() {
        let pattern = project_dir.join(target);
        let entries =
            glob::glob(pattern.as_str()).map_err(|e| ExtractError::Glob(e.to_string()))?;

        for entry in entries {
            // An unreadable path costs that file its facts, nothing more.
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable path");
                    continue;
                }
            };
            if path.is_dir() {
                continue;
            }
            let path = Utf8PathBuf::from_path_buf(path)
                .map_err(|p| ExtractError::Glob(format!("non-utf8 path {}", p.display())))?;
            let rel = path
                .strip_prefix(project_dir)
                .map(Utf8Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());

            let file_name = rel.file_name().unwrap_or(rel.as_str());
            let supported = extractor.supported_globs();
            let name_ok = supported.iter().any(|g| {
                glob::Pattern::new(g).is_ok_and(|p| p.matches(file_name))
            });
            if !name_ok {
                return Err(ExtractError::PatternMismatch {
                    extractor: extractor.kind(),
                    file: rel,
                    supported: supported.iter().map(|s| s.to_string()).collect(),
                });
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(file = %rel, error = %err, "read failed, skipping file");
                    continue;
                }
            };

            debug!(file = %rel, extractor = ?extractor.kind(), "extracting facts");
            let file_facts = extractor.extract(&rel, &content)?;
            for fact in &file_facts {
                if !extractor.declared_kinds().contains(&fact.kind()) {
                    return Err(ExtractError::UndeclaredKind {
                        extractor: extractor.kind(),
                        kind: fact.kind(),
                    });
                }
            }
            facts.extend(file_facts);
        }
    }

    Ok(facts)
}

/// Run every extractor and merge the results into one fact index.
///
/// Glob failures cost the responsible extractor its facts and the run
/// continues; contract violations abort.
pub fn collect_facts(project_dir: &Utf8Path) -> Result<FactSet, ExtractError> {
    let mut set = FactSet::new();
    for extractor in builtin_extractors() {
        match run_extractor(extractor.as_ref(), project_dir) {
            Ok(facts) => set.extend(facts),
            Err(err) if err.is_contract_violation() => return Err(err),
            Err(err) => {
                warn!(extractor = ?extractor.kind(), error = %err, "extractor failed, continuing");
            }
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use lintstrap_types::FactValue;
    use tempfile::TempDir;

    struct Rogue;

    impl Extractor for Rogue {
        fn kind(&self) -> ExtractorKind {
            ExtractorKind::PackageManifest
        }

        fn target_globs(&self) -> &[&str] {
            &["package.json"]
        }

        fn supported_globs(&self) -> &[&str] {
            &["package.json"]
        }

        fn declared_kinds(&self) -> &[FactKind] {
            &[FactKind::LicenseUsed]
        }

        fn extract(&self, source: &Utf8Path, _content: &str) -> Result<Vec<Fact>, ExtractError> {
            // Emits a kind outside its declared set.
            Ok(vec![Fact::new(
                FactKind::Charset,
                source.to_path_buf(),
                FactValue::Str("utf-8".into()),
                None,
                self.kind(),
            )?])
        }
    }

    struct TwoManifests;

    impl Extractor for TwoManifests {
        fn kind(&self) -> ExtractorKind {
            ExtractorKind::PackageManifest
        }

        fn target_globs(&self) -> &[&str] {
            &["a.json", "b.json"]
        }

        fn supported_globs(&self) -> &[&str] {
            &["*.json"]
        }

        fn declared_kinds(&self) -> &[FactKind] {
            &[FactKind::LicenseUsed]
        }

        fn extract(&self, source: &Utf8Path, _content: &str) -> Result<Vec<Fact>, ExtractError> {
            Ok(vec![Fact::new(
                FactKind::LicenseUsed,
                source.to_path_buf(),
                FactValue::Str("MIT".into()),
                None,
                self.kind(),
            )?])
        }
    }

    fn project_with(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for (name, contents) in files {
            std::fs::write(root.join(name), contents).unwrap();
        }
        (dir, root)
    }

    #[test]
    fn undeclared_kind_is_a_contract_violation() {
        let (_guard, root) = project_with(&[("package.json", "{}")]);
        let err = run_extractor(&Rogue, &root).unwrap_err();
        assert!(matches!(err, ExtractError::UndeclaredKind { .. }));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn unreadable_files_cost_only_their_own_facts() {
        let (_guard, root) = project_with(&[("a.json", "{}")]);
        // Not valid UTF-8, so reading it as text fails.
        std::fs::write(root.join("b.json"), [0xff, 0xfe, 0x00]).unwrap();
        let facts = run_extractor(&TwoManifests, &root).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].source().as_str(), "a.json");
    }

    #[test]
    fn absent_manifests_yield_no_facts() {
        let (_guard, root) = project_with(&[]);
        let set = collect_facts(&root).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn aggregation_merges_across_extractors() {
        let (_guard, root) = project_with(&[
            (".editorconfig", "[*]\nindent_style = space\n"),
            ("package.json", r#"{"license": "MIT"}"#),
        ]);
        let set = collect_facts(&root).unwrap();
        assert_eq!(set.get(FactKind::IndentStyle).len(), 1);
        assert_eq!(set.get(FactKind::LicenseUsed).len(), 1);
    }
}
