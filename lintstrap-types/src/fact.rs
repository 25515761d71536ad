use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sig::TypeSig;

/// Discriminator for a piece of mined project metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    IndentStyle,
    IndentSize,
    TrailingWhitespace,
    FinalNewline,
    Charset,
    LineBreaks,
    LicenseUsed,
    ProjectDependency,
    IncludePaths,
    IgnorePaths,
    ManFiles,
    LintTask,
    MentionedTasks,
}

impl FactKind {
    /// The declared type signature a value of this kind must satisfy.
    pub fn type_sig(&self) -> TypeSig {
        match self {
            FactKind::IndentStyle => TypeSig::one_of(&["tab", "space"]),
            FactKind::IndentSize => TypeSig::Int,
            FactKind::TrailingWhitespace | FactKind::FinalNewline => TypeSig::Bool,
            FactKind::Charset => TypeSig::Str,
            FactKind::LineBreaks => TypeSig::one_of(&["lf", "cr", "crlf"]),
            FactKind::LicenseUsed => TypeSig::Str,
            FactKind::ProjectDependency => TypeSig::Dependency,
            FactKind::IncludePaths | FactKind::IgnorePaths => {
                TypeSig::ListOf(Box::new(TypeSig::Str))
            }
            FactKind::ManFiles => TypeSig::AnyOf(vec![
                TypeSig::Str,
                TypeSig::ListOf(Box::new(TypeSig::Str)),
            ]),
            FactKind::LintTask => TypeSig::LintTask,
            FactKind::MentionedTasks => TypeSig::ListOf(Box::new(TypeSig::Str)),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FactKind::IndentStyle => "Indentation style used by the project",
            FactKind::IndentSize => "Number of columns per indentation level",
            FactKind::TrailingWhitespace => "Whether trailing whitespace is trimmed",
            FactKind::FinalNewline => "Whether files end with a newline",
            FactKind::Charset => "Character encoding of source files",
            FactKind::LineBreaks => "Line ending convention",
            FactKind::LicenseUsed => "License of the project",
            FactKind::ProjectDependency => "Declared dependency of the project",
            FactKind::IncludePaths => "Target path globs for analysis",
            FactKind::IgnorePaths => "Path globs to skip during analysis",
            FactKind::ManFiles => "Man page files shipped by the project",
            FactKind::LintTask => "Linter registered in a build-task script",
            FactKind::MentionedTasks => "Task packages referenced by a build-task script",
        }
    }
}

/// Which extractor produced a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    Editorconfig,
    PackageManifest,
    DependencyList,
    BuildTask,
}

/// A kind-specific fact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
    Dependency {
        name: String,
        /// Version constraint as written in the manifest, e.g. "~1.2".
        version: Option<String>,
        url: Option<String>,
    },
    LintTask {
        task: String,
        include: Vec<String>,
        ignore: Vec<String>,
        config: BTreeMap<String, String>,
    },
}

impl FactValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FactValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FactValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FactError {
    #[error("value {value:?} for fact kind {kind:?} does not satisfy signature {expected}")]
    TypeMismatch {
        kind: FactKind,
        value: FactValue,
        expected: String,
    },
}

/// A single piece of mined project metadata.
///
/// Immutable after construction; lives only for the duration of one
/// setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    kind: FactKind,
    source: Utf8PathBuf,
    value: FactValue,
    /// Optional applicability restriction, e.g. the section glob of the
    /// style-config section this fact was found under.
    scope: Option<String>,
    origin: ExtractorKind,
}

impl Fact {
    /// Build a fact, validating the value against the kind's signature.
    pub fn new(
        kind: FactKind,
        source: impl Into<Utf8PathBuf>,
        value: FactValue,
        scope: Option<String>,
        origin: ExtractorKind,
    ) -> Result<Self, FactError> {
        let sig = kind.type_sig();
        if !sig.admits(&value) {
            return Err(FactError::TypeMismatch {
                kind,
                value,
                expected: sig.describe(),
            });
        }
        Ok(Self {
            kind,
            source: source.into(),
            value,
            scope,
            origin,
        })
    }

    pub fn kind(&self) -> FactKind {
        self.kind
    }

    pub fn source(&self) -> &Utf8PathBuf {
        &self.source
    }

    pub fn value(&self) -> &FactValue {
        &self.value
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn origin(&self) -> ExtractorKind {
        self.origin
    }
}

/// Aggregated facts from every extractor, indexed by kind.
///
/// Insertion order within a kind is extractor-invocation order; there is
/// no cross-source deduplication. Conflicts are resolved downstream.
#[derive(Debug, Clone, Default)]
pub struct FactSet {
    by_kind: BTreeMap<FactKind, Vec<Fact>>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fact: Fact) {
        self.by_kind.entry(fact.kind()).or_default().push(fact);
    }

    pub fn extend(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.add(fact);
        }
    }

    pub fn get(&self, kind: FactKind) -> &[Fact] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.by_kind.values().flatten()
    }
}
