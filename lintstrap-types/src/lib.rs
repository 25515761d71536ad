//! Shared data model for the lintstrap workspace.
//!
//! # Design constraints
//! - Facts are immutable once constructed; construction validates the
//!   value against the kind's type signature.
//! - Plugins are plain read-only records supplied by the lint host's
//!   discovery mechanism; lintstrap never mutates them.

pub mod capability;
pub mod fact;
pub mod plugin;
pub mod scope;
pub mod selection;
pub mod setting;
pub mod sig;

pub use capability::Capability;
pub use fact::{Fact, FactError, FactKind, FactSet, FactValue, ExtractorKind};
pub use plugin::{Plugin, PluginRequirement, RequiredSetting};
pub use scope::{FactScope, ScopeLevel, SectionMatch};
pub use selection::Selection;
pub use setting::{Provenance, SettingValue};
pub use sig::TypeSig;

/// Language key under which language-agnostic plugins are grouped.
pub const ALL_LANGUAGE: &str = "All";
