use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::sig::TypeSig;

/// A configuration key a plugin requires before it can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredSetting {
    pub key: String,
    pub help: String,
    pub kind: TypeSig,
}

/// An external tool or package a plugin shells out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRequirement {
    pub name: String,
    /// Minimum version constraint declared by the plugin, if any.
    #[serde(default)]
    pub version: Option<String>,
}

/// An analyzer/fixer unit as described by the lint host's discovery
/// mechanism. Read-only to lintstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    pub name: String,
    /// Languages this plugin applies to; may include the `All` key.
    pub languages: BTreeSet<String>,
    pub can_detect: BTreeSet<Capability>,
    pub can_fix: BTreeSet<Capability>,
    pub requirements: Vec<PluginRequirement>,
    pub settings: Vec<RequiredSetting>,
    /// Names of plugins this plugin directly depends on.
    pub dependencies: Vec<String>,
    /// Result of the host's "dependencies satisfied locally" probe.
    pub requirements_satisfied: bool,
}

impl Plugin {
    /// All capabilities this plugin covers, fixing or detecting.
    pub fn covers(&self) -> BTreeSet<Capability> {
        self.can_fix.union(&self.can_detect).copied().collect()
    }

    pub fn fixes(&self, cap: Capability) -> bool {
        self.can_fix.contains(&cap)
    }

    pub fn detects(&self, cap: Capability) -> bool {
        self.can_detect.contains(&cap)
    }
}
