use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed vocabulary describing what a plugin can detect or fix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Capability {
    Formatting,
    Syntax,
    Security,
    Complexity,
    Duplication,
    Documentation,
    Redundancy,
    Smell,
    Spelling,
}

impl Capability {
    pub const ALL: &'static [Capability] = &[
        Capability::Formatting,
        Capability::Syntax,
        Capability::Security,
        Capability::Complexity,
        Capability::Duplication,
        Capability::Documentation,
        Capability::Redundancy,
        Capability::Smell,
        Capability::Spelling,
    ];

    /// Coverage target used when the operator does not pick one.
    pub fn default_targets() -> BTreeSet<Capability> {
        [
            Capability::Formatting,
            Capability::Syntax,
            Capability::Documentation,
        ]
        .into_iter()
        .collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Formatting => "Formatting",
            Capability::Syntax => "Syntax",
            Capability::Security => "Security",
            Capability::Complexity => "Complexity",
            Capability::Duplication => "Duplication",
            Capability::Documentation => "Documentation",
            Capability::Redundancy => "Redundancy",
            Capability::Smell => "Smell",
            Capability::Spelling => "Spelling",
        };
        f.write_str(name)
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Formatting" => Ok(Capability::Formatting),
            "Syntax" => Ok(Capability::Syntax),
            "Security" => Ok(Capability::Security),
            "Complexity" => Ok(Capability::Complexity),
            "Duplication" => Ok(Capability::Duplication),
            "Documentation" => Ok(Capability::Documentation),
            "Redundancy" => Ok(Capability::Redundancy),
            "Smell" => Ok(Capability::Smell),
            "Spelling" => Ok(Capability::Spelling),
            other => Err(format!("unknown capability: {other}")),
        }
    }
}
