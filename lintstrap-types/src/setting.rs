use serde::{Deserialize, Serialize};

/// How a resolved setting value came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Autofilled,
    UserProvided,
    PreExisting,
}

/// A resolved (key, value) pair for a target section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingValue {
    pub key: String,
    pub value: String,
    pub provenance: Provenance,
}

impl SettingValue {
    pub fn autofilled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            provenance: Provenance::Autofilled,
        }
    }

    pub fn user_provided(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            provenance: Provenance::UserProvided,
        }
    }
}
