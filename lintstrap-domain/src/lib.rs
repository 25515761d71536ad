//! Decision logic over mined project facts: which plugins to enable per
//! language, and how to fill in the settings they require.

pub mod sections;
pub mod selection;
pub mod settings;
pub mod tiebreak;
pub mod version;

pub use sections::{Section, generate_sections};
pub use selection::{SelectionConfig, SelectionEngine, prompt_coverage_target};
pub use settings::{FactSettingMap, MappingTable, SettingsResolver};
pub use tiebreak::{FirstMatch, RandomTieBreak, TieBreak};
