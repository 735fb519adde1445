//! TOML schema definitions for ectools.toml

use serde::{Deserialize, Serialize};

/// Root structure for ectools.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsToml {
    /// Inspection, fixing and inference heuristics
    #[serde(default)]
    pub policy: PolicySection,

    /// File discovery
    #[serde(default)]
    pub walk: WalkSection,
}

/// `[policy]` section in ectools.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    /// Tab stop used when neither tab_width nor indent_size is configured (default: 4)
    pub tab_width: Option<u32>,

    /// Largest indentation step considered when detecting indent_size (default: 8)
    pub max_indent_size: Option<u32>,

    /// Share of files a value must exceed to be inferred (default: 0.5)
    pub majority: Option<f64>,
}

/// `[walk]` section in ectools.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalkSection {
    /// Include hidden files and directories (default: false)
    pub hidden: Option<bool>,
}
