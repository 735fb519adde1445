//! Settings merging logic
//!
//! Priority: CLI args > ectools.toml > defaults

use crate::Policy;

use super::toml_schema::SettingsToml;

/// CLI options that can override settings file values.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliSettings {
    pub tab_width: Option<u32>,
    /// If Some(true), walk hidden files and directories
    pub hidden: Option<bool>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub policy: Policy,
    pub hidden: bool,
}

/// Merge settings from CLI, TOML, and defaults.
///
/// Priority: CLI > TOML > defaults
pub fn merge_settings(cli: &CliSettings, toml: Option<&SettingsToml>) -> Settings {
    let defaults = Settings::default();
    let policy = toml.map(|t| &t.policy);

    Settings {
        policy: Policy {
            tab_width: cli
                .tab_width
                .or_else(|| policy.and_then(|p| p.tab_width))
                .unwrap_or(defaults.policy.tab_width),
            max_indent_size: policy
                .and_then(|p| p.max_indent_size)
                .unwrap_or(defaults.policy.max_indent_size),
            majority: policy
                .and_then(|p| p.majority)
                .unwrap_or(defaults.policy.majority),
        },
        hidden: cli
            .hidden
            .or_else(|| toml.and_then(|t| t.walk.hidden))
            .unwrap_or(defaults.hidden),
    }
}
