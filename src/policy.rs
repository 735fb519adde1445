//! Tunable heuristics shared by the inspector, fixer and inferrer.

/// Policy knobs with the values used when nothing overrides them.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Tab stop used when neither `tab_width` nor a numeric `indent_size` applies.
    pub tab_width: u32,
    /// Largest indentation step counted by indent size detection.
    pub max_indent_size: u32,
    /// A value is inferred only when held by more than this share of files.
    pub majority: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            tab_width: 4,
            max_indent_size: 8,
            majority: 0.5,
        }
    }
}
