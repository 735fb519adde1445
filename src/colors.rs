use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// Role of a piece of output, mapped to an ANSI color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Warning,
    Success,
    Info,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Error => "\x1b[31m",   // Red
            Tone::Warning => "\x1b[33m", // Yellow
            Tone::Success => "\x1b[32m", // Green
            Tone::Info => "\x1b[36m",    // Cyan
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Wrap `text` in the escape codes for `tone`, or return it as is when
    /// colors are off.
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.enabled {
            format!("{}{text}{RESET}", tone.code())
        } else {
            text.to_string()
        }
    }
}

pub fn should_use_colors(force_color: bool, no_color: bool) -> bool {
    // Priority: --no-color > --color > NO_COLOR env > TTY detection
    if no_color {
        return false;
    }
    if force_color {
        return true;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_disabled_is_plain() {
        assert_eq!(Colors::new(false).paint(Tone::Error, "x"), "x");
    }

    #[test]
    fn test_paint_enabled_wraps() {
        assert_eq!(
            Colors::new(true).paint(Tone::Success, "Fixed:"),
            "\x1b[32mFixed:\x1b[0m"
        );
    }

    #[test]
    fn test_flag_priority() {
        assert!(!should_use_colors(true, true));
        assert!(should_use_colors(true, false));
    }
}
