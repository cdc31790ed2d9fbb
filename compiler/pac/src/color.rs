//! Terminal colors for test results.

use std::io::IsTerminal;

mod codes {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const BOLD_RED: &str = "\x1b[1;31m";
    pub const BOLD_GREEN: &str = "\x1b[1;32m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

/// When to color output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Parse the value of `--color=`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }

    /// Resolve against an explicit terminal check.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Resolve against the current process's stdout and environment.
    pub fn enabled(self) -> bool {
        let is_tty = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        self.should_use_colors(is_tty)
    }
}

fn paint(text: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("{code}{text}{}", codes::RESET)
    } else {
        text.to_string()
    }
}

pub fn pass(text: &str, enabled: bool) -> String {
    paint(text, codes::GREEN, enabled)
}

pub fn fail(text: &str, enabled: bool) -> String {
    paint(text, codes::RED, enabled)
}

pub fn ok_banner(text: &str, enabled: bool) -> String {
    paint(text, codes::BOLD_GREEN, enabled)
}

pub fn failed_banner(text: &str, enabled: bool) -> String {
    paint(text, codes::BOLD_RED, enabled)
}

pub fn dim(text: &str, enabled: bool) -> String {
    paint(text, codes::DIM, enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_three_modes() {
        assert_eq!(ColorMode::parse("auto"), Some(ColorMode::Auto));
        assert_eq!(ColorMode::parse("always"), Some(ColorMode::Always));
        assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
        assert_eq!(ColorMode::parse("sometimes"), None);
    }

    #[test]
    fn auto_follows_the_terminal() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
    }

    #[test]
    fn paint_only_when_enabled() {
        assert_eq!(pass("PASS", false), "PASS");
        assert_eq!(fail("FAIL", true), "\x1b[31mFAIL\x1b[0m");
    }
}
