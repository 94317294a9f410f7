//! Display theme of the interactive shell

use std::fmt;
use std::str::FromStr;

/// Color output or plain text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Color,
    Plain,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Color => Theme::Plain,
            Theme::Plain => Theme::Color,
        }
    }

    /// Switch `console` styling on or off for both streams
    pub fn apply(self) {
        let enabled = self == Theme::Color;
        console::set_colors_enabled(enabled);
        console::set_colors_enabled_stderr(enabled);
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Color => write!(f, "color"),
            Theme::Plain => write!(f, "plain"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "color" | "colour" | "dark" => Ok(Theme::Color),
            "plain" | "light" | "mono" => Ok(Theme::Plain),
            _ => Err(format!("unknown theme: {} (expected color or plain)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_parse() {
        assert_eq!(Theme::Color.toggled(), Theme::Plain);
        assert_eq!(Theme::Plain.toggled(), Theme::Color);
        assert_eq!("Plain".parse::<Theme>().unwrap(), Theme::Plain);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Color);
        assert!("neon".parse::<Theme>().is_err());
    }
}
