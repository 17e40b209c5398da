use serde::{Deserialize, Serialize};

/// Interval kind the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Parse mode from a stored tag like "WORK"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "WORK" => Some(Self::Work),
            "SHORT_BREAK" => Some(Self::ShortBreak),
            "LONG_BREAK" => Some(Self::LongBreak),
            _ => None,
        }
    }

    /// Convert mode to a stored tag
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::ShortBreak => "SHORT_BREAK",
            Self::LongBreak => "LONG_BREAK",
        }
    }

    /// Get the display name for this mode
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Focus",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Check if this mode is a break (short or long)
    pub fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }

    /// Get all modes as a list
    pub fn all() -> &'static [Mode] {
        &[Mode::Work, Mode::ShortBreak, Mode::LongBreak]
    }
}
