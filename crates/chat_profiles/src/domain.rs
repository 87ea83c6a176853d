use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The fixed palette authors are assigned from.
pub const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
];

/// A terminal-friendly display color drawn from a small fixed palette.
///
/// The same name is valid as a CSS color, which is what the overlay's
/// `/data` endpoint emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Cyan,
    Yellow,
    Magenta,
}

impl Color {
    /// ANSI escape sequence for this color.
    pub fn ansi(&self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Cyan => "\x1b[36m",
            Color::Yellow => "\x1b[33m",
            Color::Magenta => "\x1b[35m",
        }
    }

    /// CSS name for this color, as rendered by the overlay.
    pub fn css(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Cyan => "cyan",
            Color::Yellow => "yellow",
            Color::Magenta => "magenta",
        }
    }

    /// Deterministic palette color for a name, stable across runs.
    ///
    /// Used where no persisted profile exists, e.g. role-less authors in the
    /// Data API CLI.
    pub fn for_name(name: &str) -> Color {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        PALETTE[(hasher.finish() % PALETTE.len() as u64) as usize]
    }
}

/// Stable presentation attributes for one chat author.
///
/// Assigned once on first sighting and never mutated thereafter; `voice` is
/// `None` when the speech engine exposed no voices at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub color: Color,
    pub voice: Option<String>,
}

pub const ANSI_RESET: &str = "\x1b[0m";
