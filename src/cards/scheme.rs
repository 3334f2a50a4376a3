use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Colour pairs available for transition cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// White strokes on black
    #[default]
    Classic,
    /// Black strokes on white
    Inverted,
    /// Cyan strokes on deep navy
    Neon,
    /// Cream strokes on dark brown
    Warm,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [Self::Classic, Self::Inverted, Self::Neon, Self::Warm];

    pub fn background(self) -> [u8; 3] {
        match self {
            Self::Classic => [0, 0, 0],
            Self::Inverted => [255, 255, 255],
            Self::Neon => [12, 10, 38],
            Self::Warm => [43, 27, 18],
        }
    }

    pub fn foreground(self) -> [u8; 3] {
        match self {
            Self::Classic => [255, 255, 255],
            Self::Inverted => [0, 0, 0],
            Self::Neon => [0, 240, 255],
            Self::Warm => [255, 236, 200],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Inverted => "inverted",
            Self::Neon => "neon",
            Self::Warm => "warm",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown color scheme '{}', expected one of: classic, inverted, neon, warm",
                    s
                )
            })
    }
}
