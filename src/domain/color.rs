use serde::{Deserialize, Serialize};

/// Board color, modeled as a tagged variant per the REDESIGN FLAGS rather
/// than the "White"/"Black"/`None` strings the original implementation
/// threaded through every comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// A round's per-player color slot; byes don't count as either color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSlot {
    Color(Color),
    None,
}

/// The result of `Player::color_preference` (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPreference {
    MustWhite,
    MustBlack,
    PreferWhite,
    PreferBlack,
    NoPreference,
}

impl ColorPreference {
    pub fn required_color(self) -> Option<Color> {
        match self {
            ColorPreference::MustWhite => Some(Color::White),
            ColorPreference::MustBlack => Some(Color::Black),
            _ => None,
        }
    }

    pub fn preferred_color(self) -> Option<Color> {
        match self {
            ColorPreference::MustWhite | ColorPreference::PreferWhite => Some(Color::White),
            ColorPreference::MustBlack | ColorPreference::PreferBlack => Some(Color::Black),
            ColorPreference::NoPreference => None,
        }
    }
}
