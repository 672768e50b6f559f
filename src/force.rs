use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Force {
    White,
    Black,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::White => Force::Black,
            Force::Black => Force::White,
        }
    }

    // Single-letter code used by FEN and by `turn()`: 'w' or 'b'.
    pub fn to_fen_char(self) -> char {
        match self {
            Force::White => 'w',
            Force::Black => 'b',
        }
    }
    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch {
            'w' => Some(Force::White),
            'b' => Some(Force::Black),
            _ => None,
        }
    }

    // Long name as used by the game server: "white" or "black".
    pub fn name(self) -> &'static str {
        match self {
            Force::White => "white",
            Force::Black => "black",
        }
    }
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "white" => Some(Force::White),
            "black" => Some(Force::Black),
            _ => None,
        }
    }
}
