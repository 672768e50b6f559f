// The move encoding exchanged with callers and the game server: source square, destination square
// and an optional promotion letter, e.g. "e2e4" or "a7a8Q".

use std::fmt;

use lazy_static::lazy_static;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::board::{MoveRecord, MoveRequest};
use crate::coord::Coord;
use crate::piece::PieceKind;


#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMoveError {
    Malformed(String),
    InvalidPromotion(char),
}

impl fmt::Display for WireMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireMoveError::Malformed(s) => write!(f, "malformed move: \"{}\"", s),
            WireMoveError::InvalidPromotion(ch) => write!(f, "invalid promotion piece: '{}'", ch),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WireMove {
    pub from: Coord,
    pub to: Coord,
    pub promotion: Option<PieceKind>,
}

impl WireMove {
    pub fn new(from: Coord, to: Coord, promotion: Option<PieceKind>) -> Self {
        WireMove { from, to, promotion }
    }

    // Accepts promotion letters in either case.
    pub fn parse(s: &str) -> Result<Self, WireMoveError> {
        lazy_static! {
            static ref MOVE_RE: Regex = Regex::new(r"^([a-h][1-8])([a-h][1-8])(.)?$").unwrap();
        }
        let malformed = || WireMoveError::Malformed(s.to_owned());
        let cap = MOVE_RE.captures(s).ok_or_else(malformed)?;
        let from = Coord::from_algebraic(&cap[1]).ok_or_else(malformed)?;
        let to = Coord::from_algebraic(&cap[2]).ok_or_else(malformed)?;
        let promotion = match cap.get(3) {
            None => None,
            Some(m) => {
                let ch = m.as_str().chars().next().ok_or_else(malformed)?;
                let kind = PieceKind::from_algebraic_char(ch.to_ascii_uppercase())
                    .filter(|kind| kind.can_promote_to())
                    .ok_or(WireMoveError::InvalidPromotion(ch))?;
                Some(kind)
            }
        };
        Ok(WireMove { from, to, promotion })
    }

    pub fn to_request(self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promote_to: self.promotion,
        }
    }
}

impl From<MoveRecord> for WireMove {
    fn from(mv: MoveRecord) -> Self { WireMove::new(mv.from, mv.to, mv.promote_to) }
}

impl fmt::Display for WireMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_full_algebraic())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for WireMove {
    type Error = WireMoveError;
    fn try_from(s: String) -> Result<Self, Self::Error> { WireMove::parse(&s) }
}

impl From<WireMove> for String {
    fn from(mv: WireMove) -> Self { mv.to_string() }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(WireMove::parse("e2e4"), Ok(WireMove::new(Coord::E2, Coord::E4, None)));
        assert_eq!(
            WireMove::parse("a7a8q"),
            Ok(WireMove::new(Coord::A7, Coord::A8, Some(PieceKind::Queen)))
        );
        assert_eq!(WireMove::parse("e2e9"), Err(WireMoveError::Malformed("e2e9".to_owned())));
        assert_eq!(WireMove::parse("e2e4e5"), Err(WireMoveError::Malformed("e2e4e5".to_owned())));
        assert_eq!(WireMove::parse(""), Err(WireMoveError::Malformed("".to_owned())));
        assert_eq!(WireMove::parse("a7a8K"), Err(WireMoveError::InvalidPromotion('K')));
        assert_eq!(WireMove::parse("a7a8x"), Err(WireMoveError::InvalidPromotion('x')));
    }

    #[test]
    fn promotion_is_uppercased() {
        assert_eq!(WireMove::parse("h2h1n").unwrap().to_string(), "h2h1N");
        assert_eq!(WireMove::parse("g1f3").unwrap().to_string(), "g1f3");
    }

    #[test]
    fn serde() {
        let mv: WireMove = serde_json::from_str("\"b7b8R\"").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Rook));
        assert_eq!(serde_json::to_string(&mv).unwrap(), "\"b7b8R\"");
    }
}
