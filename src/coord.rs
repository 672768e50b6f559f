use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::force::Force;


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


// Row from a force's point of view: the first row is where that force's pieces start.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SubjectiveRow {
    idx: u8, // 0-based
}

impl SubjectiveRow {
    pub const fn from_one_based(idx: u8) -> Self {
        assert!(idx >= 1 && idx <= NUM_ROWS);
        Self { idx: idx - 1 }
    }
    pub fn to_row(self, force: Force) -> Row {
        match force {
            Force::White => Row::from_zero_based(self.idx),
            Force::Black => Row::from_zero_based(NUM_ROWS - self.idx - 1),
        }
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('1' as u32)?;
        (idx < NUM_ROWS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
    pub fn offset(self, delta: i8) -> Option<Self> {
        let idx = self.idx as i8 + delta;
        (0..NUM_ROWS as i8).contains(&idx).then(|| Self::from_zero_based(idx as u8))
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('a' as u32)?;
        (idx < NUM_COLS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
    pub fn offset(self, delta: i8) -> Option<Self> {
        let idx = self.idx as i8 + delta;
        (0..NUM_COLS as i8).contains(&idx).then(|| Self::from_zero_based(idx as u8))
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    // Parses a square name like "e4". Returns `None` for anything else.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord { row: Row::from_algebraic(row)?, col: Col::from_algebraic(col)? })
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }

    // Returns the square shifted by (rows, cols), or `None` if it falls off the board.
    pub fn offset(self, (d_row, d_col): (i8, i8)) -> Option<Self> {
        Some(Coord { row: self.row.offset(d_row)?, col: self.col.offset(d_col)? })
    }

    pub fn is_light(self) -> bool { (self.row.idx + self.col.idx) % 2 == 1 }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}{})", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl Row {
    pub const _1: Row = Row::from_zero_based(0);
    pub const _2: Row = Row::from_zero_based(1);
    pub const _3: Row = Row::from_zero_based(2);
    pub const _4: Row = Row::from_zero_based(3);
    pub const _5: Row = Row::from_zero_based(4);
    pub const _6: Row = Row::from_zero_based(5);
    pub const _7: Row = Row::from_zero_based(6);
    pub const _8: Row = Row::from_zero_based(7);
}

impl Col {
    pub const A: Col = Col::from_zero_based(0);
    pub const B: Col = Col::from_zero_based(1);
    pub const C: Col = Col::from_zero_based(2);
    pub const D: Col = Col::from_zero_based(3);
    pub const E: Col = Col::from_zero_based(4);
    pub const F: Col = Col::from_zero_based(5);
    pub const G: Col = Col::from_zero_based(6);
    pub const H: Col = Col::from_zero_based(7);
}

macro_rules! file_coords {
    ($col:ident: $($name:ident @ $row:ident),* $(,)?) => {
        impl Coord {
            $(pub const $name: Coord = Coord::new(Row::$row, Col::$col);)*
        }
    };
}

file_coords!(A: A1 @ _1, A2 @ _2, A3 @ _3, A4 @ _4, A5 @ _5, A6 @ _6, A7 @ _7, A8 @ _8);
file_coords!(B: B1 @ _1, B2 @ _2, B3 @ _3, B4 @ _4, B5 @ _5, B6 @ _6, B7 @ _7, B8 @ _8);
file_coords!(C: C1 @ _1, C2 @ _2, C3 @ _3, C4 @ _4, C5 @ _5, C6 @ _6, C7 @ _7, C8 @ _8);
file_coords!(D: D1 @ _1, D2 @ _2, D3 @ _3, D4 @ _4, D5 @ _5, D6 @ _6, D7 @ _7, D8 @ _8);
file_coords!(E: E1 @ _1, E2 @ _2, E3 @ _3, E4 @ _4, E5 @ _5, E6 @ _6, E7 @ _7, E8 @ _8);
file_coords!(F: F1 @ _1, F2 @ _2, F3 @ _3, F4 @ _4, F5 @ _5, F6 @ _6, F7 @ _7, F8 @ _8);
file_coords!(G: G1 @ _1, G2 @ _2, G3 @ _3, G4 @ _4, G5 @ _5, G6 @ _6, G7 @ _7, G8 @ _8);
file_coords!(H: H1 @ _1, H2 @ _2, H3 @ _3, H4 @ _4, H5 @ _5, H6 @ _6, H7 @ _7, H8 @ _8);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic() {
        assert_eq!(Coord::from_algebraic("e4"), Some(Coord::E4));
        assert_eq!(Coord::from_algebraic("h8"), Some(Coord::H8));
        assert_eq!(Coord::from_algebraic("i1"), None);
        assert_eq!(Coord::from_algebraic("a9"), None);
        assert_eq!(Coord::from_algebraic("a10"), None);
        assert_eq!(Coord::from_algebraic(""), None);
        assert_eq!(Coord::B7.to_algebraic(), "b7");
    }

    #[test]
    fn offset_stays_on_board() {
        assert_eq!(Coord::A1.offset((1, 2)), Some(Coord::C2));
        assert_eq!(Coord::A1.offset((-1, 0)), None);
        assert_eq!(Coord::H8.offset((0, 1)), None);
    }

    #[test]
    fn square_color() {
        assert!(!Coord::A1.is_light());
        assert!(Coord::H1.is_light());
        assert!(!Coord::H8.is_light());
    }
}
