use std::{fmt, ops};

use ndarray::{Array, Array2};
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::piece::{PieceKind, PieceOnBoard, piece_to_ascii};


// Piece placement on an 8x8 board. This is what the rendering widget mirrors.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    data: Array2<Option<PieceOnBoard>>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((NUM_ROWS as usize, NUM_COLS as usize), None),
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, PieceOnBoard)> + '_ {
        Coord::all().filter_map(|coord| self[coord].map(|piece| (coord, piece)))
    }

    pub fn find_king(&self, force: Force) -> Option<Coord> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.force == force)
            .map(|(coord, _)| coord)
    }
}

impl Default for Grid {
    fn default() -> Self { Self::new() }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<PieceOnBoard>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        &mut self.data[coord_to_index(pos)]
    }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [
        pos.row.to_zero_based() as usize,
        pos.col.to_zero_based() as usize,
    ]
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.pieces().map(|(coord, piece)| (coord.to_algebraic(), piece_to_ascii(piece))))
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_king() {
        let mut g = Grid::new();
        g[Coord::E1] = Some(PieceOnBoard::new(PieceKind::King, Force::White));
        g[Coord::E8] = Some(PieceOnBoard::new(PieceKind::Queen, Force::Black));
        assert_eq!(g.find_king(Force::White), Some(Coord::E1));
        assert_eq!(g.find_king(Force::Black), None);
        assert_eq!(g.pieces().count(), 2);
    }
}
