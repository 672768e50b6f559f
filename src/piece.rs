use derive_new::new;
use enum_map::Enum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::force::Force;
use crate::util::as_single_char;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new, Serialize, Deserialize)]
pub struct PieceOnBoard {
    pub kind: PieceKind,
    pub force: Force,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum CastleDirection {
    ASide, // queen side
    HSide, // king side
}

impl PieceKind {
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_algebraic_char(notation: char) -> Option<Self> {
        match notation {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        as_single_char(notation).and_then(Self::from_algebraic_char)
    }

    pub fn can_promote_to(self) -> bool {
        use PieceKind::*;
        match self {
            Pawn | King => false,
            Knight | Bishop | Rook | Queen => true,
        }
    }

    // Sliding directions (row, col) for long-range pieces. Empty for everything else.
    pub fn ray_directions(self) -> &'static [(i8, i8)] {
        const STRAIGHT: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
        const ALL: [(i8, i8); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
        match self {
            PieceKind::Bishop => &DIAGONAL,
            PieceKind::Rook => &STRAIGHT,
            PieceKind::Queen => &ALL,
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
        }
    }
}

pub const KNIGHT_JUMPS: [(i8, i8); 8] =
    [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
pub const KING_STEPS: [(i8, i8); 8] =
    [(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)];

// FEN letter: uppercase for white, lowercase for black.
pub fn piece_to_ascii(piece: PieceOnBoard) -> char {
    let ch = piece.kind.to_full_algebraic();
    match piece.force {
        Force::White => ch,
        Force::Black => ch.to_ascii_lowercase(),
    }
}

pub fn piece_from_ascii(ch: char) -> Option<PieceOnBoard> {
    let kind = PieceKind::from_algebraic_char(ch.to_ascii_uppercase())?;
    let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
    Some(PieceOnBoard { kind, force })
}

// Piece code in the form used by board widgets: "wP", "bK", etc.
pub fn piece_to_widget_code(piece: PieceOnBoard) -> String {
    format!("{}{}", piece.force.to_fen_char(), piece.kind.to_full_algebraic())
}

pub fn piece_from_widget_code(code: &str) -> Option<PieceOnBoard> {
    let (force, kind) = code.chars().collect_tuple()?;
    Some(PieceOnBoard {
        kind: PieceKind::from_algebraic_char(kind)?,
        force: Force::from_fen_char(force)?,
    })
}

pub fn piece_to_pictogram(piece: PieceOnBoard) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (piece.force, piece.kind) {
        (White, Pawn) => '♙',
        (White, Knight) => '♘',
        (White, Bishop) => '♗',
        (White, Rook) => '♖',
        (White, Queen) => '♕',
        (White, King) => '♔',
        (Black, Pawn) => '♟',
        (Black, Knight) => '♞',
        (Black, Bishop) => '♝',
        (Black, Rook) => '♜',
        (Black, Queen) => '♛',
        (Black, King) => '♚',
    }
}
