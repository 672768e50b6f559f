// Forsyth-Edwards Notation for `Position`, plus the placement-only form ("piece field") that board
// widgets understand.

use enum_map::enum_map;
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::board::{CastlingRights, Position};
use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{CastleDirection, PieceKind, piece_from_ascii, piece_to_ascii};
use crate::util::as_single_char;


pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn force_from_fen(s: &str) -> Result<Force, String> {
    as_single_char(s)
        .and_then(Force::from_fen_char)
        .ok_or_else(|| format!("invalid force: {}", s))
}

fn castling_char(force: Force, dir: CastleDirection) -> char {
    let ch = match dir {
        CastleDirection::ASide => 'q',
        CastleDirection::HSide => 'k',
    };
    match force {
        Force::White => ch.to_ascii_uppercase(),
        Force::Black => ch,
    }
}

fn castling_rights_to_fen(castling_rights: &CastlingRights) -> String {
    // FEN order is "KQkq": king side first.
    let s: String = Force::iter()
        .flat_map(|force| {
            [CastleDirection::HSide, CastleDirection::ASide]
                .into_iter()
                .filter(move |&dir| castling_rights[force][dir])
                .map(move |dir| castling_char(force, dir))
        })
        .collect();
    if s.is_empty() { "-".to_owned() } else { s }
}
fn castling_rights_from_fen(s: &str) -> Result<CastlingRights, String> {
    let mut castling_rights = enum_map! { _ => enum_map! { _ => false } };
    if s == "-" {
        return Ok(castling_rights);
    }
    for ch in s.chars() {
        let (force, dir) = Force::iter()
            .cartesian_product(CastleDirection::iter())
            .find(|&(force, dir)| castling_char(force, dir) == ch)
            .ok_or_else(|| format!("invalid castling rights: {}", s))?;
        castling_rights[force][dir] = true;
    }
    Ok(castling_rights)
}

fn en_passant_target_to_fen(en_passant_target: Option<Coord>) -> String {
    match en_passant_target {
        None => "-".to_owned(),
        Some(pos) => pos.to_algebraic(),
    }
}
fn en_passant_target_from_fen(s: &str) -> Result<Option<Coord>, String> {
    if s == "-" {
        Ok(None)
    } else {
        let pos =
            Coord::from_algebraic(s).ok_or_else(|| format!("invalid en passant target: {}", s))?;
        Ok(Some(pos))
    }
}

pub fn grid_to_placement(grid: &Grid) -> String {
    Row::all()
        .rev()
        .map(|row| {
            let mut row_notation = String::new();
            let mut empty_col_count: u8 = 0;
            for col in Col::all() {
                if let Some(piece) = grid[Coord::new(row, col)] {
                    if empty_col_count > 0 {
                        row_notation.push_str(&empty_col_count.to_string());
                        empty_col_count = 0;
                    }
                    row_notation.push(piece_to_ascii(piece));
                } else {
                    empty_col_count += 1;
                }
            }
            if empty_col_count > 0 {
                row_notation.push_str(&empty_col_count.to_string());
            }
            row_notation
        })
        .join("/")
}

pub fn placement_to_grid(placement: &str) -> Result<Grid, String> {
    let mut grid = Grid::new();
    let rows = placement.split('/').collect_vec();
    if rows.len() != NUM_ROWS as usize {
        return Err(format!("invalid FEN: has {} rows, expected {}", rows.len(), NUM_ROWS));
    }
    for (row_idx, row_notation) in rows.iter().rev().enumerate() {
        let row = Row::from_zero_based(row_idx as u8);
        let mut col: u32 = 0;
        for ch in row_notation.chars() {
            if let Some(n) = ch.to_digit(10) {
                col += n;
            } else if let Some(piece) = piece_from_ascii(ch) {
                if col >= NUM_COLS as u32 {
                    return Err(format!("invalid FEN: row {} is too long", row.to_algebraic()));
                }
                grid[Coord::new(row, Col::from_zero_based(col as u8))] = Some(piece);
                col += 1;
            } else {
                return Err(format!("invalid FEN: unknown piece: {}", ch));
            }
        }
        if col != NUM_COLS as u32 {
            return Err(format!(
                "invalid FEN: row {} has {} columns, expected {}",
                row.to_algebraic(),
                col,
                NUM_COLS
            ));
        }
    }
    Ok(grid)
}

pub fn position_to_fen(position: &Position) -> String {
    format!(
        "{} {} {} {} {} {}",
        grid_to_placement(position.grid()),
        position.active_force().to_fen_char(),
        castling_rights_to_fen(position.castling_rights()),
        en_passant_target_to_fen(position.en_passant_target()),
        position.half_turn_clock(),
        position.full_turn_index()
    )
}

// The part of FEN that identifies a position for repetition purposes: everything but the clocks.
pub fn position_repetition_key(position: &Position) -> String {
    let fen = position_to_fen(position);
    fen.split(' ').take(4).join(" ")
}

pub fn fen_to_position(fen: &str) -> Result<Position, String> {
    let (
        placement,
        active_force_notation,
        castling_notation,
        en_passant_target_notation,
        half_turn_clock,
        full_turn_index,
    ) = fen
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| format!("invalid FEN: {fen}"))?;

    let grid = placement_to_grid(placement)?;
    for force in Force::iter() {
        let num_kings = grid
            .pieces()
            .filter(|(_, piece)| piece.force == force && piece.kind == PieceKind::King)
            .count();
        if num_kings != 1 {
            return Err(format!("invalid FEN: {} has {} kings", force.name(), num_kings));
        }
    }
    let active_force = force_from_fen(active_force_notation)?;
    let castling_rights = castling_rights_from_fen(castling_notation)?;
    let en_passant_target = en_passant_target_from_fen(en_passant_target_notation)?;
    let half_turn_clock = half_turn_clock
        .parse::<u32>()
        .map_err(|_| format!("invalid half-turn clock: {}", half_turn_clock))?;
    let full_turn_index = full_turn_index
        .parse::<u32>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| format!("invalid full turn index: {}", full_turn_index))?;

    Ok(Position::new(
        grid,
        active_force,
        castling_rights,
        en_passant_target,
        half_turn_clock,
        full_turn_index,
    ))
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starting_position() {
        assert_eq!(position_to_fen(&Position::starting()), STARTING_FEN);
        assert_eq!(fen_to_position(STARTING_FEN).unwrap(), Position::starting());
    }

    #[test]
    fn partial_castling_rights() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 3 20";
        let position = fen_to_position(fen).unwrap();
        assert!(position.castling_rights()[Force::White][CastleDirection::HSide]);
        assert!(!position.castling_rights()[Force::White][CastleDirection::ASide]);
        assert!(position.castling_rights()[Force::Black][CastleDirection::ASide]);
        assert_eq!(position_to_fen(&position), fen);
        assert_eq!(position_repetition_key(&position), "r3k2r/8/8/8/8/8/8/R3K2R b Kq -");
    }

    #[test]
    fn malformed() {
        assert!(fen_to_position("").is_err());
        assert!(fen_to_position("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(fen_to_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
        assert!(fen_to_position("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
        assert!(fen_to_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
        assert!(fen_to_position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0").is_err());
    }

    #[test]
    fn placement_only() {
        let grid = placement_to_grid("8/8/8/8/4P3/8/8/8").unwrap();
        assert_eq!(grid.pieces().count(), 1);
        assert_eq!(grid_to_placement(&grid), "8/8/8/8/4P3/8/8/8");
    }
}
