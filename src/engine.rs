// Rules engine consumed by the board adapter: the authoritative game state.

use std::collections::HashMap;

use crate::board::{MoveRecord, MoveRequest, Position};
use crate::coord::Coord;
use crate::fen::{self, position_repetition_key, position_to_fen};
use crate::force::Force;
use crate::grid::Grid;


// Half-turns without captures or pawn moves after which the game is drawn.
pub const FIFTY_MOVE_RULE_HALF_TURNS: u32 = 100;

#[derive(Clone, Debug)]
pub struct ChessEngine {
    position: Position,
    history: Vec<MoveRecord>,
    // Repetition key of every position reached since the last `load`/`reset` -> occurrences.
    position_counts: HashMap<String, u32>,
}

impl ChessEngine {
    pub fn new() -> Self { Self::from_position(Position::starting()) }

    fn from_position(position: Position) -> Self {
        let mut position_counts = HashMap::new();
        position_counts.insert(position_repetition_key(&position), 1);
        ChessEngine { position, history: Vec::new(), position_counts }
    }

    // Replaces the game with the given position. On error the engine is left unchanged.
    pub fn load(&mut self, fen: &str) -> Result<(), String> {
        let position = fen::fen_to_position(fen)?;
        *self = Self::from_position(position);
        Ok(())
    }

    pub fn reset(&mut self) { *self = Self::new(); }

    pub fn position(&self) -> &Position { &self.position }
    pub fn fen(&self) -> String { position_to_fen(&self.position) }
    pub fn turn(&self) -> Force { self.position.active_force() }
    pub fn grid(&self) -> &Grid { self.position.grid() }
    pub fn history(&self) -> &[MoveRecord] { &self.history }

    // Applies the move if it is legal. The promotion piece is ignored for non-promotion moves and
    // required for promotion moves.
    pub fn move_piece(&mut self, request: MoveRequest) -> Option<MoveRecord> {
        let mv = self.position.find_legal_move(&request)?;
        self.position = self.position.apply(&mv);
        self.history.push(mv);
        *self.position_counts.entry(position_repetition_key(&self.position)).or_default() += 1;
        Some(mv)
    }

    pub fn moves(&self) -> Vec<MoveRecord> { self.position.legal_moves() }
    pub fn moves_from(&self, square: Coord) -> Vec<MoveRecord> {
        self.position.legal_moves_from(square)
    }

    pub fn in_check(&self) -> bool { self.position.in_check() }
    pub fn in_checkmate(&self) -> bool { self.in_check() && !self.position.has_legal_moves() }
    pub fn in_stalemate(&self) -> bool { !self.in_check() && !self.position.has_legal_moves() }
    pub fn insufficient_material(&self) -> bool { self.position.insufficient_material() }

    // Whether any position of this game has occurred at least three times.
    pub fn in_threefold_repetition(&self) -> bool {
        self.position_counts.values().any(|&count| count >= 3)
    }

    pub fn in_draw(&self) -> bool {
        self.position.half_turn_clock() >= FIFTY_MOVE_RULE_HALF_TURNS
            || self.in_stalemate()
            || self.insufficient_material()
            || self.in_threefold_repetition()
    }

    pub fn game_over(&self) -> bool { self.in_checkmate() || self.in_draw() }
}

impl Default for ChessEngine {
    fn default() -> Self { Self::new() }
}
