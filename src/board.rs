// Chess position and legality. The board is always the standard 8x8 one with classical castling
// (king on the e-file, rooks on the a- and h-files).

use enum_map::{EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::coord::{Col, Coord, SubjectiveRow};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{CastleDirection, KING_STEPS, KNIGHT_JUMPS, PieceKind, PieceOnBoard};


pub type CastlingRights = EnumMap<Force, EnumMap<CastleDirection, bool>>;

const PROMOTION_TARGETS: [PieceKind; 4] =
    [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MoveKind {
    Normal,
    Capture,
    DoublePawnPush,
    EnPassant,
    Castle(CastleDirection),
}

// What the caller asks for: squares plus an optional promotion piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveRequest {
    pub from: Coord,
    pub to: Coord,
    pub promote_to: Option<PieceKind>,
}

// A fully resolved legal move ("verbose" move).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    pub force: Force,
    pub piece_kind: PieceKind,
    pub from: Coord,
    pub to: Coord,
    pub captured: Option<PieceKind>,
    pub promote_to: Option<PieceKind>,
    pub kind: MoveKind,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    grid: Grid,
    active_force: Force,
    castling_rights: CastlingRights,
    en_passant_target: Option<Coord>,
    half_turn_clock: u32,
    full_turn_index: u32,
}

fn direction_forward(force: Force) -> i8 {
    match force {
        Force::White => 1,
        Force::Black => -1,
    }
}

fn home_row_coord(force: Force, col: Col) -> Coord {
    Coord::new(SubjectiveRow::from_one_based(1).to_row(force), col)
}

fn castling_rook_col(dir: CastleDirection) -> Col {
    match dir {
        CastleDirection::ASide => Col::A,
        CastleDirection::HSide => Col::H,
    }
}

// Castling right lost when something moves from or to the given rook corner.
fn corner_castling_right(coord: Coord) -> Option<(Force, CastleDirection)> {
    match coord {
        Coord::A1 => Some((Force::White, CastleDirection::ASide)),
        Coord::H1 => Some((Force::White, CastleDirection::HSide)),
        Coord::A8 => Some((Force::Black, CastleDirection::ASide)),
        Coord::H8 => Some((Force::Black, CastleDirection::HSide)),
        _ => None,
    }
}

fn has_piece(grid: &Grid, pos: Option<Coord>, force: Force, kinds: &[PieceKind]) -> bool {
    match pos.and_then(|pos| grid[pos]) {
        Some(piece) => piece.force == force && kinds.contains(&piece.kind),
        None => false,
    }
}

// Whether any piece of `by` attacks `target`. Pseudo-legal: pins are ignored.
pub fn is_attacked(grid: &Grid, target: Coord, by: Force) -> bool {
    use PieceKind::*;
    let pawn_row = -direction_forward(by);
    if [-1, 1].into_iter().any(|d_col| has_piece(grid, target.offset((pawn_row, d_col)), by, &[Pawn]))
    {
        return true;
    }
    if KNIGHT_JUMPS.iter().any(|&d| has_piece(grid, target.offset(d), by, &[Knight])) {
        return true;
    }
    if KING_STEPS.iter().any(|&d| has_piece(grid, target.offset(d), by, &[King])) {
        return true;
    }
    for (sliders, directions) in [
        ([Rook, Queen], Rook.ray_directions()),
        ([Bishop, Queen], Bishop.ray_directions()),
    ] {
        for &direction in directions {
            let mut pos = target.offset(direction);
            while let Some(p) = pos {
                if let Some(piece) = grid[p] {
                    if piece.force == by && sliders.contains(&piece.kind) {
                        return true;
                    }
                    break;
                }
                pos = p.offset(direction);
            }
        }
    }
    false
}

pub fn is_check_to(grid: &Grid, force: Force) -> bool {
    match grid.find_king(force) {
        Some(king_pos) => is_attacked(grid, king_pos, force.opponent()),
        None => false,
    }
}

impl Position {
    pub fn new(
        grid: Grid, active_force: Force, castling_rights: CastlingRights,
        en_passant_target: Option<Coord>, half_turn_clock: u32, full_turn_index: u32,
    ) -> Self {
        Position {
            grid,
            active_force,
            castling_rights,
            en_passant_target,
            half_turn_clock,
            full_turn_index,
        }
    }

    pub fn starting() -> Self {
        use PieceKind::*;
        let back_row = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut grid = Grid::new();
        for force in [Force::White, Force::Black] {
            for (col, kind) in Col::all().zip(back_row) {
                grid[home_row_coord(force, col)] = Some(PieceOnBoard::new(kind, force));
                let pawn_row = SubjectiveRow::from_one_based(2).to_row(force);
                grid[Coord::new(pawn_row, col)] = Some(PieceOnBoard::new(Pawn, force));
            }
        }
        Position::new(grid, Force::White, enum_map! { _ => enum_map! { _ => true } }, None, 0, 1)
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn active_force(&self) -> Force { self.active_force }
    pub fn castling_rights(&self) -> &CastlingRights { &self.castling_rights }
    pub fn en_passant_target(&self) -> Option<Coord> { self.en_passant_target }
    pub fn half_turn_clock(&self) -> u32 { self.half_turn_clock }
    pub fn full_turn_index(&self) -> u32 { self.full_turn_index }

    pub fn in_check(&self) -> bool { is_check_to(&self.grid, self.active_force) }

    pub fn legal_moves(&self) -> Vec<MoveRecord> {
        Coord::all().flat_map(|from| self.legal_moves_from(from)).collect()
    }

    // Legal moves of the piece at `from`. Empty if the square is empty or holds a piece of the
    // side not to move.
    pub fn legal_moves_from(&self, from: Coord) -> Vec<MoveRecord> {
        let force = self.active_force;
        self.pseudo_moves_from(from)
            .into_iter()
            .filter(|mv| !is_check_to(self.apply(mv).grid(), force))
            .collect()
    }

    pub fn has_legal_moves(&self) -> bool {
        Coord::all().any(|from| !self.legal_moves_from(from).is_empty())
    }

    pub fn find_legal_move(&self, request: &MoveRequest) -> Option<MoveRecord> {
        self.legal_moves_from(request.from).into_iter().find(|mv| {
            mv.to == request.to && (mv.promote_to.is_none() || mv.promote_to == request.promote_to)
        })
    }

    fn pseudo_moves_from(&self, from: Coord) -> Vec<MoveRecord> {
        let Some(piece) = self.grid[from] else {
            return Vec::new();
        };
        if piece.force != self.active_force {
            return Vec::new();
        }
        let mut moves = Vec::new();
        match piece.kind {
            PieceKind::Pawn => self.add_pawn_moves(from, piece.force, &mut moves),
            PieceKind::Knight => self.add_step_moves(from, piece, &KNIGHT_JUMPS, &mut moves),
            PieceKind::King => {
                self.add_step_moves(from, piece, &KING_STEPS, &mut moves);
                self.add_castling_moves(from, piece.force, &mut moves);
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                self.add_ray_moves(from, piece, &mut moves)
            }
        }
        moves
    }

    fn simple_move(&self, piece: PieceOnBoard, from: Coord, to: Coord) -> Option<MoveRecord> {
        let captured = match self.grid[to] {
            Some(target) if target.force == piece.force => return None,
            Some(target) => Some(target.kind),
            None => None,
        };
        Some(MoveRecord {
            force: piece.force,
            piece_kind: piece.kind,
            from,
            to,
            captured,
            promote_to: None,
            kind: if captured.is_some() { MoveKind::Capture } else { MoveKind::Normal },
        })
    }

    fn add_step_moves(
        &self, from: Coord, piece: PieceOnBoard, steps: &[(i8, i8)], moves: &mut Vec<MoveRecord>,
    ) {
        for &step in steps {
            if let Some(to) = from.offset(step) {
                moves.extend(self.simple_move(piece, from, to));
            }
        }
    }

    fn add_ray_moves(&self, from: Coord, piece: PieceOnBoard, moves: &mut Vec<MoveRecord>) {
        for &direction in piece.kind.ray_directions() {
            let mut pos = from.offset(direction);
            while let Some(to) = pos {
                moves.extend(self.simple_move(piece, from, to));
                if self.grid[to].is_some() {
                    break;
                }
                pos = to.offset(direction);
            }
        }
    }

    fn add_pawn_moves(&self, from: Coord, force: Force, moves: &mut Vec<MoveRecord>) {
        let forward = direction_forward(force);
        let last_row = SubjectiveRow::from_one_based(8).to_row(force);
        let second_row = SubjectiveRow::from_one_based(2).to_row(force);
        let mut push = |to: Coord, captured: Option<PieceKind>, kind: MoveKind| {
            let base = MoveRecord {
                force,
                piece_kind: PieceKind::Pawn,
                from,
                to,
                captured,
                promote_to: None,
                kind,
            };
            if to.row == last_row {
                for promote_to in PROMOTION_TARGETS {
                    moves.push(MoveRecord { promote_to: Some(promote_to), ..base });
                }
            } else {
                moves.push(base);
            }
        };

        if let Some(one_step) = from.offset((forward, 0)) {
            if self.grid[one_step].is_none() {
                push(one_step, None, MoveKind::Normal);
                if from.row == second_row {
                    if let Some(two_steps) = from.offset((2 * forward, 0)) {
                        if self.grid[two_steps].is_none() {
                            push(two_steps, None, MoveKind::DoublePawnPush);
                        }
                    }
                }
            }
        }
        for d_col in [-1, 1] {
            let Some(to) = from.offset((forward, d_col)) else {
                continue;
            };
            match self.grid[to] {
                Some(target) if target.force != force => {
                    push(to, Some(target.kind), MoveKind::Capture)
                }
                Some(_) => {}
                None => {
                    if self.en_passant_target == Some(to) {
                        push(to, Some(PieceKind::Pawn), MoveKind::EnPassant);
                    }
                }
            }
        }
    }

    fn add_castling_moves(&self, from: Coord, force: Force, moves: &mut Vec<MoveRecord>) {
        if from != home_row_coord(force, Col::E) || is_attacked(&self.grid, from, force.opponent())
        {
            return;
        }
        for (dir, allowed) in self.castling_rights[force] {
            if !allowed {
                continue;
            }
            let rook_pos = home_row_coord(force, castling_rook_col(dir));
            if self.grid[rook_pos] != Some(PieceOnBoard::new(PieceKind::Rook, force)) {
                continue;
            }
            let (must_be_empty, king_path): (&[Col], [Col; 2]) = match dir {
                CastleDirection::ASide => (&[Col::B, Col::C, Col::D], [Col::D, Col::C]),
                CastleDirection::HSide => (&[Col::F, Col::G], [Col::F, Col::G]),
            };
            if must_be_empty.iter().any(|&col| self.grid[home_row_coord(force, col)].is_some()) {
                continue;
            }
            if king_path
                .iter()
                .any(|&col| is_attacked(&self.grid, home_row_coord(force, col), force.opponent()))
            {
                continue;
            }
            moves.push(MoveRecord {
                force,
                piece_kind: PieceKind::King,
                from,
                to: home_row_coord(force, king_path[1]),
                captured: None,
                promote_to: None,
                kind: MoveKind::Castle(dir),
            });
        }
    }

    // Applies a move produced by this position's move generator.
    pub fn apply(&self, mv: &MoveRecord) -> Position {
        let mut grid = self.grid.clone();
        let force = mv.force;
        grid[mv.from] = None;
        match mv.kind {
            MoveKind::EnPassant => {
                grid[Coord::new(mv.from.row, mv.to.col)] = None;
            }
            MoveKind::Castle(dir) => {
                let rook_from = home_row_coord(force, castling_rook_col(dir));
                let rook_to = home_row_coord(force, match dir {
                    CastleDirection::ASide => Col::D,
                    CastleDirection::HSide => Col::F,
                });
                grid[rook_to] = grid[rook_from].take();
            }
            MoveKind::Normal | MoveKind::Capture | MoveKind::DoublePawnPush => {}
        }
        let kind = mv.promote_to.unwrap_or(mv.piece_kind);
        grid[mv.to] = Some(PieceOnBoard::new(kind, force));

        let mut castling_rights = self.castling_rights;
        if mv.piece_kind == PieceKind::King {
            castling_rights[force] = enum_map! { _ => false };
        }
        for pos in [mv.from, mv.to] {
            if let Some((corner_force, dir)) = corner_castling_right(pos) {
                castling_rights[corner_force][dir] = false;
            }
        }

        let en_passant_target = match mv.kind {
            MoveKind::DoublePawnPush => mv.from.offset((direction_forward(force), 0)),
            _ => None,
        };
        let half_turn_clock = if mv.piece_kind == PieceKind::Pawn || mv.captured.is_some() {
            0
        } else {
            self.half_turn_clock + 1
        };
        let full_turn_index = match force {
            Force::White => self.full_turn_index,
            Force::Black => self.full_turn_index + 1,
        };
        Position {
            grid,
            active_force: force.opponent(),
            castling_rights,
            en_passant_target,
            half_turn_clock,
            full_turn_index,
        }
    }

    // Neither side can possibly checkmate: K v K, K+minor v K, or kings plus bishops all standing
    // on squares of one color.
    pub fn insufficient_material(&self) -> bool {
        let mut num_pieces = 0;
        let mut num_knights = 0;
        let mut bishop_square_colors = Vec::new();
        for (coord, piece) in self.grid.pieces() {
            num_pieces += 1;
            match piece.kind {
                PieceKind::Knight => num_knights += 1,
                PieceKind::Bishop => bishop_square_colors.push(coord.is_light()),
                _ => {}
            }
        }
        let num_bishops = bishop_square_colors.len();
        if num_pieces == 2 {
            true
        } else if num_pieces == 3 && (num_knights == 1 || num_bishops == 1) {
            true
        } else if num_bishops > 0 && num_pieces == num_bishops + 2 {
            bishop_square_colors.iter().all(|&light| light == bishop_square_colors[0])
        } else {
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_twenty_moves() {
        let position = Position::starting();
        assert_eq!(position.legal_moves().len(), 20);
        assert!(!position.in_check());
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let position = Position::starting();
        let mv = position
            .find_legal_move(&MoveRequest { from: Coord::E2, to: Coord::E4, promote_to: None })
            .unwrap();
        assert_eq!(mv.kind, MoveKind::DoublePawnPush);
        let next = position.apply(&mv);
        assert_eq!(next.en_passant_target(), Some(Coord::E3));
        assert_eq!(next.active_force(), Force::Black);
        assert_eq!(next.half_turn_clock(), 0);
        assert_eq!(next.full_turn_index(), 1);
    }

    #[test]
    fn knight_cannot_jump_off_board() {
        let position = Position::starting();
        let targets: Vec<_> = position.legal_moves_from(Coord::B1).iter().map(|mv| mv.to).collect();
        assert_eq!(targets, vec![Coord::C3, Coord::A3]);
    }

    #[test]
    fn opponent_pieces_have_no_moves() {
        let position = Position::starting();
        assert!(position.legal_moves_from(Coord::E7).is_empty());
        assert!(position.legal_moves_from(Coord::E4).is_empty());
    }
}
