mod common;

use common::parse_grid;
use pretty_assertions::assert_eq;
use webchess::board::{MoveKind, MoveRequest};
use webchess::fen::{STARTING_FEN, grid_to_placement};
use webchess::piece::{CastleDirection, PieceKind, PieceOnBoard};
use webchess::test_util::replay_moves;
use webchess::{ChessEngine, Coord, Force};


fn engine_from_fen(fen: &str) -> ChessEngine {
    let mut engine = ChessEngine::new();
    engine.load(fen).unwrap();
    engine
}

fn request(from: Coord, to: Coord) -> MoveRequest { MoveRequest { from, to, promote_to: None } }

#[test]
fn fools_mate() {
    let mut engine = ChessEngine::new();
    replay_moves(&mut engine, "f2f3 e7e5 g2g4 d8h4").unwrap();
    assert!(engine.in_check());
    assert!(engine.in_checkmate());
    assert!(!engine.in_stalemate());
    assert!(engine.game_over());
    assert_eq!(engine.turn(), Force::White);
    assert!(engine.moves().is_empty());
}

#[test]
fn stalemate() {
    let engine = engine_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!engine.in_check());
    assert!(engine.in_stalemate());
    assert!(!engine.in_checkmate());
    assert!(engine.in_draw());
    assert!(engine.game_over());
}

#[test]
fn insufficient_material() {
    assert!(engine_from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").insufficient_material());
    assert!(engine_from_fen("8/8/8/4k3/8/8/8/4KN2 w - - 0 1").insufficient_material());
    assert!(engine_from_fen("8/8/8/4k3/8/8/8/2B1K3 w - - 0 1").insufficient_material());
    // Both bishops on dark squares.
    assert!(engine_from_fen("8/8/8/4k3/8/4B3/8/2B1K3 w - - 0 1").insufficient_material());
    // Bishops on different colors.
    assert!(!engine_from_fen("8/8/8/4k3/8/8/8/2B1KB2 w - - 0 1").insufficient_material());
    assert!(!engine_from_fen("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1").insufficient_material());
    assert!(!engine_from_fen("8/8/8/4k3/8/8/8/R3K3 w - - 0 1").insufficient_material());
    assert!(!ChessEngine::new().insufficient_material());
}

#[test]
fn castling_moves_rook_and_clears_rights() {
    let mut engine = engine_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let mv = engine.move_piece(request(Coord::E1, Coord::G1)).unwrap();
    assert_eq!(mv.kind, MoveKind::Castle(CastleDirection::HSide));
    assert_eq!(engine.fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    let mv = engine.move_piece(request(Coord::E8, Coord::C8)).unwrap();
    assert_eq!(mv.kind, MoveKind::Castle(CastleDirection::ASide));
    assert_eq!(engine.fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
}

#[test]
fn cannot_castle_through_check() {
    let mut engine = engine_from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
    assert_eq!(engine.move_piece(request(Coord::E1, Coord::G1)), None);
    assert!(engine.move_piece(request(Coord::E1, Coord::C1)).is_some());
    assert_eq!(engine.fen(), "r3kr2/8/8/8/8/8/8/2KR3R b q - 1 1");
}

#[test]
fn cannot_castle_out_of_check() {
    let mut engine = engine_from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(engine.in_check());
    assert_eq!(engine.move_piece(request(Coord::E1, Coord::G1)), None);
    assert_eq!(engine.move_piece(request(Coord::E1, Coord::C1)), None);
}

#[test]
fn moving_rook_loses_one_right() {
    let mut engine = engine_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    replay_moves(&mut engine, "h1h5 a8a5").unwrap();
    assert_eq!(engine.fen(), "4k2r/8/8/r6R/8/8/8/R3K3 w Qk - 2 2");
}

#[test]
fn en_passant() {
    let mut engine = ChessEngine::new();
    replay_moves(&mut engine, "e2e4 a7a6 e4e5 d7d5").unwrap();
    assert!(engine.fen().contains(" d6 "));
    let mv = engine.move_piece(request(Coord::E5, Coord::D6)).unwrap();
    assert_eq!(mv.kind, MoveKind::EnPassant);
    assert_eq!(mv.captured, Some(PieceKind::Pawn));
    assert_eq!(engine.grid()[Coord::D5], None);
    assert_eq!(engine.grid()[Coord::D6], Some(PieceOnBoard::new(PieceKind::Pawn, Force::White)));
}

#[test]
fn en_passant_expires() {
    let mut engine = ChessEngine::new();
    replay_moves(&mut engine, "e2e4 a7a6 e4e5 d7d5 a2a3 a6a5").unwrap();
    assert_eq!(engine.move_piece(request(Coord::E5, Coord::D6)), None);
}

#[test]
fn promotion_required_for_promotion_moves_only() {
    let mut engine = engine_from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1");
    assert_eq!(engine.move_piece(request(Coord::A7, Coord::A8)), None);
    let mv = engine
        .move_piece(MoveRequest {
            from: Coord::A7,
            to: Coord::A8,
            promote_to: Some(PieceKind::Knight),
        })
        .unwrap();
    assert_eq!(mv.promote_to, Some(PieceKind::Knight));
    assert_eq!(engine.grid()[Coord::A8], Some(PieceOnBoard::new(PieceKind::Knight, Force::White)));

    // Promotion piece is ignored for ordinary moves.
    let mv = engine
        .move_piece(MoveRequest {
            from: Coord::A1,
            to: Coord::B1,
            promote_to: Some(PieceKind::Queen),
        })
        .unwrap();
    assert_eq!(mv.promote_to, None);
}

#[test]
fn pinned_piece_cannot_move() {
    let engine = engine_from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    assert!(engine.moves_from(Coord::E2).is_empty());
    assert!(!engine.moves_from(Coord::E1).is_empty());
}

#[test]
fn threefold_repetition() {
    let mut engine = ChessEngine::new();
    replay_moves(&mut engine, "g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1").unwrap();
    assert!(!engine.in_threefold_repetition());
    replay_moves(&mut engine, "f6g8").unwrap();
    assert!(engine.in_threefold_repetition());
    assert!(engine.in_draw());
    assert!(!engine.in_checkmate());
}

#[test]
fn fifty_move_rule() {
    let mut engine = engine_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80");
    assert!(!engine.in_draw());
    replay_moves(&mut engine, "a1a2").unwrap();
    assert!(engine.in_draw());
    assert!(!engine.in_stalemate());
    assert!(!engine.insufficient_material());
}

#[test]
fn failed_load_keeps_state() {
    let mut engine = ChessEngine::new();
    replay_moves(&mut engine, "e2e4").unwrap();
    let fen = engine.fen();
    assert!(engine.load("not a fen").is_err());
    assert_eq!(engine.fen(), fen);
    assert_eq!(engine.history().len(), 1);
    engine.reset();
    assert_eq!(engine.fen(), STARTING_FEN);
    assert!(engine.history().is_empty());
}

#[test]
fn grid_matches_diagram() {
    let mut engine = ChessEngine::new();
    replay_moves(&mut engine, "e2e4 d7d5 e4d5").unwrap();
    let expected = parse_grid(
        "
        r n b q k b n r
        p p p . p p p p
        . . . . . . . .
        . . . P . . . .
        . . . . . . . .
        . . . . . . . .
        P P P P . P P P
        R N B Q K B N R
        ",
    )
    .unwrap();
    assert_eq!(grid_to_placement(engine.grid()), grid_to_placement(&expected));
    assert_eq!(engine.history()[2].captured, Some(PieceKind::Pawn));
}
