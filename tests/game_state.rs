use pretty_assertions::assert_eq;
use webchess::event::{ClientMessage, GameResult, GameStatus, ServerMessage};
use webchess::game_state::{GameAction, GameSession, GameState, GameStateError, TransportEvent};
use webchess::{Force, WireMove};


fn mv(s: &str) -> WireMove { WireMove::parse(s).unwrap() }

fn server(message: ServerMessage) -> TransportEvent { TransportEvent::Server(message) }

fn status(whoami: &str, turn: Option<Force>, moves: &[&str]) -> ServerMessage {
    ServerMessage::GameStatus {
        status: GameStatus {
            white: "alice".to_owned(),
            black: Some("bob".to_owned()),
            whoami: whoami.to_owned(),
            turn,
            victory: None,
            moves: moves.iter().map(|s| mv(s)).collect(),
        },
    }
}

fn connected() -> GameSession {
    let mut session = GameSession::new();
    session.process(TransportEvent::Connected).unwrap();
    session
}

#[test]
fn host_waits_for_opponent() {
    let mut session = connected();
    assert_eq!(session.state(), GameState::Waiting);
    let pending = ServerMessage::GameStatus {
        status: GameStatus {
            white: "alice".to_owned(),
            black: None,
            whoami: "alice".to_owned(),
            turn: None,
            victory: None,
            moves: vec![],
        },
    };
    assert_eq!(session.process(server(pending)), Ok(vec![GameAction::ReplayMoves(vec![])]));
    assert_eq!(session.state(), GameState::Waiting);
    assert_eq!(session.my_force(), Some(Force::White));

    let actions = session
        .process(server(ServerMessage::GameStart { opponent: "bob".to_owned() }))
        .unwrap();
    assert_eq!(actions, vec![GameAction::ShowOpponent("bob".to_owned())]);
    assert_eq!(session.state(), GameState::MyTurn);
    assert_eq!(session.opponent(), Some("bob"));
}

#[test]
fn turns_alternate() {
    let mut session = connected();
    session.process(server(status("bob", Some(Force::White), &["e2e4", "e7e5"]))).unwrap();
    assert_eq!(session.state(), GameState::OpponentTurn);
    assert_eq!(session.opponent(), Some("alice"));

    assert_eq!(session.player_move(mv("g8f6"), false), Err(GameStateError::NotMyTurn));

    let actions = session
        .process(server(ServerMessage::Move { mv: mv("g1f3"), draw_requested: true }))
        .unwrap();
    assert_eq!(actions, vec![
        GameAction::ApplyOpponentMove(mv("g1f3")),
        GameAction::ShowDrawOffer
    ]);
    assert_eq!(session.state(), GameState::MyTurn);

    let outgoing = session.player_move(mv("b8c6"), true).unwrap();
    assert_eq!(outgoing, ClientMessage::Move { mv: mv("b8c6"), request_draw: true });
    assert_eq!(session.state(), GameState::OpponentTurn);
}

#[test]
fn unexpected_move_is_rejected() {
    let mut session = connected();
    session.process(server(status("alice", Some(Force::White), &[]))).unwrap();
    assert_eq!(session.state(), GameState::MyTurn);
    let result =
        session.process(server(ServerMessage::Move { mv: mv("e7e5"), draw_requested: false }));
    assert_eq!(result, Err(GameStateError::UnexpectedMessage {
        state: GameState::MyTurn,
        message: "move".to_owned(),
    }));
    assert_eq!(session.state(), GameState::MyTurn);
}

#[test]
fn game_end() {
    let mut session = connected();
    session.process(server(status("alice", Some(Force::Black), &["e2e4"]))).unwrap();
    let actions = session
        .process(server(ServerMessage::GameEnd { winner: GameResult::Black, out_of_time: true }))
        .unwrap();
    assert_eq!(actions, vec![GameAction::GameOver {
        result: Some(GameResult::Black),
        timed_out: true,
    }]);
    assert_eq!(session.state(), GameState::Ended {
        result: Some(GameResult::Black),
        timed_out: true,
    });
    assert_eq!(session.player_move(mv("d2d4"), false), Err(GameStateError::NotMyTurn));
}

#[test]
fn pending_timeout() {
    let mut session = connected();
    let actions = session.process(server(ServerMessage::PendingTimeout)).unwrap();
    assert_eq!(actions, vec![GameAction::GameOver { result: None, timed_out: true }]);
    assert!(matches!(session.state(), GameState::Ended { result: None, .. }));
}

#[test]
fn spectator_never_gets_the_move() {
    let mut session = connected();
    session.process(server(status("carol", Some(Force::White), &[]))).unwrap();
    assert!(session.is_spectator());
    assert_eq!(session.state(), GameState::OpponentTurn);
    session
        .process(server(ServerMessage::Move { mv: mv("e2e4"), draw_requested: false }))
        .unwrap();
    assert_eq!(session.state(), GameState::OpponentTurn);
    assert_eq!(session.player_move(mv("e7e5"), false), Err(GameStateError::NotMyTurn));
}

#[test]
fn connection_lifecycle() {
    let mut session = GameSession::new();
    assert_eq!(
        session.process(server(ServerMessage::PendingTimeout)),
        Err(GameStateError::NotConnected)
    );
    assert_eq!(session.process(TransportEvent::Disconnected), Err(GameStateError::NotConnected));
    session.process(TransportEvent::Connected).unwrap();
    assert_eq!(session.process(TransportEvent::Connected), Err(GameStateError::AlreadyConnected));
    session.process(server(status("alice", Some(Force::White), &[]))).unwrap();
    assert_eq!(session.process(TransportEvent::Disconnected), Ok(vec![GameAction::ConnectionLost]));
    assert_eq!(session.state(), GameState::Disconnected);
    assert_eq!(session.player_move(mv("e2e4"), false), Err(GameStateError::NotConnected));

    // Reconnecting resynchronizes from the status snapshot.
    session.process(TransportEvent::Connected).unwrap();
    let actions = session.process(server(status("alice", Some(Force::Black), &["e2e4"]))).unwrap();
    assert_eq!(actions, vec![GameAction::ReplayMoves(vec![mv("e2e4")])]);
    assert_eq!(session.state(), GameState::OpponentTurn);
}
