// Client-side game flow: which side is to move, whether the game is over and what the page
// should do in response to server messages.

use std::fmt;

use log::{debug, info};

use crate::event::{ClientMessage, GameResult, ServerMessage};
use crate::force::Force;
use crate::wire_move::WireMove;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Disconnected,
    // Connected, the game hasn't started yet.
    Waiting,
    MyTurn,
    // Also used for all turns when spectating.
    OpponentTurn,
    Ended {
        // `None` if the game was abandoned before it started.
        result: Option<GameResult>,
        timed_out: bool,
    },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    Server(ServerMessage),
}

// What the page should do after an event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameAction {
    ApplyOpponentMove(WireMove),
    // Reset the board and replay these moves without animation.
    ReplayMoves(Vec<WireMove>),
    ShowOpponent(String),
    ShowDrawOffer,
    GameOver {
        result: Option<GameResult>,
        timed_out: bool,
    },
    ConnectionLost,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStateError {
    NotConnected,
    AlreadyConnected,
    UnexpectedMessage { state: GameState, message: String },
    NotMyTurn,
}

impl fmt::Display for GameStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStateError::NotConnected => write!(f, "not connected"),
            GameStateError::AlreadyConnected => write!(f, "already connected"),
            GameStateError::UnexpectedMessage { state, message } => {
                write!(f, "unexpected message {} in state {:?}", message, state)
            }
            GameStateError::NotMyTurn => write!(f, "cannot move: not my turn"),
        }
    }
}

fn message_name(message: &ServerMessage) -> &'static str {
    match message {
        ServerMessage::GameStatus { .. } => "game_status",
        ServerMessage::GameStart { .. } => "game_start",
        ServerMessage::Move { .. } => "move",
        ServerMessage::GameEnd { .. } => "game_end",
        ServerMessage::PendingTimeout => "pending_timeout",
    }
}

#[derive(Clone, Debug)]
pub struct GameSession {
    state: GameState,
    my_force: Option<Force>,
    opponent: Option<String>,
}

impl GameSession {
    pub fn new() -> Self {
        GameSession {
            state: GameState::Disconnected,
            my_force: None,
            opponent: None,
        }
    }

    pub fn state(&self) -> GameState { self.state }
    pub fn my_force(&self) -> Option<Force> { self.my_force }
    pub fn opponent(&self) -> Option<&str> { self.opponent.as_deref() }
    pub fn is_spectator(&self) -> bool { self.my_force.is_none() }

    // On error the state is unchanged.
    pub fn process(&mut self, event: TransportEvent) -> Result<Vec<GameAction>, GameStateError> {
        let actions = match event {
            TransportEvent::Connected => {
                if self.state != GameState::Disconnected {
                    return Err(GameStateError::AlreadyConnected);
                }
                self.state = GameState::Waiting;
                vec![]
            }
            TransportEvent::Disconnected => {
                if self.state == GameState::Disconnected {
                    return Err(GameStateError::NotConnected);
                }
                self.state = GameState::Disconnected;
                vec![GameAction::ConnectionLost]
            }
            TransportEvent::Server(message) => self.process_server_message(message)?,
        };
        debug!("Game state: {:?}", self.state);
        Ok(actions)
    }

    fn process_server_message(
        &mut self, message: ServerMessage,
    ) -> Result<Vec<GameAction>, GameStateError> {
        use GameState::*;
        let unexpected = |state, message: &ServerMessage| GameStateError::UnexpectedMessage {
            state,
            message: message_name(message).to_owned(),
        };
        match (self.state, message) {
            (Disconnected, _) => Err(GameStateError::NotConnected),
            (_, ServerMessage::GameStatus { status }) => {
                self.my_force = status.my_force();
                self.opponent = match self.my_force {
                    Some(Force::White) => status.black.clone(),
                    Some(Force::Black) => Some(status.white.clone()),
                    None => None,
                };
                self.state = match (status.victory, status.turn) {
                    (Some(result), _) => Ended { result: Some(result), timed_out: false },
                    (None, None) => Waiting,
                    (None, Some(turn)) => self.turn_state(turn),
                };
                Ok(vec![GameAction::ReplayMoves(status.moves)])
            }
            (Waiting, ServerMessage::GameStart { opponent }) => {
                info!("Game started against {}", opponent);
                self.opponent = Some(opponent.clone());
                self.state = self.turn_state(Force::White);
                Ok(vec![GameAction::ShowOpponent(opponent)])
            }
            (OpponentTurn, ServerMessage::Move { mv, draw_requested }) => {
                self.state = if self.is_spectator() { OpponentTurn } else { MyTurn };
                let mut actions = vec![GameAction::ApplyOpponentMove(mv)];
                if draw_requested {
                    actions.push(GameAction::ShowDrawOffer);
                }
                Ok(actions)
            }
            (Waiting | MyTurn | OpponentTurn, ServerMessage::GameEnd { winner, out_of_time }) => {
                info!("Game over: {:?}", winner);
                let result = Some(winner);
                self.state = Ended { result, timed_out: out_of_time };
                Ok(vec![GameAction::GameOver { result, timed_out: out_of_time }])
            }
            (Waiting, ServerMessage::PendingTimeout) => {
                info!("Game abandoned: no opponent joined");
                self.state = Ended { result: None, timed_out: true };
                Ok(vec![GameAction::GameOver { result: None, timed_out: true }])
            }
            (state, message) => Err(unexpected(state, &message)),
        }
    }

    fn turn_state(&self, turn: Force) -> GameState {
        if self.my_force == Some(turn) {
            GameState::MyTurn
        } else {
            GameState::OpponentTurn
        }
    }

    // A move made on this client. Returns the message to send to the server.
    pub fn player_move(
        &mut self, mv: WireMove, request_draw: bool,
    ) -> Result<ClientMessage, GameStateError> {
        match self.state {
            GameState::MyTurn => {
                self.state = GameState::OpponentTurn;
                Ok(ClientMessage::Move { mv, request_draw })
            }
            GameState::Disconnected => Err(GameStateError::NotConnected),
            _ => Err(GameStateError::NotMyTurn),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self { Self::new() }
}
