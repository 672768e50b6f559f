// Messages exchanged with the game server over the websocket. Serialized as JSON objects tagged
// with "type".

use serde::{Deserialize, Serialize};

use crate::force::Force;
use crate::wire_move::WireMove;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    White,
    Black,
    Draw,
}

impl GameResult {
    pub fn winner(self) -> Option<Force> {
        match self {
            GameResult::White => Some(Force::White),
            GameResult::Black => Some(Force::Black),
            GameResult::Draw => None,
        }
    }
}

// Full game snapshot, sent on (re)connection.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameStatus {
    pub white: String,
    // Empty until an opponent joins.
    pub black: Option<String>,
    // Username of the receiving client.
    pub whoami: String,
    // `None` if the game hasn't started or is over.
    pub turn: Option<Force>,
    pub victory: Option<GameResult>,
    #[serde(default)]
    pub moves: Vec<WireMove>,
}

impl GameStatus {
    // The side the receiving client plays, or `None` for spectators.
    pub fn my_force(&self) -> Option<Force> {
        if self.whoami == self.white {
            Some(Force::White)
        } else if self.black.as_deref() == Some(self.whoami.as_str()) {
            Some(Force::Black)
        } else {
            None
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameStatus {
        status: GameStatus,
    },
    GameStart {
        opponent: String,
    },
    Move {
        #[serde(rename = "move")]
        mv: WireMove,
        #[serde(default)]
        draw_requested: bool,
    },
    GameEnd {
        winner: GameResult,
        out_of_time: bool,
    },
    // The game was abandoned before an opponent joined.
    PendingTimeout,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Move {
        #[serde(rename = "move")]
        mv: WireMove,
        request_draw: bool,
    },
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::coord::Coord;

    #[test]
    fn server_move() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type": "move", "move": "e7e5", "draw_requested": true}"#)
                .unwrap();
        assert_eq!(msg, ServerMessage::Move {
            mv: WireMove::new(Coord::E7, Coord::E5, None),
            draw_requested: true,
        });
    }

    #[test]
    fn server_game_end() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type": "game_end", "winner": "draw", "out_of_time": false}"#)
                .unwrap();
        assert_eq!(msg, ServerMessage::GameEnd { winner: GameResult::Draw, out_of_time: false });
        let msg: ServerMessage = serde_json::from_str(r#"{"type": "pending_timeout"}"#).unwrap();
        assert_eq!(msg, ServerMessage::PendingTimeout);
    }

    #[test]
    fn bad_move_is_rejected() {
        let msg = serde_json::from_str::<ServerMessage>(r#"{"type": "move", "move": "e7"}"#);
        assert!(msg.is_err());
    }

    #[test]
    fn client_move() {
        let msg = ClientMessage::Move {
            mv: WireMove::parse("a7a8q").unwrap(),
            request_draw: false,
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"move","move":"a7a8Q","request_draw":false}"#
        );
    }
}
