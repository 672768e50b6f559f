#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod avatar;
pub mod board;
pub mod board_widget;
pub mod config;
pub mod coord;
pub mod engine;
pub mod event;
pub mod fen;
pub mod force;
pub mod game_state;
pub mod grid;
pub mod layout;
pub mod message_ui;
pub mod online_users;
pub mod piece;
pub mod relative_time;
pub mod test_util;
pub mod timer;
pub mod utc_time;
pub mod util;
pub mod webchess_board;
pub mod wire_move;

pub use board::{MoveKind, MoveRecord, MoveRequest, Position};
pub use board_widget::{BoardWidget, DropOutcome, WidgetCapabilities, WidgetFactory, WidgetKind};
pub use config::UiConfig;
pub use coord::{Col, Coord, Row};
pub use engine::ChessEngine;
pub use force::Force;
pub use grid::Grid;
pub use layout::BoardSize;
pub use piece::{PieceKind, PieceOnBoard};
pub use webchess_board::{BoardHost, MoveOutcome, WebchessBoard};
pub use wire_move::WireMove;
