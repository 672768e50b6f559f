// Feeds a recorded server transcript through the game state machine.

use std::io::BufRead;

use anyhow::Context;
use webchess::engine::ChessEngine;
use webchess::event::ServerMessage;
use webchess::game_state::{GameAction, GameSession, TransportEvent};


// One event per line: "connected", "disconnected", or a JSON server message. Blank lines and lines
// starting with '#' are skipped.
pub fn parse_event(line: &str) -> anyhow::Result<Option<TransportEvent>> {
    let line = line.trim();
    Ok(match line {
        "" => None,
        _ if line.starts_with('#') => None,
        "connected" => Some(TransportEvent::Connected),
        "disconnected" => Some(TransportEvent::Disconnected),
        _ => {
            let message: ServerMessage =
                serde_json::from_str(line).context("Invalid server message")?;
            Some(TransportEvent::Server(message))
        }
    })
}

pub fn run(input: impl BufRead) -> anyhow::Result<()> {
    let mut session = GameSession::new();
    let mut engine = ChessEngine::new();
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let Some(event) = parse_event(&line).with_context(|| format!("Line {}", line_no))? else {
            continue;
        };
        let actions = match session.process(event) {
            Ok(actions) => actions,
            Err(err) => {
                eprintln!("Line {}: {}", line_no, err);
                continue;
            }
        };
        for action in actions {
            match &action {
                GameAction::ApplyOpponentMove(mv) => {
                    if engine.move_piece(mv.to_request()).is_none() {
                        eprintln!("Line {}: illegal move {}", line_no, mv);
                    }
                }
                GameAction::ReplayMoves(moves) => {
                    engine.reset();
                    for mv in moves {
                        if engine.move_piece(mv.to_request()).is_none() {
                            eprintln!("Line {}: illegal move {} in history", line_no, mv);
                            break;
                        }
                    }
                }
                _ => {}
            }
            println!("{:?}", action);
        }
        println!("-> {:?}", session.state());
    }
    println!("FEN: {}", engine.fen());
    Ok(())
}


#[cfg(test)]
mod tests {
    use webchess::event::GameResult;

    use super::*;

    #[test]
    fn parses_transcript_lines() {
        assert!(parse_event("  ").unwrap().is_none());
        assert!(parse_event("# comment").unwrap().is_none());
        assert!(matches!(parse_event("connected").unwrap(), Some(TransportEvent::Connected)));
        assert!(matches!(
            parse_event(r#"{"type": "game_end", "winner": "draw", "out_of_time": false}"#).unwrap(),
            Some(TransportEvent::Server(ServerMessage::GameEnd {
                winner: GameResult::Draw,
                out_of_time: false
            }))
        ));
        assert!(parse_event("{not json").is_err());
    }
}
