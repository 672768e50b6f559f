// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod replay;
mod session;
mod tui;

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, anyhow};
use clap::{Command, arg};
use webchess::engine::ChessEngine;
use webchess::{PieceKind, UiConfig};


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Webchess")
        .version(clap::crate_version!())
        .about("Console tools for the webchess board")
        .subcommand_required(true)
        .subcommand(
            Command::new("replay")
                .about("Plays moves on a terminal board and prints the final position")
                .arg(arg!([moves_file] "Whitespace-separated moves like e2e4; stdin if omitted"))
                .arg(arg!(--"config" <config_file> "Path to a yaml-serialized UiConfig"))
                .arg(arg!(--"fen" <fen> "Start position"))
                .arg(
                    arg!(--"switch-after" <ply> "Switch between 2D and 3D after this many moves")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg!(--"no-3d" "Pretend the 3D board is unavailable"))
                .arg(
                    arg!(--"promotion" <piece> "Promotion piece for dropped pawns")
                        .default_value("Q"),
                )
                .arg(
                    arg!(--"width" <px> "Available width")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("800"),
                )
                .arg(
                    arg!(--"height" <px> "Available height")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("600"),
                ),
        )
        .subcommand(
            Command::new("fen")
                .about("Prints the board and game status for a FEN position")
                .arg(arg!(<fen> "Position in Forsyth-Edwards notation")),
        )
        .subcommand(
            Command::new("session")
                .about("Runs a server transcript through the game state machine")
                .arg(arg!([transcript] "One event per line; stdin if omitted")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("replay", sub_matches)) => {
            let moves_text = read_input(sub_matches.get_one::<String>("moves_file"))?;
            let ui = match sub_matches.get_one::<String>("config") {
                Some(path) => read_config_file(path)?,
                None => UiConfig::default(),
            };
            let promotion = sub_matches.get_one::<String>("promotion").unwrap();
            let promotion = PieceKind::from_algebraic(&promotion.to_ascii_uppercase())
                .filter(|kind| kind.can_promote_to())
                .ok_or_else(|| anyhow!("Invalid promotion piece: {}", promotion))?;
            replay::run(replay::ReplayConfig {
                ui,
                start_fen: sub_matches.get_one::<String>("fen").cloned(),
                moves: moves_text.split_whitespace().map(str::to_owned).collect(),
                switch_after: sub_matches.get_one::<usize>("switch-after").copied(),
                allow_3d: !sub_matches.get_flag("no-3d"),
                promotion,
                width: *sub_matches.get_one::<u32>("width").unwrap(),
                height: *sub_matches.get_one::<u32>("height").unwrap(),
            })
        }
        Some(("fen", sub_matches)) => {
            let fen = sub_matches.get_one::<String>("fen").unwrap();
            print_position(fen)
        }
        Some(("session", sub_matches)) => {
            let transcript = read_input(sub_matches.get_one::<String>("transcript"))?;
            session::run(transcript.as_bytes())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_input(path: Option<&String>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Reading {}", path)),
        None => {
            let mut contents = String::new();
            io::stdin().read_to_string(&mut contents).context("Reading stdin")?;
            Ok(contents)
        }
    }
}

fn read_config_file(path: &str) -> anyhow::Result<UiConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Reading config file {}", path))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Parsing config file {}", path))
}

fn print_position(fen: &str) -> anyhow::Result<()> {
    let mut engine = ChessEngine::new();
    engine.load(fen).map_err(anyhow::Error::msg).context("Invalid FEN")?;
    print!("{}", tui::render_grid(engine.grid(), engine.turn(), &[]));
    println!("To move: {}", engine.turn().name());
    println!("Legal moves: {}", engine.moves().len());
    let flags = [
        ("check", engine.in_check()),
        ("checkmate", engine.in_checkmate()),
        ("stalemate", engine.in_stalemate()),
        ("insufficient material", engine.insufficient_material()),
        ("draw", engine.in_draw()),
    ];
    for (name, value) in flags {
        if value {
            println!("{}", name);
        }
    }
    Ok(())
}
