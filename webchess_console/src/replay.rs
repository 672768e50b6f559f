// Drives a board through a move list on a simulated clock and prints the result.

use std::time::Duration;

use anyhow::{Context, bail};
use instant::Instant;
use log::info;
use webchess::wire_move::WireMove;
use webchess::{BoardHost, MoveOutcome, PieceKind, UiConfig, WebchessBoard};

use crate::tui::{SharedScreen, TerminalWidgetFactory, new_screen, render_grid};


// Time between consecutive moves. Shorter than a move transition, so moves get queued.
const MOVE_INTERVAL: Duration = Duration::from_millis(100);
// Stops a run whose timers never settle.
const MAX_SETTLE_STEPS: usize = 10_000;

pub struct ReplayConfig {
    pub ui: UiConfig,
    pub start_fen: Option<String>,
    pub moves: Vec<String>,
    // Switch between 2D and 3D after this many moves.
    pub switch_after: Option<usize>,
    pub allow_3d: bool,
    pub promotion: PieceKind,
    pub width: u32,
    pub height: u32,
}

struct TerminalHost {
    width: u32,
    height: u32,
    promotion: PieceKind,
}

impl BoardHost for TerminalHost {
    fn on_manual_move(&mut self, mv: WireMove) { info!("Manual move: {}", mv); }
    fn intended_width(&self) -> u32 { self.width }
    fn intended_height(&self) -> u32 { self.height }
    fn on_resize(&mut self, size: webchess::BoardSize) {
        info!("Board resized to {}x{}", size.width, size.height);
    }
    fn promotion(&self) -> PieceKind { self.promotion }
}

struct SimClock {
    now: Instant,
}

impl SimClock {
    fn advance(&mut self, board: &mut WebchessBoard<TerminalHost>, duration: Duration) {
        self.now += duration;
        board.refresh(self.now);
    }

    // Fires timers until none are left.
    fn settle(&mut self, board: &mut WebchessBoard<TerminalHost>) -> anyhow::Result<()> {
        for _ in 0..MAX_SETTLE_STEPS {
            let Some(deadline) = board.next_timer_deadline() else {
                return Ok(());
            };
            self.now = self.now.max(deadline);
            board.refresh(self.now);
        }
        bail!("Board timers did not settle");
    }
}

pub fn run(config: ReplayConfig) -> anyhow::Result<()> {
    let screen = new_screen();
    let host = TerminalHost {
        width: config.width,
        height: config.height,
        promotion: config.promotion,
    };
    let factory = TerminalWidgetFactory::new(SharedScreen::clone(&screen), config.allow_3d);
    let mut clock = SimClock { now: Instant::now() };
    let mut board = WebchessBoard::new(config.ui, host, Box::new(factory), clock.now);
    clock.settle(&mut board)?;
    if let Some(fen) = &config.start_fen {
        board.load_fen(fen).map_err(anyhow::Error::msg).context("Cannot load start position")?;
    }

    for (ply, notation) in config.moves.iter().enumerate() {
        if config.switch_after == Some(ply) {
            board.switch_dimensions(clock.now);
        }
        match board.move_piece(notation, true, clock.now) {
            MoveOutcome::Applied | MoveOutcome::Queued => {}
            MoveOutcome::Rejected => bail!("Illegal move {} at ply {}", notation, ply + 1),
        }
        clock.advance(&mut board, MOVE_INTERVAL);
    }
    if config.switch_after == Some(config.moves.len()) {
        board.switch_dimensions(clock.now);
    }
    clock.settle(&mut board)?;

    // Queued moves are validated only when replayed.
    let applied = board.engine().history().len();
    if applied != config.moves.len() {
        bail!("Only {} of {} moves could be applied", applied, config.moves.len());
    }

    let screen = screen.borrow();
    print!("{}", render_grid(&screen.position, screen.orientation, &screen.highlighted));
    println!("FEN: {}", board.fen());
    println!("Widget: {:?}, created {} time(s)", board.widget_kind(), screen.widgets_created);
    if let Some(size) = board.board_size() {
        println!("Size: {}x{}", size.width, size.height);
    }
    println!("To move: {}", board.turn().name());
    let flags = [
        ("check", board.in_check()),
        ("checkmate", board.in_checkmate()),
        ("stalemate", board.in_stalemate()),
        ("insufficient material", board.insufficient_material()),
        ("threefold repetition", board.in_threefold_repetition()),
        ("fifty-move rule", board.fifty_move_rule()),
    ];
    for (name, value) in flags {
        if value {
            println!("{}", name);
        }
    }
    Ok(())
}
