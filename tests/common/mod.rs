// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::time::Duration;

use instant::Instant;
use itertools::Itertools;
use webchess::coord::{Col, Coord, Row};
use webchess::grid::Grid;
use webchess::piece::piece_from_ascii;
use webchess::test_util::{FakeHost, FakeWidgetFactory, SharedDisplay};
use webchess::util::as_single_char;
use webchess::{UiConfig, WebchessBoard};


#[allow(dead_code)]
pub fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

// Test clock: all times are offsets from a fixed starting instant.
#[derive(Clone, Copy, Debug)]
pub struct TestClock {
    t0: Instant,
}

#[allow(dead_code)]
impl TestClock {
    pub fn new() -> Self { TestClock { t0: Instant::now() } }
    pub fn at(&self, millis: u64) -> Instant { self.t0 + ms(millis) }
}

#[allow(dead_code)]
pub struct BoardFixture {
    pub board: WebchessBoard<FakeHost>,
    pub display: SharedDisplay,
    pub clock: TestClock,
}

// A board created at t=0 and refreshed past the initial resize debounce.
#[allow(dead_code)]
pub fn board_fixture(config: UiConfig, supports_3d: bool, highlighting: bool) -> BoardFixture {
    let clock = TestClock::new();
    let factory = FakeWidgetFactory::new(supports_3d, highlighting);
    let display = SharedDisplay::clone(&factory.display);
    let mut board =
        WebchessBoard::new(config, FakeHost::new(800, 600), Box::new(factory), clock.at(0));
    board.refresh(clock.at(100));
    BoardFixture { board, display, clock }
}

#[allow(dead_code)]
pub fn board_2d() -> BoardFixture {
    board_fixture(UiConfig { start_3d: false, ..UiConfig::default() }, true, true)
}

// Parses a board diagram: eight rows of eight space-separated pieces, '.' for empty squares,
// rank 8 first.
#[allow(dead_code)]
pub fn parse_grid(board_str: &str) -> Result<Grid, String> {
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().collect_vec())
        .collect_vec();
    if rows.len() != 8 || rows.iter().any(|row| row.len() != 8) {
        return Err("expected 8x8 board".to_owned());
    }
    let mut grid = Grid::new();
    for (row_idx, row) in rows.iter().rev().enumerate() {
        for (col_idx, piece_str) in row.iter().enumerate() {
            let piece_char =
                as_single_char(piece_str).ok_or_else(|| format!("Invalid piece: {}", piece_str))?;
            let coord = Coord::new(
                Row::from_zero_based(row_idx as u8),
                Col::from_zero_based(col_idx as u8),
            );
            grid[coord] = if piece_char == '.' {
                None
            } else {
                Some(piece_from_ascii(piece_char).ok_or_else(|| format!("Invalid piece: {}", piece_char))?)
            };
        }
    }
    Ok(grid)
}
