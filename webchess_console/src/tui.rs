// Terminal stand-in for the browser board widgets.

use std::cell::RefCell;
use std::rc::Rc;

use console::Style;
use itertools::Itertools;
use log::debug;
use webchess::board_widget::{
    BoardWidget, WidgetCapabilities, WidgetConfig, WidgetFactory, WidgetKind,
};
use webchess::piece::piece_to_pictogram;
use webchess::{Col, Coord, Force, Grid, Row};


// What a terminal board currently shows.
#[derive(Clone, Debug)]
pub struct Screen {
    pub kind: Option<WidgetKind>,
    pub position: Grid,
    pub orientation: Force,
    pub highlighted: Vec<Coord>,
    pub widgets_created: usize,
}

pub type SharedScreen = Rc<RefCell<Screen>>;

pub fn new_screen() -> SharedScreen {
    Rc::new(RefCell::new(Screen {
        kind: None,
        position: Grid::new(),
        orientation: Force::White,
        highlighted: Vec::new(),
        widgets_created: 0,
    }))
}

struct TerminalWidget {
    screen: SharedScreen,
}

impl BoardWidget for TerminalWidget {
    fn capabilities(&self) -> WidgetCapabilities {
        WidgetCapabilities { square_highlighting: true }
    }

    fn position(&self) -> Grid { self.screen.borrow().position.clone() }

    fn set_position(&mut self, grid: &Grid, animate: bool) {
        debug!("Terminal board: set position (animate: {})", animate);
        self.screen.borrow_mut().position = grid.clone();
    }

    fn orientation(&self) -> Force { self.screen.borrow().orientation }
    fn set_orientation(&mut self, orientation: Force) {
        self.screen.borrow_mut().orientation = orientation;
    }

    fn resize(&mut self) {}

    fn destroy(&mut self) {
        let mut screen = self.screen.borrow_mut();
        screen.kind = None;
        screen.highlighted.clear();
    }

    fn grey_square(&mut self, square: Coord) { self.screen.borrow_mut().highlighted.push(square); }
    fn remove_grey_squares(&mut self) { self.screen.borrow_mut().highlighted.clear(); }
}

pub struct TerminalWidgetFactory {
    screen: SharedScreen,
    // Whether the "3D" mode is offered. The terminal renders both kinds the same way.
    allow_3d: bool,
}

impl TerminalWidgetFactory {
    pub fn new(screen: SharedScreen, allow_3d: bool) -> Self {
        TerminalWidgetFactory { screen, allow_3d }
    }
}

impl WidgetFactory for TerminalWidgetFactory {
    fn supports(&self, kind: WidgetKind) -> bool {
        match kind {
            WidgetKind::TwoD => true,
            WidgetKind::ThreeD => self.allow_3d,
        }
    }

    fn create(&mut self, config: &WidgetConfig) -> Box<dyn BoardWidget> {
        {
            let mut screen = self.screen.borrow_mut();
            screen.kind = Some(config.kind);
            screen.position = config.position.clone();
            screen.orientation = Force::White;
            screen.widgets_created += 1;
        }
        Box::new(TerminalWidget { screen: Rc::clone(&self.screen) })
    }
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

// Renders the board from `orientation`'s side, with rank and file labels.
pub fn render_grid(grid: &Grid, orientation: Force, highlighted: &[Coord]) -> String {
    let colors = [
        Style::new().color256(233).on_color256(222),
        Style::new().color256(233).on_color256(230),
    ];
    let highlight = Style::new().color256(233).on_color256(250);
    let rows = match orientation {
        Force::White => Row::all().rev().collect_vec(),
        Force::Black => Row::all().collect_vec(),
    };
    let cols = match orientation {
        Force::White => Col::all().collect_vec(),
        Force::Black => Col::all().rev().collect_vec(),
    };
    let file_labels = format!(
        "{}{}{}\n",
        format_square(' '),
        cols.iter().map(|col| format_square(col.to_algebraic())).join(""),
        format_square(' ')
    );
    let mut ret = file_labels.clone();
    for &row in &rows {
        ret.push_str(&format_square(row.to_algebraic()));
        for &col in &cols {
            let coord = Coord::new(row, col);
            let style = if highlighted.contains(&coord) {
                &highlight
            } else {
                &colors[usize::from(coord.is_light())]
            };
            let ch = grid[coord].map_or(' ', piece_to_pictogram);
            ret.push_str(&style.apply_to(format_square(ch)).to_string());
        }
        ret.push_str(&format_square(row.to_algebraic()));
        ret.push('\n');
    }
    ret.push_str(&file_labels);
    ret
}
