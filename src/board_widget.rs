// Interface to the board rendering widgets. The adapter never talks to a concrete widget: the
// browser build wraps chessboard.js/chessboard3.js, the console build draws to a terminal and
// tests use recording fakes.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::coord::Coord;
use crate::force::Force;
use crate::grid::Grid;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, Serialize, Deserialize)]
pub enum WidgetKind {
    TwoD,
    ThreeD,
}

impl WidgetKind {
    pub fn opposite(self) -> Self {
        match self {
            WidgetKind::TwoD => WidgetKind::ThreeD,
            WidgetKind::ThreeD => WidgetKind::TwoD,
        }
    }
}

// Optional widget features. Queried once when the widget is created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WidgetCapabilities {
    pub square_highlighting: bool,
}

// Outcome of a drag-and-drop, as reported back to the widget.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DropOutcome {
    Accepted,
    // Return the piece to its source square.
    Snapback,
}

impl DropOutcome {
    // Token understood by chessboard.js `onDrop`; `None` lets the drop stand.
    pub fn as_widget_token(self) -> Option<&'static str> {
        match self {
            DropOutcome::Accepted => None,
            DropOutcome::Snapback => Some("snapback"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct WidgetConfig {
    pub kind: WidgetKind,
    pub position: Grid,
    pub draggable: bool,
    pub spare_pieces: bool,
    pub camera_controls: bool,
    pub piece_theme: String,
    // 3D piece models; only set for `WidgetKind::ThreeD`.
    pub piece_set: Option<String>,
    pub font_file: Option<String>,
}

pub trait BoardWidget {
    fn capabilities(&self) -> WidgetCapabilities;

    fn position(&self) -> Grid;
    fn set_position(&mut self, grid: &Grid, animate: bool);
    fn orientation(&self) -> Force;
    fn set_orientation(&mut self, orientation: Force);
    // Re-reads container dimensions.
    fn resize(&mut self);
    fn destroy(&mut self);

    // Highlighting. Only called if `capabilities().square_highlighting` is set.
    fn grey_square(&mut self, _square: Coord) {}
    fn remove_grey_squares(&mut self) {}
}

pub trait WidgetFactory {
    fn supports(&self, kind: WidgetKind) -> bool;
    fn create(&mut self, config: &WidgetConfig) -> Box<dyn BoardWidget>;
}
