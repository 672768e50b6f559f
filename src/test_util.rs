// Recording fakes for the rendering side. Shared with integration tests and the console replay.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::board::MoveRequest;
use crate::board_widget::{BoardWidget, WidgetCapabilities, WidgetConfig, WidgetFactory, WidgetKind};
use crate::coord::Coord;
use crate::engine::ChessEngine;
use crate::fen::grid_to_placement;
use crate::force::Force;
use crate::grid::Grid;
use crate::layout::BoardSize;
use crate::message_ui::{AvatarSide, ChatBubble, MessageView, ScrollMetrics};
use crate::online_users::{PresenceRow, PresenceView};
use crate::piece::{PieceKind, PieceOnBoard};
use crate::webchess_board::BoardHost;
use crate::wire_move::WireMove;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WidgetCall {
    Create(WidgetKind),
    // Placement part of FEN, for readable assertions.
    SetPosition { placement: String, animate: bool },
    SetOrientation(Force),
    Resize,
    Destroy,
    GreySquare(Coord),
    RemoveGreySquares,
}

// What the user would see: the state of the live widget plus the history of all calls.
#[derive(Clone, Debug)]
pub struct FakeDisplay {
    pub calls: Vec<WidgetCall>,
    pub kind: Option<WidgetKind>,
    pub position: Grid,
    pub orientation: Force,
    pub live_widgets: usize,
}

impl FakeDisplay {
    pub fn placement(&self) -> String { grid_to_placement(&self.position) }

    pub fn position_pushes(&self) -> Vec<(String, bool)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                WidgetCall::SetPosition { placement, animate } => Some((placement.clone(), *animate)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&WidgetCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

pub type SharedDisplay = Rc<RefCell<FakeDisplay>>;

pub struct FakeWidget {
    display: SharedDisplay,
    highlighting: bool,
    destroyed: bool,
}

impl FakeWidget {
    fn record(&self, call: WidgetCall) {
        assert!(!self.destroyed, "{:?} on a destroyed widget", call);
        self.display.borrow_mut().calls.push(call);
    }
}

impl BoardWidget for FakeWidget {
    fn capabilities(&self) -> WidgetCapabilities {
        WidgetCapabilities { square_highlighting: self.highlighting }
    }
    fn position(&self) -> Grid { self.display.borrow().position.clone() }
    fn set_position(&mut self, grid: &Grid, animate: bool) {
        self.record(WidgetCall::SetPosition { placement: grid_to_placement(grid), animate });
        self.display.borrow_mut().position = grid.clone();
    }
    fn orientation(&self) -> Force { self.display.borrow().orientation }
    fn set_orientation(&mut self, orientation: Force) {
        self.record(WidgetCall::SetOrientation(orientation));
        self.display.borrow_mut().orientation = orientation;
    }
    fn resize(&mut self) { self.record(WidgetCall::Resize); }
    fn destroy(&mut self) {
        self.record(WidgetCall::Destroy);
        self.destroyed = true;
        let mut display = self.display.borrow_mut();
        display.kind = None;
        display.live_widgets -= 1;
    }
    fn grey_square(&mut self, square: Coord) { self.record(WidgetCall::GreySquare(square)); }
    fn remove_grey_squares(&mut self) { self.record(WidgetCall::RemoveGreySquares); }
}

pub struct FakeWidgetFactory {
    pub display: SharedDisplay,
    pub supports_3d: bool,
    pub highlighting: bool,
}

impl FakeWidgetFactory {
    pub fn new(supports_3d: bool, highlighting: bool) -> Self {
        FakeWidgetFactory {
            display: Rc::new(RefCell::new(FakeDisplay {
                calls: Vec::new(),
                kind: None,
                position: Grid::new(),
                orientation: Force::White,
                live_widgets: 0,
            })),
            supports_3d,
            highlighting,
        }
    }
}

impl WidgetFactory for FakeWidgetFactory {
    fn supports(&self, kind: WidgetKind) -> bool {
        match kind {
            WidgetKind::TwoD => true,
            WidgetKind::ThreeD => self.supports_3d,
        }
    }
    fn create(&mut self, config: &WidgetConfig) -> Box<dyn BoardWidget> {
        let mut display = self.display.borrow_mut();
        display.calls.push(WidgetCall::Create(config.kind));
        display.kind = Some(config.kind);
        display.position = config.position.clone();
        display.orientation = Force::White;
        display.live_widgets += 1;
        Box::new(FakeWidget {
            display: Rc::clone(&self.display),
            highlighting: self.highlighting,
            destroyed: false,
        })
    }
}

#[derive(Clone, Debug)]
pub struct FakeHost {
    pub width: u32,
    pub height: u32,
    pub promotion: PieceKind,
    pub allow_drag: bool,
    pub manual_moves: Vec<WireMove>,
    pub resizes: Vec<BoardSize>,
}

impl FakeHost {
    pub fn new(width: u32, height: u32) -> Self {
        FakeHost {
            width,
            height,
            promotion: PieceKind::Queen,
            allow_drag: true,
            manual_moves: Vec::new(),
            resizes: Vec::new(),
        }
    }
}

impl BoardHost for FakeHost {
    fn on_manual_move(&mut self, mv: WireMove) { self.manual_moves.push(mv); }
    fn on_drag_start(&mut self, _source: Coord, _piece: PieceOnBoard) -> bool { self.allow_drag }
    fn intended_width(&self) -> u32 { self.width }
    fn intended_height(&self) -> u32 { self.height }
    fn on_resize(&mut self, size: BoardSize) { self.resizes.push(size); }
    fn promotion(&self) -> PieceKind { self.promotion }
}

pub const FAKE_ELEMENT_HEIGHT: f64 = 50.0;

#[derive(Clone, PartialEq, Debug)]
pub struct FakeNode {
    pub id: usize,
    pub text: String,
    pub username: Option<String>,
    pub side: Option<AvatarSide>,
    pub time_label: Option<String>,
}

// Every element is `FAKE_ELEMENT_HEIGHT` pixels tall.
#[derive(Clone, Debug, Default)]
pub struct FakeMessageView {
    // Elements in the container, in display order.
    pub nodes: Vec<FakeNode>,
    // Rendered but not inserted.
    pub detached: HashMap<usize, FakeNode>,
    pub scroll_top: f64,
    pub client_height: f64,
    pub inactive: bool,
    next_id: usize,
}

impl FakeMessageView {
    pub fn new(client_height: f64) -> Self {
        FakeMessageView { client_height, ..Default::default() }
    }

    fn add_detached(&mut self, node: impl FnOnce(usize) -> FakeNode) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.detached.insert(id, node(id));
        id
    }

    // Arbitrary non-bubble element, e.g. a "load more" marker.
    pub fn make_element(&mut self, text: &str) -> usize {
        self.add_detached(|id| FakeNode {
            id,
            text: text.to_owned(),
            username: None,
            side: None,
            time_label: None,
        })
    }

    fn take_detached(&mut self, id: usize) -> FakeNode {
        self.detached.remove(&id).expect("element is not detached")
    }

    pub fn texts(&self) -> Vec<&str> { self.nodes.iter().map(|n| n.text.as_str()).collect() }
    pub fn sides(&self) -> Vec<Option<AvatarSide>> { self.nodes.iter().map(|n| n.side).collect() }
    pub fn node(&self, id: usize) -> Option<&FakeNode> { self.nodes.iter().find(|n| n.id == id) }
}

impl MessageView for FakeMessageView {
    type Element = usize;

    fn render_bubble(&mut self, bubble: &ChatBubble) -> usize {
        self.add_detached(|id| FakeNode {
            id,
            text: bubble.text.clone(),
            username: Some(bubble.username.clone()),
            side: Some(bubble.side),
            time_label: Some(bubble.time_label.clone()),
        })
    }
    fn set_time_label(&mut self, element: &usize, label: &str) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == *element) {
            node.time_label = Some(label.to_owned());
        }
    }
    fn append(&mut self, element: &usize) {
        let node = self.take_detached(*element);
        self.nodes.push(node);
    }
    fn prepend(&mut self, element: &usize) {
        let node = self.take_detached(*element);
        self.nodes.insert(0, node);
    }
    fn remove(&mut self, element: &usize) { self.nodes.retain(|n| n.id != *element); }
    fn remove_all(&mut self) { self.nodes.clear(); }
    fn outer_height(&self, _element: &usize) -> f64 { FAKE_ELEMENT_HEIGHT }
    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            scroll_height: (self.nodes.len() as f64 * FAKE_ELEMENT_HEIGHT).max(self.client_height),
            client_height: self.client_height,
        }
    }
    fn set_scroll_top(&mut self, scroll_top: f64) { self.scroll_top = scroll_top; }
    fn set_inactive(&mut self, inactive: bool) { self.inactive = inactive; }
}

#[derive(Clone, Debug, Default)]
pub struct FakePresenceView {
    pub rows: Vec<PresenceRow>,
    pub num_appends: usize,
}

impl FakePresenceView {
    pub fn usernames(&self) -> Vec<&str> { self.rows.iter().map(|r| r.username.as_str()).collect() }
}

impl PresenceView for FakePresenceView {
    type Element = String;

    fn append_row(&mut self, row: &PresenceRow) -> String {
        self.rows.push(row.clone());
        self.num_appends += 1;
        row.username.clone()
    }
    fn remove_row(&mut self, element: String) { self.rows.retain(|r| r.username != element); }
    fn remove_all(&mut self) { self.rows.clear(); }
}

// Plays space-separated wire moves, e.g. "e2e4 e7e5 g1f3".
pub fn replay_moves(engine: &mut ChessEngine, moves: &str) -> Result<(), String> {
    for notation in moves.split_whitespace() {
        let mv = WireMove::parse(notation).map_err(|err| err.to_string())?;
        let request: MoveRequest = mv.to_request();
        engine.move_piece(request).ok_or_else(|| format!("illegal move: {}", notation))?;
    }
    Ok(())
}
