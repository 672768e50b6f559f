// Binds the rules engine to a swappable 2D/3D board widget.
//
// Animations are serialized: while the widget is animating (a move push or a dimension switch),
// programmatic moves wait in a FIFO queue and dimension switches are retried later. The widget
// never reports when an animation ends, so transitions end on fixed timers.
//
// Improvement potential: End transitions on a completion event if widgets ever provide one.

use std::collections::VecDeque;
use std::time::Duration;

use instant::Instant;
use log::{debug, info, warn};

use crate::board::MoveRequest;
use crate::board_widget::{
    BoardWidget, DropOutcome, WidgetCapabilities, WidgetFactory, WidgetKind,
};
use crate::config::UiConfig;
use crate::coord::Coord;
use crate::engine::ChessEngine;
use crate::force::Force;
use crate::grid::Grid;
use crate::layout::{BoardSize, fit_board};
use crate::piece::{PieceKind, PieceOnBoard};
use crate::timer::{TimerId, TimerQueue};
use crate::wire_move::WireMove;


pub const MOVE_TRANSITION_DURATION: Duration = Duration::from_millis(500);
pub const QUEUED_MOVE_RETRY_INTERVAL: Duration = Duration::from_millis(200);
pub const SWITCH_DIMENSIONS_RETRY_INTERVAL: Duration = Duration::from_millis(1100);
// Pushing the position right from the drop handler confuses chessboard.js.
pub const DROPPED_POSITION_PUSH_DELAY: Duration = Duration::from_millis(300);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
pub const SWITCH_RESTORE_POSITION_DELAY: Duration = Duration::from_millis(1000);
pub const SWITCH_TRANSITION_DURATION: Duration = Duration::from_millis(2000);

// Callbacks into the page that owns the board.
pub trait BoardHost {
    // A move made by dragging a piece, in wire format.
    fn on_manual_move(&mut self, mv: WireMove);
    // Whether the user may start dragging `piece`.
    fn on_drag_start(&mut self, _source: Coord, _piece: PieceOnBoard) -> bool { true }
    fn intended_width(&self) -> u32;
    fn intended_height(&self) -> u32;
    fn on_resize(&mut self, _size: BoardSize) {}
    // Piece to promote to when a pawn is dropped on the last row.
    fn promotion(&self) -> PieceKind { PieceKind::Queen }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Applied,
    // Will be applied when the current transition ends.
    Queued,
    // Malformed or illegal. Nothing changed.
    Rejected,
}

#[derive(Clone, Debug)]
enum BoardTimerAction {
    EndTransition,
    ReplayQueuedMove,
    RetrySwitchDimensions,
    PushDroppedPosition,
    RestorePosition,
    AdjustSize,
}

#[derive(Clone, Debug)]
struct QueuedMove {
    notation: String,
    animate: bool,
}

// Widget state captured before the old widget is destroyed.
#[derive(Clone, Debug)]
struct DimensionSwitch {
    position: Grid,
    orientation: Force,
}

pub struct WebchessBoard<H: BoardHost> {
    config: UiConfig,
    host: H,
    factory: Box<dyn WidgetFactory>,
    engine: ChessEngine,
    widget: Option<Box<dyn BoardWidget>>,
    capabilities: WidgetCapabilities,
    kind: WidgetKind,
    is_transitioning: bool,
    waiting_moves: VecDeque<QueuedMove>,
    timers: TimerQueue<BoardTimerAction>,
    resize_debounce: Option<TimerId>,
    pending_switch: Option<DimensionSwitch>,
    // Shown on the new widget once its entry animation settles.
    restore_position: Option<Grid>,
    board_size: Option<BoardSize>,
    destroyed: bool,
}

impl<H: BoardHost> WebchessBoard<H> {
    pub fn new(config: UiConfig, host: H, factory: Box<dyn WidgetFactory>, now: Instant) -> Self {
        let kind = if config.start_3d && factory.supports(WidgetKind::ThreeD) {
            WidgetKind::ThreeD
        } else {
            WidgetKind::TwoD
        };
        let mut board = WebchessBoard {
            config,
            host,
            factory,
            engine: ChessEngine::new(),
            widget: None,
            capabilities: WidgetCapabilities::default(),
            kind,
            is_transitioning: false,
            waiting_moves: VecDeque::new(),
            timers: TimerQueue::new(),
            resize_debounce: None,
            pending_switch: None,
            restore_position: None,
            board_size: None,
            destroyed: false,
        };
        let position = board.engine.grid().clone();
        board.create_widget(position);
        board.schedule_adjust_size(now);
        board
    }

    pub fn host(&self) -> &H { &self.host }
    pub fn host_mut(&mut self) -> &mut H { &mut self.host }
    pub fn engine(&self) -> &ChessEngine { &self.engine }
    pub fn widget_kind(&self) -> WidgetKind { self.kind }
    pub fn is_3d(&self) -> bool { self.kind == WidgetKind::ThreeD }
    pub fn is_transitioning(&self) -> bool { self.is_transitioning }
    pub fn pending_moves(&self) -> usize { self.waiting_moves.len() }
    pub fn board_size(&self) -> Option<BoardSize> { self.board_size }
    pub fn is_destroyed(&self) -> bool { self.destroyed }
    pub fn next_timer_deadline(&self) -> Option<Instant> { self.timers.next_deadline() }

    pub fn fen(&self) -> String { self.engine.fen() }
    pub fn turn(&self) -> Force { self.engine.turn() }
    pub fn in_check(&self) -> bool { self.engine.in_check() }
    pub fn in_checkmate(&self) -> bool { self.engine.in_checkmate() }
    pub fn in_stalemate(&self) -> bool { self.engine.in_stalemate() }
    // Informational: the game can still be played.
    pub fn insufficient_material(&self) -> bool { self.engine.insufficient_material() }
    // Informational: the game can still be played.
    pub fn in_threefold_repetition(&self) -> bool { self.engine.in_threefold_repetition() }
    // Informational: the game can still be played.
    pub fn fifty_move_rule(&self) -> bool {
        self.engine.in_draw()
            && !self.engine.in_stalemate()
            && !self.engine.insufficient_material()
            && !self.engine.in_threefold_repetition()
    }

    // `None` while the widget is being recreated or after `destroy`.
    pub fn orientation(&self) -> Option<Force> { self.widget.as_ref().map(|w| w.orientation()) }
    pub fn set_orientation(&mut self, orientation: Force) {
        if let Some(widget) = &mut self.widget {
            widget.set_orientation(orientation);
        }
    }

    // Replaces the game with the given position and shows it without animation.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), String> {
        self.engine.load(fen)?;
        info!("Loaded position {}", fen);
        self.sync_switch_position();
        self.push_position(false);
        Ok(())
    }

    // Restarts the game from the standard position and replays `moves` without animation. Stops
    // at the first illegal move, keeping the moves before it.
    pub fn replay_history(&mut self, moves: &[WireMove]) -> Result<(), String> {
        self.engine.reset();
        let result = moves.iter().try_for_each(|mv| {
            self.engine
                .move_piece(mv.to_request())
                .map(|_| ())
                .ok_or_else(|| format!("illegal move in history: {}", mv))
        });
        self.sync_switch_position();
        self.push_position(false);
        result
    }

    // Applies a move in wire format ("e2e4", "a7a8Q"). Moves arriving during a transition are
    // queued and replayed in order.
    pub fn move_piece(&mut self, notation: &str, animate: bool, now: Instant) -> MoveOutcome {
        if self.destroyed {
            warn!("Ignoring move {} on a destroyed board", notation);
            return MoveOutcome::Rejected;
        }
        // Later moves must not overtake queued ones.
        if self.is_transitioning || !self.waiting_moves.is_empty() {
            debug!("Queueing move {} until the board is idle", notation);
            self.waiting_moves.push_back(QueuedMove { notation: notation.to_owned(), animate });
            self.timers
                .set_timeout(now, QUEUED_MOVE_RETRY_INTERVAL, BoardTimerAction::ReplayQueuedMove);
            return MoveOutcome::Queued;
        }
        self.apply_move(notation, animate, now)
    }

    fn apply_move(&mut self, notation: &str, animate: bool, now: Instant) -> MoveOutcome {
        let mv = match WireMove::parse(notation) {
            Ok(mv) => mv,
            Err(err) => {
                debug!("Ignoring move: {}", err);
                return MoveOutcome::Rejected;
            }
        };
        if self.engine.move_piece(mv.to_request()).is_none() {
            debug!("Ignoring illegal move {}", notation);
            return MoveOutcome::Rejected;
        }
        self.push_position(animate);
        self.begin_transition(now, MOVE_TRANSITION_DURATION);
        MoveOutcome::Applied
    }

    // A position replaced mid-switch supersedes the one captured from the old widget.
    fn sync_switch_position(&mut self) {
        let grid = self.engine.grid();
        if let Some(switch) = &mut self.pending_switch {
            switch.position = grid.clone();
        }
        if let Some(position) = &mut self.restore_position {
            *position = grid.clone();
        }
    }

    fn push_position(&mut self, animate: bool) {
        if let Some(widget) = &mut self.widget {
            widget.set_position(self.engine.grid(), animate);
        }
    }

    fn begin_transition(&mut self, now: Instant, duration: Duration) {
        self.is_transitioning = true;
        self.timers.set_timeout(now, duration, BoardTimerAction::EndTransition);
    }

    // Drag-and-drop from the widget. On success the host is notified immediately and the widget
    // receives the engine position shortly after.
    pub fn on_drop(&mut self, source: Coord, target: Coord, now: Instant) -> DropOutcome {
        if self.destroyed {
            return DropOutcome::Snapback;
        }
        self.remove_grey_squares();
        let request = MoveRequest {
            from: source,
            to: target,
            promote_to: Some(self.host.promotion()),
        };
        let Some(mv) = self.engine.move_piece(request) else {
            debug!("Snapping back illegal drop {}-{}", source, target);
            return DropOutcome::Snapback;
        };
        self.host.on_manual_move(WireMove::from(mv));
        self.timers
            .set_timeout(now, DROPPED_POSITION_PUSH_DELAY, BoardTimerAction::PushDroppedPosition);
        DropOutcome::Accepted
    }

    pub fn on_drag_start(&mut self, source: Coord, piece: PieceOnBoard) -> bool {
        !self.destroyed && self.host.on_drag_start(source, piece)
    }

    // Highlights the square and its legal destinations.
    pub fn on_mouse_over_square(&mut self, square: Coord) {
        if !self.capabilities.square_highlighting {
            return;
        }
        let moves = self.engine.moves_from(square);
        if moves.is_empty() {
            return;
        }
        if let Some(widget) = &mut self.widget {
            widget.grey_square(square);
            for mv in moves {
                widget.grey_square(mv.to);
            }
        }
    }

    pub fn on_mouse_out_square(&mut self) { self.remove_grey_squares(); }

    fn remove_grey_squares(&mut self) {
        if !self.capabilities.square_highlighting {
            return;
        }
        if let Some(widget) = &mut self.widget {
            widget.remove_grey_squares();
        }
    }

    // Replaces the widget with one of the other kind, preserving position and orientation.
    pub fn switch_dimensions(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        if self.is_transitioning {
            debug!("Deferring dimension switch until the board is idle");
            self.timers.set_timeout(
                now,
                SWITCH_DIMENSIONS_RETRY_INTERVAL,
                BoardTimerAction::RetrySwitchDimensions,
            );
            return;
        }
        let Some(mut widget) = self.widget.take() else {
            warn!("Cannot switch dimensions: no board widget");
            return;
        };
        self.is_transitioning = true;
        let position = widget.position();
        let orientation = widget.orientation();
        widget.destroy();
        self.kind = self.kind.opposite();
        info!("Switching board to {:?}", self.kind);
        self.pending_switch = Some(DimensionSwitch { position, orientation });
        self.schedule_adjust_size(now);
    }

    pub fn on_window_resize(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.schedule_adjust_size(now);
    }

    fn schedule_adjust_size(&mut self, now: Instant) {
        if let Some(id) = self.resize_debounce.take() {
            self.timers.clear(id);
        }
        let id = self.timers.set_timeout(now, RESIZE_DEBOUNCE, BoardTimerAction::AdjustSize);
        self.resize_debounce = Some(id);
    }

    fn adjust_board_size(&mut self, now: Instant) {
        self.resize_debounce = None;
        let size = fit_board(self.kind, self.host.intended_width(), self.host.intended_height());
        self.board_size = Some(size);
        if let Some(widget) = &mut self.widget {
            widget.resize();
        }
        self.host.on_resize(size);
        if let Some(switch) = self.pending_switch.take() {
            // The new widget starts empty; pieces come back once its entry animation settles.
            self.create_widget(Grid::new());
            if let Some(widget) = &mut self.widget {
                widget.set_orientation(switch.orientation);
            }
            self.restore_position = Some(switch.position);
            self.timers
                .set_timeout(now, SWITCH_RESTORE_POSITION_DELAY, BoardTimerAction::RestorePosition);
            self.timers
                .set_timeout(now, SWITCH_TRANSITION_DURATION, BoardTimerAction::EndTransition);
        }
    }

    fn create_widget(&mut self, position: Grid) {
        let widget_config = self.config.widget_config(self.kind, position);
        let widget = self.factory.create(&widget_config);
        self.capabilities = widget.capabilities();
        self.widget = Some(widget);
    }

    // Fires all timers that are due, in deadline order.
    pub fn refresh(&mut self, now: Instant) {
        while let Some((_, action)) = self.timers.pop_due(now) {
            self.handle_timer(action, now);
        }
    }

    fn handle_timer(&mut self, action: BoardTimerAction, now: Instant) {
        match action {
            BoardTimerAction::EndTransition => {
                self.is_transitioning = false;
            }
            BoardTimerAction::ReplayQueuedMove => {
                if self.is_transitioning {
                    self.timers.set_timeout(
                        now,
                        QUEUED_MOVE_RETRY_INTERVAL,
                        BoardTimerAction::ReplayQueuedMove,
                    );
                } else if let Some(queued) = self.waiting_moves.pop_front() {
                    self.apply_move(&queued.notation, queued.animate, now);
                }
            }
            BoardTimerAction::RetrySwitchDimensions => {
                self.switch_dimensions(now);
            }
            BoardTimerAction::PushDroppedPosition => {
                if self.is_transitioning {
                    self.timers.set_timeout(
                        now,
                        QUEUED_MOVE_RETRY_INTERVAL,
                        BoardTimerAction::PushDroppedPosition,
                    );
                } else {
                    self.push_position(true);
                    self.begin_transition(now, MOVE_TRANSITION_DURATION);
                }
            }
            BoardTimerAction::RestorePosition => {
                if let (Some(position), Some(widget)) =
                    (self.restore_position.take(), &mut self.widget)
                {
                    widget.set_position(&position, true);
                }
            }
            BoardTimerAction::AdjustSize => {
                self.adjust_board_size(now);
            }
        }
    }

    // Releases the widget and stops all timers. The board ignores further input.
    pub fn destroy(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            widget.destroy();
        }
        self.timers.clear_all();
        self.waiting_moves.clear();
        self.pending_switch = None;
        self.restore_position = None;
        self.resize_debounce = None;
        self.is_transitioning = false;
        self.destroyed = true;
    }
}
