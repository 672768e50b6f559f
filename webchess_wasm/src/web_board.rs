use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use webchess::layout::BoardSize;
use webchess::piece::piece_to_widget_code;
use webchess::wire_move::WireMove;
use webchess::{
    BoardHost, Coord, Force, MoveOutcome, PieceKind, PieceOnBoard, UiConfig, WebchessBoard,
};

use crate::js_board::{BoardCell, JsWidgetFactory, with_live_board};
use crate::rust_error;
use crate::web_document::{WindowListener, web_document};
use crate::web_error_handling::JsResult;


#[wasm_bindgen]
extern "C" {
    // Page-side callbacks, passed in as a plain JS object.
    pub type JsBoardCallbacks;

    #[wasm_bindgen(structural, method)]
    fn on_manual_move(this: &JsBoardCallbacks, mv: &str);
    #[wasm_bindgen(structural, method)]
    fn on_drag_start(this: &JsBoardCallbacks, source: &str, piece: &str) -> bool;
    #[wasm_bindgen(structural, method)]
    fn intended_width(this: &JsBoardCallbacks) -> f64;
    #[wasm_bindgen(structural, method)]
    fn intended_height(this: &JsBoardCallbacks) -> f64;
    #[wasm_bindgen(structural, method)]
    fn on_resize(this: &JsBoardCallbacks, width: u32, height: u32);
    #[wasm_bindgen(structural, method)]
    fn promotion(this: &JsBoardCallbacks) -> String;
}

pub struct JsBoardHost {
    callbacks: JsBoardCallbacks,
    container: web_sys::HtmlElement,
}

impl BoardHost for JsBoardHost {
    fn on_manual_move(&mut self, mv: WireMove) { self.callbacks.on_manual_move(&mv.to_string()); }

    fn on_drag_start(&mut self, source: Coord, piece: PieceOnBoard) -> bool {
        self.callbacks.on_drag_start(&source.to_algebraic(), &piece_to_widget_code(piece))
    }

    fn intended_width(&self) -> u32 { to_pixels(self.callbacks.intended_width()) }
    fn intended_height(&self) -> u32 { to_pixels(self.callbacks.intended_height()) }

    fn on_resize(&mut self, size: BoardSize) {
        let style = self.container.style();
        for (property, value) in [("width", size.width), ("height", size.height)] {
            if let Err(err) = style.set_property(property, &format!("{}px", value)) {
                warn!("Cannot set board container {}: {:?}", property, err);
            }
        }
        self.callbacks.on_resize(size.width, size.height);
    }

    fn promotion(&self) -> PieceKind {
        let promotion = self.callbacks.promotion();
        match PieceKind::from_algebraic(&promotion.to_ascii_uppercase()) {
            Some(kind) if kind.can_promote_to() => kind,
            _ => {
                warn!("Invalid promotion \"{}\", promoting to queen", promotion);
                PieceKind::Queen
            }
        }
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() { value.max(0.0) as u32 } else { 0 }
}

// Board exposed to the page. Timers advance only when the page calls `refresh`. Freeing it on the
// JS side detaches the resize listener even without `destroy`.
#[wasm_bindgen]
pub struct WebBoard {
    board: Rc<BoardCell>,
    on_window_resize: Option<WindowListener>,
}

impl WebBoard {
    fn with_board<R>(
        &self, f: impl FnOnce(&mut WebchessBoard<JsBoardHost>) -> R,
    ) -> JsResult<R> {
        let mut guard =
            self.board.try_borrow_mut().map_err(|_| rust_error!("Board is busy"))?;
        let board = guard.as_mut().ok_or_else(|| rust_error!("Board is not initialized"))?;
        Ok(f(board))
    }
}

#[wasm_bindgen]
impl WebBoard {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_id: &str, config_json: &str, callbacks: JsBoardCallbacks,
    ) -> JsResult<WebBoard> {
        let config: UiConfig = if config_json.trim().is_empty() {
            UiConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|err| rust_error!("Invalid board config: {}", err))?
        };
        let container = web_document()
            .get_existing_element_by_id(container_id)?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| {
                rust_error!("Board container \"{}\" is not an HTML element", container_id)
            })?;
        let board: Rc<BoardCell> = Rc::new(RefCell::new(None));
        let factory = JsWidgetFactory::new(container_id.to_owned(), Rc::downgrade(&board));
        let host = JsBoardHost { callbacks, container };
        let webchess_board = WebchessBoard::new(config, host, Box::new(factory), Instant::now());
        *board.borrow_mut() = Some(webchess_board);

        let resize_board = Rc::downgrade(&board);
        let on_window_resize = WindowListener::new("resize", move || {
            with_live_board(&resize_board, (), |b| b.on_window_resize(Instant::now()));
        })?;
        Ok(WebBoard { board, on_window_resize: Some(on_window_resize) })
    }

    // Returns "applied", "queued" or "rejected".
    pub fn move_piece(&self, notation: &str, use_animations: bool) -> JsResult<String> {
        let outcome =
            self.with_board(|b| b.move_piece(notation, use_animations, Instant::now()))?;
        Ok(match outcome {
            MoveOutcome::Applied => "applied",
            MoveOutcome::Queued => "queued",
            MoveOutcome::Rejected => "rejected",
        }
        .to_owned())
    }

    pub fn switch_dimensions(&self) -> JsResult<()> {
        self.with_board(|b| b.switch_dimensions(Instant::now()))
    }

    pub fn load_fen(&self, fen: &str) -> JsResult<()> {
        self.with_board(|b| b.load_fen(fen))?.map_err(|err| rust_error!("{}", err))
    }

    // `moves_json` is a JSON array of wire moves, e.g. `["e2e4", "e7e5"]`.
    pub fn replay_history(&self, moves_json: &str) -> JsResult<()> {
        let moves: Vec<WireMove> = serde_json::from_str(moves_json)
            .map_err(|err| rust_error!("Invalid move list: {}", err))?;
        self.with_board(|b| b.replay_history(&moves))?.map_err(|err| rust_error!("{}", err))
    }

    pub fn set_orientation(&self, orientation: &str) -> JsResult<()> {
        let force = Force::from_name(orientation)
            .ok_or_else(|| rust_error!("Invalid orientation \"{}\"", orientation))?;
        self.with_board(|b| b.set_orientation(force))
    }

    pub fn refresh(&self) -> JsResult<()> { self.with_board(|b| b.refresh(Instant::now())) }

    pub fn fen(&self) -> JsResult<String> { self.with_board(|b| b.fen()) }
    // "w" or "b".
    pub fn turn(&self) -> JsResult<String> {
        self.with_board(|b| b.turn().to_fen_char().to_string())
    }
    pub fn in_check(&self) -> JsResult<bool> { self.with_board(|b| b.in_check()) }
    pub fn in_checkmate(&self) -> JsResult<bool> { self.with_board(|b| b.in_checkmate()) }
    pub fn in_stalemate(&self) -> JsResult<bool> { self.with_board(|b| b.in_stalemate()) }
    pub fn insufficient_material(&self) -> JsResult<bool> {
        self.with_board(|b| b.insufficient_material())
    }
    pub fn in_threefold_repetition(&self) -> JsResult<bool> {
        self.with_board(|b| b.in_threefold_repetition())
    }
    pub fn fifty_move_rule(&self) -> JsResult<bool> { self.with_board(|b| b.fifty_move_rule()) }
    pub fn is_3d(&self) -> JsResult<bool> { self.with_board(|b| b.is_3d()) }
    pub fn is_transitioning(&self) -> JsResult<bool> { self.with_board(|b| b.is_transitioning()) }

    pub fn destroy(&mut self) -> JsResult<()> {
        self.on_window_resize = None;
        self.with_board(|b| b.destroy())
    }
}
