// Bindings to the chessboard.js (2D) and chessboard3.js (3D) widgets.

use std::cell::RefCell;
use std::rc::Weak;

use instant::Instant;
use log::{error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use webchess::board_widget::{
    BoardWidget, WidgetCapabilities, WidgetConfig, WidgetFactory, WidgetKind,
};
use webchess::fen::{grid_to_placement, placement_to_grid};
use webchess::piece::piece_from_widget_code;
use webchess::{Coord, Force, Grid, WebchessBoard};

use crate::web_board::JsBoardHost;
use crate::web_error_handling::JsResult;


#[wasm_bindgen]
extern "C" {
    // Any widget instance. Both libraries expose the same method set.
    #[wasm_bindgen(extends = js_sys::Object)]
    type JsBoard;

    #[wasm_bindgen(method, js_name = position)]
    fn position_as(this: &JsBoard, format: &str) -> String;
    #[wasm_bindgen(method, js_name = position)]
    fn set_position(this: &JsBoard, placement: &str, use_animation: bool);
    #[wasm_bindgen(method, js_name = orientation)]
    fn get_orientation(this: &JsBoard) -> String;
    #[wasm_bindgen(method, js_name = orientation)]
    fn set_orientation(this: &JsBoard, orientation: &str);
    #[wasm_bindgen(method)]
    fn resize(this: &JsBoard);
    #[wasm_bindgen(method)]
    fn destroy(this: &JsBoard);
    #[wasm_bindgen(method, js_name = greySquare)]
    fn grey_square(this: &JsBoard, square: &str);
    #[wasm_bindgen(method, js_name = removeGreySquares)]
    fn remove_grey_squares(this: &JsBoard);

    #[wasm_bindgen(extends = JsBoard, js_name = ChessBoard)]
    type ChessBoard2d;
    #[wasm_bindgen(constructor, js_class = "ChessBoard")]
    fn new(container_id: &str, config: &js_sys::Object) -> ChessBoard2d;

    #[wasm_bindgen(extends = JsBoard, js_name = ChessBoard3)]
    type ChessBoard3d;
    #[wasm_bindgen(constructor, js_class = "ChessBoard3")]
    fn new(container_id: &str, config: &js_sys::Object) -> ChessBoard3d;
    #[wasm_bindgen(
        static_method_of = ChessBoard3d,
        js_class = "ChessBoard3",
        js_name = webGLEnabled
    )]
    fn webgl_enabled() -> bool;
}

pub type BoardCell = RefCell<Option<WebchessBoard<JsBoardHost>>>;

// Runs `f` unless the board is gone or already borrowed. Widget callbacks may fire while the board
// is calling into the widget (e.g. a mouseout during `destroy`); those are dropped.
pub fn with_live_board<R>(
    board: &Weak<BoardCell>, default: R, f: impl FnOnce(&mut WebchessBoard<JsBoardHost>) -> R,
) -> R {
    let Some(cell) = board.upgrade() else {
        return default;
    };
    let Ok(mut guard) = cell.try_borrow_mut() else {
        warn!("Board callback ignored: board is busy");
        return default;
    };
    match guard.as_mut() {
        Some(board) => f(board),
        None => default,
    }
}

struct WidgetCallbacks {
    on_drop: Closure<dyn FnMut(String, String) -> JsValue>,
    on_drag_start: Closure<dyn FnMut(String, String) -> bool>,
    on_mouseover_square: Closure<dyn FnMut(String)>,
    on_mouseout_square: Closure<dyn FnMut()>,
}

impl WidgetCallbacks {
    fn new(board: Weak<BoardCell>) -> Self {
        let drop_board = board.clone();
        let on_drop = Closure::new(move |source: String, target: String| {
            // Spare pieces report "spare" as the source; those and off-board drops snap back.
            let (Some(source), Some(target)) =
                (Coord::from_algebraic(&source), Coord::from_algebraic(&target))
            else {
                return JsValue::from_str("snapback");
            };
            let outcome = with_live_board(&drop_board, None, |b| {
                b.on_drop(source, target, Instant::now()).as_widget_token()
            });
            outcome.map_or(JsValue::UNDEFINED, JsValue::from_str)
        });
        let drag_board = board.clone();
        let on_drag_start = Closure::new(move |source: String, piece: String| {
            let (Some(source), Some(piece)) =
                (Coord::from_algebraic(&source), piece_from_widget_code(&piece))
            else {
                return false;
            };
            with_live_board(&drag_board, false, |b| b.on_drag_start(source, piece))
        });
        let over_board = board.clone();
        let on_mouseover_square = Closure::new(move |square: String| {
            if let Some(square) = Coord::from_algebraic(&square) {
                with_live_board(&over_board, (), |b| b.on_mouse_over_square(square));
            }
        });
        let on_mouseout_square = Closure::new(move || {
            with_live_board(&board, (), |b| b.on_mouse_out_square());
        });
        WidgetCallbacks {
            on_drop,
            on_drag_start,
            on_mouseover_square,
            on_mouseout_square,
        }
    }
}

struct JsWidget {
    board: JsBoard,
    capabilities: WidgetCapabilities,
    // Referenced by the JS widget; must outlive it.
    _callbacks: WidgetCallbacks,
}

impl BoardWidget for JsWidget {
    fn capabilities(&self) -> WidgetCapabilities { self.capabilities }

    fn position(&self) -> Grid {
        let placement = self.board.position_as("fen");
        placement_to_grid(&placement).unwrap_or_else(|err| {
            error!("Widget reported invalid position \"{}\": {}", placement, err);
            Grid::new()
        })
    }

    fn set_position(&mut self, grid: &Grid, animate: bool) {
        self.board.set_position(&grid_to_placement(grid), animate);
    }

    fn orientation(&self) -> Force {
        let orientation = self.board.get_orientation();
        Force::from_name(&orientation).unwrap_or_else(|| {
            error!("Widget reported invalid orientation \"{}\"", orientation);
            Force::White
        })
    }

    fn set_orientation(&mut self, orientation: Force) {
        self.board.set_orientation(orientation.name());
    }

    fn resize(&mut self) { self.board.resize(); }
    fn destroy(&mut self) { self.board.destroy(); }

    fn grey_square(&mut self, square: Coord) { self.board.grey_square(&square.to_algebraic()); }
    fn remove_grey_squares(&mut self) { self.board.remove_grey_squares(); }
}

pub struct JsWidgetFactory {
    container_id: String,
    board: Weak<BoardCell>,
    supports_3d: bool,
}

impl JsWidgetFactory {
    pub fn new(container_id: String, board: Weak<BoardCell>) -> Self {
        JsWidgetFactory { container_id, board, supports_3d: detect_3d() }
    }

    fn make_js_config(
        &self, config: &WidgetConfig, callbacks: &WidgetCallbacks,
    ) -> JsResult<js_sys::Object> {
        let object = js_sys::Object::new();
        let set = |key: &str, value: &JsValue| -> JsResult<()> {
            js_sys::Reflect::set(&object, &JsValue::from_str(key), value)?;
            Ok(())
        };
        set("position", &grid_to_placement(&config.position).into())?;
        set("draggable", &config.draggable.into())?;
        set("sparePieces", &config.spare_pieces.into())?;
        set("dropOffBoard", &"snapback".into())?;
        set("pieceTheme", &config.piece_theme.as_str().into())?;
        if let Some(piece_set) = &config.piece_set {
            set("pieceSet", &piece_set.as_str().into())?;
            set("cameraControls", &config.camera_controls.into())?;
        }
        if let Some(font_file) = &config.font_file {
            set("fontData", &font_file.as_str().into())?;
        }
        set("onDrop", callbacks.on_drop.as_ref())?;
        set("onDragStart", callbacks.on_drag_start.as_ref())?;
        set("onMouseoverSquare", callbacks.on_mouseover_square.as_ref())?;
        set("onMouseoutSquare", callbacks.on_mouseout_square.as_ref())?;
        Ok(object)
    }
}

impl WidgetFactory for JsWidgetFactory {
    fn supports(&self, kind: WidgetKind) -> bool {
        match kind {
            WidgetKind::TwoD => true,
            WidgetKind::ThreeD => self.supports_3d,
        }
    }

    fn create(&mut self, config: &WidgetConfig) -> Box<dyn BoardWidget> {
        let callbacks = WidgetCallbacks::new(self.board.clone());
        let js_config = self.make_js_config(config, &callbacks).unwrap_or_else(|err| {
            error!("Cannot build widget config: {:?}", err);
            js_sys::Object::new()
        });
        let board: JsBoard = match config.kind {
            WidgetKind::TwoD => {
                ChessBoard2d::new(&self.container_id, &js_config).unchecked_into()
            }
            WidgetKind::ThreeD => {
                ChessBoard3d::new(&self.container_id, &js_config).unchecked_into()
            }
        };
        let capabilities = widget_capabilities(&board);
        Box::new(JsWidget { board, capabilities, _callbacks: callbacks })
    }
}

fn has_method(object: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(object, &JsValue::from_str(name)).is_ok_and(|value| value.is_function())
}

// Highlighting is optional in both libraries, so check the instance rather than the kind.
fn widget_capabilities(board: &JsValue) -> WidgetCapabilities {
    WidgetCapabilities {
        square_highlighting: has_method(board, "greySquare")
            && has_method(board, "removeGreySquares"),
    }
}

fn detect_3d() -> bool {
    let has_3d_library =
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("ChessBoard3"))
            .unwrap_or(false);
    has_3d_library && ChessBoard3d::webgl_enabled()
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    fn widget_with_methods(names: &[&str]) -> JsValue {
        let object = js_sys::Object::new();
        for name in names {
            let method = js_sys::Function::new_no_args("");
            js_sys::Reflect::set(&object, &JsValue::from_str(name), &method).unwrap();
        }
        object.into()
    }

    #[wasm_bindgen_test]
    fn highlighting_requires_both_methods() {
        let greying_only = widget_with_methods(&["greySquare"]);
        assert!(!widget_capabilities(&greying_only).square_highlighting);
        let clearing_only = widget_with_methods(&["removeGreySquares"]);
        assert!(!widget_capabilities(&clearing_only).square_highlighting);
        let full = widget_with_methods(&["greySquare", "removeGreySquares"]);
        assert!(widget_capabilities(&full).square_highlighting);
    }

    #[wasm_bindgen_test]
    fn non_function_properties_are_not_methods() {
        let object = js_sys::Object::new();
        js_sys::Reflect::set(&object, &"greySquare".into(), &JsValue::TRUE).unwrap();
        assert!(!has_method(&object, "greySquare"));
        assert!(!has_method(&object, "removeGreySquares"));
    }
}
