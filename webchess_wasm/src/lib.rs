// Browser front-end: exposes the board, chat and presence widgets to the page.
//
// Nothing here owns a timer loop. The page calls `refresh` on each object periodically (e.g. from
// `requestAnimationFrame`) and pending timers fire then.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod js_board;
mod web_board;
mod web_chat;
mod web_document;
mod web_element_ext;
mod web_error_handling;
mod web_online_users;

use wasm_bindgen::prelude::*;

pub use web_board::WebBoard;
pub use web_chat::WebMessageUi;
pub use web_error_handling::{RustError, last_panic, set_panic_hook};
pub use web_online_users::WebOnlineUsers;

use crate::web_error_handling::JsResult;

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

// Call once before creating any widgets. `log_level` is one of "error", "warn", "info", "debug",
// "trace".
#[wasm_bindgen]
pub fn init_page(log_level: &str) -> JsResult<()> {
    set_panic_hook();
    let level: log::Level =
        log_level.parse().map_err(|_| rust_error!("Invalid log level \"{}\"", log_level))?;
    // Repeated initialization is harmless.
    let _ = console_log::init_with_level(level);
    Ok(())
}

#[wasm_bindgen]
pub fn webchess_version() -> String { env!("CARGO_PKG_VERSION").to_owned() }
