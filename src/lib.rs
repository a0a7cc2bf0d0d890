//! Warp Zone core crate.
//!
//! Retro arcade interactivity for a portfolio page, compiled to WASM. The
//! stateful cores (Konami-code detection, ephemeral coin/sparkle scheduling,
//! the session score) are plain Rust with no browser dependency so they run
//! under host `cargo test`; the `page` and `audio` modules wire them to the
//! DOM and Web Audio via `wasm-bindgen`.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod effects;
pub mod konami;
pub mod score;

mod page;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Wire every page effect and start the animation loop. Called once by the
/// page script after the module loads; calling it again resets the session
/// state but re-uses the injected keyframes.
#[wasm_bindgen]
pub fn start_effects() -> Result<(), JsValue> {
    page::start_page_effects()
}
