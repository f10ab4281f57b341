//! Birthday Card core crate.
//!
//! An interactive greeting card rendered into the page from WASM: light the
//! candles left to right, pop the balloons, press "Celebrate!" for an
//! automatic candle run and a confetti burst. The interaction rules live in
//! [`state`] and are plain Rust; [`card`] is the thin browser layer.

use wasm_bindgen::prelude::*;

pub mod anim;
pub mod card;
pub mod confetti;
pub mod config;
pub mod error;
pub mod state;

pub use config::CardConfig;
pub use error::CardError;
pub use state::{CardView, InteractionState, ItemView, Phase, Viewport};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    {
        // Fails only if a logger is already installed.
        let _ = console_log::init_with_level(log::Level::Debug);
    }
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the card with the built-in constants.
#[wasm_bindgen]
pub fn mount_card() -> Result<(), JsValue> {
    Ok(card::mount(CardConfig::default())?)
}

/// Mount the card with a JSON object of overrides, e.g.
/// `{"recipient": "SAM", "totalCandles": 3}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn mount_card_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = CardConfig::from_json(json)?;
    Ok(card::mount(cfg)?)
}

/// Remove the card, its listeners and any running celebration timer.
#[wasm_bindgen]
pub fn unmount_card() -> bool {
    card::unmount()
}

#[wasm_bindgen]
pub fn is_mounted() -> bool {
    card::is_mounted()
}
