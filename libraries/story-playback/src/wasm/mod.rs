//! WASM bindings for story-playback
//!
//! Exposes the controller to the browser page. The page owns the DOM and the
//! `<audio>` element; it forwards events here and applies the returned effects.

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub use player::WasmStoryPlayer;
