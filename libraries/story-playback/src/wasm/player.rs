//! WASM-compatible PlayerController wrapper

use crate::{
    Direction, Effect, PlaybackPhase, PlayerConfig, PlayerController, PlayerEvent, ThemeCatalog,
};
use js_sys::Function;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// WASM-compatible story player
///
/// Timestamps are milliseconds from `performance.now()`. Every method returns
/// the effects as a JS array and also hands them to the `onEffects` callback,
/// if one is registered.
#[wasm_bindgen]
pub struct WasmStoryPlayer {
    inner: PlayerController,
    on_effects: Option<Function>,
}

#[wasm_bindgen]
impl WasmStoryPlayer {
    /// Create a player for a layout ("grid" | "carousel")
    #[wasm_bindgen(constructor)]
    pub fn new(layout: &str) -> Result<WasmStoryPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config = match layout {
            "grid" => PlayerConfig::grid(),
            "carousel" => PlayerConfig::carousel(),
            _ => return Err(JsValue::from_str("Invalid layout. Use 'grid' or 'carousel'")),
        };

        Ok(Self {
            inner: PlayerController::new(config),
            on_effects: None,
        })
    }

    /// Create a player from a serialized `PlayerConfig`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<WasmStoryPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        Ok(Self {
            inner: PlayerController::new(config),
            on_effects: None,
        })
    }

    /// Effects to apply once the page is ready (initial volume)
    pub fn startup(&self) -> JsValue {
        let effects = self.inner.startup();
        self.emit(&effects)
    }

    /// Feed a serialized `PlayerEvent`
    pub fn handle(&mut self, event: JsValue, now_ms: f64) -> Result<JsValue, JsValue> {
        let event: PlayerEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsValue::from_str(&format!("Invalid event: {}", e)))?;
        Ok(self.dispatch(event, now_ms))
    }

    // ===== Convenience entry points =====

    /// Install the catalog returned by `/api/themes`
    #[wasm_bindgen(js_name = loadCatalog)]
    pub fn load_catalog(&mut self, catalog: JsValue, now_ms: f64) -> Result<JsValue, JsValue> {
        let catalog: ThemeCatalog = serde_wasm_bindgen::from_value(catalog)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse themes: {}", e)))?;
        Ok(self.dispatch(PlayerEvent::CatalogLoaded(catalog), now_ms))
    }

    /// Theme card / slide chosen
    #[wasm_bindgen(js_name = selectTheme)]
    pub fn select_theme(&mut self, theme: String, now_ms: f64) -> JsValue {
        self.dispatch(PlayerEvent::ThemeSelected { theme }, now_ms)
    }

    /// Carousel step ("next" | "previous")
    pub fn navigate(&mut self, direction: &str, now_ms: f64) -> Result<JsValue, JsValue> {
        let direction = match direction {
            "next" => Direction::Next,
            "previous" => Direction::Previous,
            _ => return Err(JsValue::from_str("Invalid direction. Use 'next' or 'previous'")),
        };
        Ok(self.dispatch(PlayerEvent::Navigate(direction), now_ms))
    }

    /// Animation timer fired
    pub fn settle(&mut self, now_ms: f64) -> JsValue {
        self.dispatch(PlayerEvent::TransitionSettled, now_ms)
    }

    /// Page is unloading
    pub fn unload(&mut self, now_ms: f64) -> JsValue {
        self.dispatch(PlayerEvent::Unload, now_ms)
    }

    // ===== State Queries =====

    /// Current phase ("idle" | "paused" | "playing")
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        match self.inner.session().phase() {
            PlaybackPhase::Idle => "idle".to_string(),
            PlaybackPhase::Paused => "paused".to_string(),
            PlaybackPhase::Playing => "playing".to_string(),
        }
    }

    /// Focused carousel theme
    #[wasm_bindgen(js_name = currentThemeIndex)]
    pub fn current_theme_index(&self) -> Option<usize> {
        self.inner.session().current_theme_index()
    }

    /// Title of the loaded story
    #[wasm_bindgen(js_name = currentTitle)]
    pub fn current_title(&self) -> Option<String> {
        self.inner.session().current_story_title().map(str::to_string)
    }

    #[wasm_bindgen(js_name = isTransitioning)]
    pub fn is_transitioning(&self) -> bool {
        self.inner.session().is_transitioning()
    }

    // ===== Event Listeners =====

    /// Register a callback receiving every effect batch
    #[wasm_bindgen(js_name = onEffects)]
    pub fn on_effects(&mut self, callback: Function) {
        self.on_effects = Some(callback);
    }

    fn dispatch(&mut self, event: PlayerEvent, now_ms: f64) -> JsValue {
        let now = Duration::from_secs_f64(now_ms.max(0.0) / 1000.0);
        let effects = self.inner.handle(event, now);
        self.emit(&effects)
    }

    fn emit(&self, effects: &[Effect]) -> JsValue {
        let value = serde_wasm_bindgen::to_value(effects).unwrap_or(JsValue::NULL);
        if let Some(ref cb) = self.on_effects {
            cb.call1(&JsValue::NULL, &value).ok();
        }
        value
    }
}
