use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use flame_tint_core::{ApplyAction, FlamegraphTheme, Palette, StackColors, ThemeError, ThemeMode};
use flame_tint_protocol::{ColorCoding, ParseLabelError, Preferences, PreferencesAction, StackFrame};
use thiserror::Error;
use tracing::debug;
use wasm_bindgen::prelude::*;

static BRIDGE: LazyLock<Mutex<Bridge>> = LazyLock::new(|| Mutex::new(Bridge::default()));

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Label(#[from] ParseLabelError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error("invalid frame set handle: {0}")]
    InvalidHandle(usize),
    #[error("frame {index} points at parent {parent}, outside the frame list")]
    DanglingParent { index: usize, parent: usize },
    #[error("bridge state poisoned by an earlier panic")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    handle: usize,
    coding: ColorCoding,
    mode: ThemeMode,
    palette: Palette,
}

/// Loaded frame sets, the active themes, and memoized colors per
/// `(frame set, coding, theme, palette)`.
#[derive(Debug)]
pub struct Bridge {
    frame_sets: HashMap<usize, Vec<StackFrame>>,
    next_handle: usize,
    themes: HashMap<ThemeMode, FlamegraphTheme>,
    cache: HashMap<CacheKey, Arc<StackColors>>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self {
            frame_sets: HashMap::new(),
            next_handle: 0,
            themes: [ThemeMode::Light, ThemeMode::Dark]
                .into_iter()
                .map(|mode| (mode, FlamegraphTheme::for_mode(mode)))
                .collect(),
            cache: HashMap::new(),
        }
    }
}

impl Bridge {
    /// Parse a JSON frame list and store it. Returns its handle.
    pub fn load_frames(&mut self, data: &[u8]) -> Result<usize, BridgeError> {
        let frames: Vec<StackFrame> = serde_json::from_slice(data)?;
        for (index, frame) in frames.iter().enumerate() {
            if let Some(parent) = frame.parent
                && parent >= frames.len()
            {
                return Err(BridgeError::DanglingParent { index, parent });
            }
        }
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1);
        debug!(handle, frames = frames.len(), "loaded frame set");
        self.frame_sets.insert(handle, frames);
        Ok(handle)
    }

    /// Drop a frame set and its memoized colors. Returns whether it existed.
    pub fn release_frames(&mut self, handle: usize) -> bool {
        let released = self.frame_sets.remove(&handle).is_some();
        self.cache.retain(|key, _| key.handle != handle);
        released
    }

    /// Replace the theme for `mode` with the built-in one plus `overrides`.
    pub fn configure_theme(
        &mut self,
        mode: ThemeMode,
        overrides: &str,
    ) -> Result<(), BridgeError> {
        let theme = FlamegraphTheme::from_json(mode, overrides)?;
        self.themes.insert(mode, theme);
        self.cache.retain(|key, _| key.mode != mode);
        Ok(())
    }

    pub fn colors(
        &mut self,
        handle: usize,
        coding: ColorCoding,
        mode: ThemeMode,
        palette: Palette,
    ) -> Result<Arc<StackColors>, BridgeError> {
        let key = CacheKey {
            handle,
            coding,
            mode,
            palette,
        };
        if let Some(colors) = self.cache.get(&key) {
            debug!(handle, %coding, "stack colors memo hit");
            return Ok(Arc::clone(colors));
        }

        let frames = self
            .frame_sets
            .get(&handle)
            .ok_or(BridgeError::InvalidHandle(handle))?;
        let theme = self
            .themes
            .get(&mode)
            .cloned()
            .unwrap_or_else(|| FlamegraphTheme::for_mode(mode));
        let colors = Arc::new(theme.colorize(frames, coding, palette));
        self.cache.insert(key, Arc::clone(&colors));
        Ok(colors)
    }
}

/// Apply a JSON-encoded action to a JSON-encoded preferences record.
pub fn reduce_preferences_json(state: &str, action: &str) -> Result<String, BridgeError> {
    let state: Preferences = serde_json::from_str(state)?;
    let action: PreferencesAction = serde_json::from_str(action)?;
    Ok(serde_json::to_string(&state.apply(action))?)
}

/// Color map as a JSON object of `key → [r, g, b, a]`, keys sorted.
pub fn color_map_json(colors: &StackColors) -> Result<String, BridgeError> {
    let ordered: BTreeMap<&str, [f32; 4]> = colors
        .color_map
        .iter()
        .map(|(key, color)| (key.as_str(), color.to_array()))
        .collect();
    Ok(serde_json::to_string(&ordered)?)
}

fn bridge() -> Result<MutexGuard<'static, Bridge>, BridgeError> {
    BRIDGE.lock().map_err(|_| BridgeError::Poisoned)
}

fn lookup(
    handle: usize,
    coding: &str,
    theme: &str,
    palette: &str,
) -> Result<Arc<StackColors>, BridgeError> {
    let coding: ColorCoding = coding.parse()?;
    let mode: ThemeMode = theme.parse()?;
    let palette: Palette = palette.parse()?;
    bridge()?.colors(handle, coding, mode, palette)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Parse a frame list (JSON array). Returns a handle for later calls.
#[wasm_bindgen]
pub fn load_frames(data: &[u8]) -> Result<usize, JsError> {
    Ok(bridge()?.load_frames(data)?)
}

#[wasm_bindgen]
pub fn release_frames(handle: usize) -> Result<bool, JsError> {
    Ok(bridge()?.release_frames(handle))
}

/// Override parts of the `"light"` or `"dark"` theme from JSON.
#[wasm_bindgen]
pub fn configure_theme(theme: &str, overrides: &str) -> Result<(), JsError> {
    let mode: ThemeMode = theme.parse()?;
    Ok(bridge()?.configure_theme(mode, overrides)?)
}

/// Per-occurrence RGBA buffer, ready for a `Float32Array` upload.
#[wasm_bindgen]
pub fn color_buffer(
    handle: usize,
    coding: &str,
    theme: &str,
    palette: &str,
) -> Result<Vec<f32>, JsError> {
    Ok(lookup(handle, coding, theme, palette)?.color_buffer.clone())
}

/// Identity color lookup as JSON.
#[wasm_bindgen]
pub fn color_map(
    handle: usize,
    coding: &str,
    theme: &str,
    palette: &str,
) -> Result<String, JsError> {
    Ok(color_map_json(&*lookup(handle, coding, theme, palette)?)?)
}

#[wasm_bindgen]
pub fn default_preferences() -> Result<String, JsError> {
    Ok(serde_json::to_string(&Preferences::default())?)
}

#[wasm_bindgen]
pub fn reduce_preferences(state: &str, action: &str) -> Result<String, JsError> {
    Ok(reduce_preferences_json(state, action)?)
}
