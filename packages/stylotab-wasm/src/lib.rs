use serde::Serialize;
use stylotab::config::{Generation, Settings, Style};
use stylotab::{Cue, EquivalenceMode, OctaveModifier, Session, StyloError};
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct BindingError {
    message: String,
}

fn to_js_error(e: StyloError) -> JsValue {
    let error = BindingError {
        message: e.to_string(),
    };
    JsValue::from_str(&serde_json::to_string(&error).unwrap_or_else(|_| e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// Normalize raw tab text
#[wasm_bindgen]
pub fn normalize(raw: &str) -> String {
    stylotab::normalize(raw)
}

/// Translate normalized S-1 tabs into X-1 tabs
#[wasm_bindgen]
pub fn translate(normalized: &str, octave_down: bool) -> String {
    let (mode, modifier) = if octave_down {
        (EquivalenceMode::Mode2, OctaveModifier::Down)
    } else {
        (EquivalenceMode::Mode1, OctaveModifier::Zero)
    };
    stylotab::translate(normalized, mode, modifier)
}

/// Transpose normalized S-1 tabs
#[wasm_bindgen]
pub fn transpose(normalized: &str, semitones: i32, extended: bool) -> String {
    stylotab::transpose(normalized, semitones, extended)
}

/// Embedded preset file names as a JSON array
#[wasm_bindgen]
pub fn list_presets() -> String {
    to_json(&stylotab_presets::list_presets())
}

/// Text of an embedded preset
#[wasm_bindgen]
pub fn get_preset(name: &str) -> Option<String> {
    stylotab_presets::get_preset(name).map(|p| p.content)
}

/// Editor session for the browser host.
///
/// Methods that can move the diagram return the resulting cues as a JSON
/// array; the host applies them and calls `advance` from its timer.
#[wasm_bindgen]
pub struct StyloSession {
    inner: Session,
}

#[wasm_bindgen]
impl StyloSession {
    /// Create a session from optional settings YAML
    #[wasm_bindgen(constructor)]
    pub fn new(settings_yaml: Option<String>) -> Result<StyloSession, JsValue> {
        let settings = match settings_yaml {
            Some(yaml) => Settings::from_yaml(&yaml).map_err(to_js_error)?,
            None => Settings::default(),
        };
        Ok(StyloSession {
            inner: Session::new(settings),
        })
    }

    pub fn set_text(&mut self, raw: &str) -> String {
        cues_json(&self.inner.set_text(raw))
    }

    pub fn set_generation(&mut self, name: &str) -> Result<String, JsValue> {
        let generation: Generation = name.parse().map_err(to_js_error)?;
        Ok(cues_json(&self.inner.set_generation(generation)))
    }

    pub fn set_style(&mut self, name: &str) -> Result<(), JsValue> {
        let style: Style = name.parse().map_err(to_js_error)?;
        self.inner.set_style(style);
        Ok(())
    }

    pub fn set_x1_octave_down(&mut self, on: bool) -> String {
        cues_json(&self.inner.set_x1_octave_down(on))
    }

    pub fn set_transpose_enabled(&mut self, enabled: bool) -> String {
        cues_json(&self.inner.set_transpose_enabled(enabled))
    }

    pub fn set_transpose_amount(&mut self, semitones: i32) -> Result<String, JsValue> {
        let cues = self
            .inner
            .set_transpose_amount(semitones)
            .map_err(to_js_error)?;
        Ok(cues_json(&cues))
    }

    pub fn set_extended_range(&mut self, extended: bool) -> String {
        cues_json(&self.inner.set_extended_range(extended))
    }

    pub fn set_delay(&mut self, delay_ms: u32) -> Result<(), JsValue> {
        self.inner.set_delay(delay_ms).map_err(to_js_error)
    }

    pub fn normalized(&self) -> String {
        self.inner.normalized().to_string()
    }

    pub fn s1_tabs(&self) -> String {
        self.inner.s1_tabs().join(" ")
    }

    pub fn x1_tabs(&self) -> String {
        self.inner.x1_tabs().join(" ")
    }

    pub fn asset_key(&self) -> String {
        self.inner.asset_key()
    }

    /// Events to apply once the diagram asset has loaded, as a JSON array
    pub fn asset_highlights(&self) -> String {
        to_json(&self.inner.asset_highlights())
    }

    pub fn progress_max(&self) -> usize {
        self.inner.progress_max()
    }

    pub fn play(&mut self) -> String {
        cues_json(&self.inner.play())
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn seek(&mut self, position: usize) -> String {
        cues_json(&self.inner.seek(position))
    }

    pub fn advance(&mut self, elapsed_ms: u32) -> String {
        cues_json(&self.inner.advance(u64::from(elapsed_ms)))
    }

    /// Milliseconds of player time until the next cue, if any
    pub fn next_due_in(&self) -> Option<f64> {
        let player = self.inner.player();
        player
            .next_due()
            .map(|due| due.saturating_sub(player.now()) as f64)
    }

    pub fn is_playing(&self) -> bool {
        self.inner.player().is_playing()
    }
}

fn cues_json(cues: &[Cue]) -> String {
    to_json(&cues)
}
