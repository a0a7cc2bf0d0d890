//! Synthesized sound cues via Web Audio.
//!
//! One oscillator + gain envelope per cue, torn down by its own `stop` time;
//! no samples, no loading. Every call is fire-and-forget: if the context
//! cannot be created (autoplay policy, headless test) or any node call fails,
//! the cue is silently dropped.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsValue;
use web_sys::AudioContext;

/// The page's four cue flavours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Coin,
    Jump,
    Powerup,
    Menu,
}

thread_local! {
    // Lazily created on the first cue so construction happens after a user
    // gesture and the context starts unmuted.
    static AUDIO: RefCell<Option<AudioContext>> = RefCell::new(None);
    static SOUND_ON: Cell<bool> = Cell::new(true);
}

pub fn sound_enabled() -> bool {
    SOUND_ON.with(|c| c.get())
}

pub fn set_sound_enabled(on: bool) {
    SOUND_ON.with(|c| c.set(on));
}

/// Flip the global mute and report the new state.
pub fn toggle_sound() -> bool {
    let on = !sound_enabled();
    set_sound_enabled(on);
    on
}

/// Play a short synthesized tone. Safe to call while muted (no-op).
pub fn play_cue(cue: SoundCue) {
    if !sound_enabled() {
        return;
    }
    AUDIO.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            if let Ok(ctx) = AudioContext::new() {
                let _ = ctx.resume();
                *slot = Some(ctx);
            }
        }
        if let Some(ctx) = slot.as_ref() {
            let _ = synth(ctx, cue);
        }
    });
}

fn synth(ctx: &AudioContext, cue: SoundCue) -> Result<(), JsValue> {
    let now = ctx.current_time();
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    let freq = osc.frequency();
    let vol = gain.gain();
    match cue {
        SoundCue::Coin => {
            freq.set_value_at_time(988.0, now)?; // B5
            freq.set_value_at_time(1319.0, now + 0.1)?; // E6
            vol.set_value_at_time(0.3, now)?;
            vol.exponential_ramp_to_value_at_time(0.01, now + 0.2)?;
            osc.start()?;
            osc.stop_with_when(now + 0.2)?;
        }
        SoundCue::Jump => {
            freq.set_value_at_time(200.0, now)?;
            freq.exponential_ramp_to_value_at_time(600.0, now + 0.1)?;
            vol.set_value_at_time(0.2, now)?;
            vol.exponential_ramp_to_value_at_time(0.01, now + 0.15)?;
            osc.start()?;
            osc.stop_with_when(now + 0.15)?;
        }
        SoundCue::Powerup => {
            freq.set_value_at_time(523.0, now)?; // C5
            freq.set_value_at_time(659.0, now + 0.08)?; // E5
            freq.set_value_at_time(784.0, now + 0.16)?; // G5
            freq.set_value_at_time(1047.0, now + 0.24)?; // C6
            vol.set_value_at_time(0.3, now)?;
            vol.exponential_ramp_to_value_at_time(0.01, now + 0.4)?;
            osc.start()?;
            osc.stop_with_when(now + 0.4)?;
        }
        SoundCue::Menu => {
            freq.set_value_at_time(440.0, now)?;
            vol.set_value_at_time(0.2, now)?;
            vol.exponential_ramp_to_value_at_time(0.01, now + 0.1)?;
            osc.start()?;
            osc.stop_with_when(now + 0.1)?;
        }
    }
    Ok(())
}
