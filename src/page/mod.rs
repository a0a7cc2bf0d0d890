//! Page glue: owns the per-session state and drives every effect from DOM
//! events plus one `requestAnimationFrame` loop.
//!
//! The pure cores (`konami`, `effects`, `score`) know nothing about the DOM;
//! this module feeds them tokens, clicks and timestamps, and mirrors their
//! state onto the document. All timed work (effect expiry, grace removals,
//! style reverts, the rainbow sweep) is settled inside the tick against
//! deadlines held in `PageState`, so there are no dangling one-shot JS timers.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, IntersectionObserver, console, window};

use crate::audio::{self, SoundCue};
use crate::effects::{EffectEvent, EffectId, EffectScheduler, SPAWN_INTERVAL_MS, SpawnClock};
use crate::konami::{KONAMI_CODE, SequenceMatcher};
use crate::score::ScoreCounter;

mod wiring;

/// How long the full-page hue-rotate sweep (and its message) stays up.
const RAINBOW_SWEEP_MS: f64 = 5_000.0;
/// Scale pop on the score display.
const SCORE_POP_MS: f64 = 200.0;
/// Static page coins snap back this long after a click.
const PAGE_COIN_RESET_MS: f64 = 500.0;
/// Reveal chime lags the fade-in slightly.
const REVEAL_CUE_DELAY_MS: f64 = 100.0;
/// Hearts shown by the easter egg.
const EASTER_EGG_LIVES: usize = 30;

// Attribute carrying a spawned coin's scheduler id on its DOM node.
const COIN_ID_ATTR: &str = "data-wz-coin";
// Marks reveal elements that already played their appearance chime.
const APPEARED_ATTR: &str = "data-wz-appeared";

/// One-shot work scheduled against the page clock, run by the tick. Tasks
/// must not touch `PAGE_STATE`; they fire while it is borrowed.
struct DeferredTask {
    run_at_ms: f64,
    action: Box<dyn FnOnce()>,
}

/// Everything mutable for one interactive session.
struct PageState {
    matcher: SequenceMatcher,
    scheduler: EffectScheduler,
    score: ScoreCounter,
    spawn_clock: SpawnClock,
    /// DOM node per live scheduler effect. Entries exist exactly as long as
    /// the scheduler owns the effect.
    effect_nodes: HashMap<EffectId, Element>,
    deferred: Vec<DeferredTask>,
    rainbow_until: Option<f64>,
    rainbow_message: Option<Element>,
    /// Keeps the observers (and their JS callbacks) rooted for the session.
    #[allow(dead_code)]
    observers: Vec<IntersectionObserver>,
}

thread_local! {
    static PAGE_STATE: std::cell::RefCell<Option<PageState>> = std::cell::RefCell::new(None);
}

pub fn start_page_effects() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    inject_keyframes(&doc)?;

    let now = now_ms();
    let state = PageState {
        matcher: SequenceMatcher::new(&KONAMI_CODE),
        scheduler: EffectScheduler::new(now.to_bits()),
        score: ScoreCounter::new(),
        spawn_clock: SpawnClock::new(SPAWN_INTERVAL_MS, now),
        effect_nodes: HashMap::new(),
        deferred: Vec::new(),
        rainbow_until: None,
        rainbow_message: None,
        observers: Vec::new(),
    };
    PAGE_STATE.with(|cell| cell.replace(Some(state)));

    // Show the starting score with the same grouping later updates use.
    PAGE_STATE.with(|cell| {
        if let Some(state) = cell.borrow().as_ref() {
            if let Ok(Some(el)) = doc.query_selector(".score-value") {
                el.set_text_content(Some(&state.score.display()));
            }
        }
    });

    wiring::wire_page(&win, &doc)?;
    log_banner();
    start_effect_loop();
    Ok(())
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn schedule(state: &mut PageState, run_at_ms: f64, action: impl FnOnce() + 'static) {
    state.deferred.push(DeferredTask {
        run_at_ms,
        action: Box::new(action),
    });
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_effect_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let now = now_ms();
        PAGE_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow_mut().as_mut() {
                page_tick(state, now);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

// --- Tick --------------------------------------------------------------------

fn page_tick(state: &mut PageState, now: f64) {
    // Periodic coin spawns; due() catches up if frames stalled.
    for _ in 0..state.spawn_clock.due(now) {
        spawn_floating_coin(state, now);
    }

    // Scheduler lifecycle drives the DOM: expiry starts the exit animation,
    // removal deletes the node.
    for event in state.scheduler.tick(now) {
        match event {
            EffectEvent::Expired(id) => {
                if let Some(node) = state.effect_nodes.get(&id) {
                    if let Some(h) = node.dyn_ref::<HtmlElement>() {
                        let _ = h.style().set_property("opacity", "0");
                    }
                }
            }
            EffectEvent::Removed(id) => {
                if let Some(node) = state.effect_nodes.remove(&id) {
                    node.remove();
                }
            }
        }
    }

    // One-shot deferred work (style reverts, delayed cues).
    let mut i = 0;
    while i < state.deferred.len() {
        if now >= state.deferred[i].run_at_ms {
            let task = state.deferred.swap_remove(i);
            (task.action)();
        } else {
            i += 1;
        }
    }

    // Rainbow sweep auto-revert.
    if let Some(until) = state.rainbow_until {
        if now >= until {
            state.rainbow_until = None;
            if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
                let _ = body.style().remove_property("animation");
            }
            if let Some(msg) = state.rainbow_message.take() {
                msg.remove();
            }
        }
    }
}

// --- Spawned effects ----------------------------------------------------------

fn spawn_floating_coin(state: &mut PageState, now: f64) {
    let Some(win) = window() else { return };
    let Some(doc) = win.document() else { return };
    let vw = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let vh = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);

    let id = state.scheduler.spawn_coin(vw, vh, now);
    let Some(effect) = state.scheduler.get(id) else {
        return;
    };
    let Ok(node) = doc.create_element("div") else {
        return;
    };
    node.set_inner_html("&#9733;");
    let _ = node.set_attribute(COIN_ID_ATTR, &id.raw().to_string());
    let style = format!(
        "position:fixed; left:{x}px; top:{y}px; font-size:1.5rem; color:#fbd000; \
         text-shadow:2px 2px 0 #8b4513; z-index:999; pointer-events:auto; cursor:pointer; \
         animation:wz-coin-float 3s ease-in-out infinite;",
        x = effect.x,
        y = effect.y
    );
    let _ = node.set_attribute("style", &style);
    if let Some(body) = doc.body() {
        let _ = body.append_child(&node);
    }
    state.effect_nodes.insert(id, node);
}

fn spawn_burst_at(state: &mut PageState, x: f64, y: f64, now: f64) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    for id in state.scheduler.spawn_burst(x, y, now) {
        let Some(effect) = state.scheduler.get(id) else {
            continue;
        };
        let Ok(node) = doc.create_element("div") else {
            continue;
        };
        node.set_inner_html("&#10022;");
        let style = format!(
            "position:fixed; left:{x}px; top:{y}px; font-size:{size}px; color:#fbd000; \
             pointer-events:none; z-index:9999; --tx:{tx}px; --ty:{ty}px; \
             animation:wz-sparkle 0.5s ease-out forwards;",
            size = effect.glyph_size,
            tx = effect.drift_x,
            ty = effect.drift_y
        );
        let _ = node.set_attribute("style", &style);
        if let Some(body) = doc.body() {
            let _ = body.append_child(&node);
        }
        state.effect_nodes.insert(id, node);
    }
}

// --- Score display ------------------------------------------------------------

fn bump_score(state: &mut PageState, points: i64, now: f64) {
    state.score.add(points);
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(Some(el)) = doc.query_selector(".score-value") else {
        return;
    };
    el.set_text_content(Some(&state.score.display()));
    if let Some(h) = el.dyn_ref::<HtmlElement>() {
        let _ = h.style().set_property("transform", "scale(1.2)");
        let h = h.clone();
        schedule(state, now + SCORE_POP_MS, move || {
            let _ = h.style().set_property("transform", "scale(1)");
        });
    }
}

// --- Easter egg ---------------------------------------------------------------

fn activate_easter_egg(state: &mut PageState, now: f64) {
    audio::play_cue(SoundCue::Powerup);
    audio::play_cue(SoundCue::Powerup);

    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(body) = doc.body() {
        let _ = body
            .style()
            .set_property("animation", "wz-rainbow 2s linear infinite");
    }

    // Re-triggering while a sweep is still running replaces the message.
    if let Some(old) = state.rainbow_message.take() {
        old.remove();
    }
    if let Ok(msg) = doc.create_element("div") {
        msg.set_inner_html("&#9733; 30 LIVES! &#9733;");
        let _ = msg.set_attribute(
            "style",
            "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); \
             font-family:'Press Start 2P', cursive; font-size:2rem; color:#fbd000; \
             text-shadow:4px 4px 0 #000; z-index:10000; \
             animation:wz-pulse 0.5s ease infinite;",
        );
        if let Some(body) = doc.body() {
            let _ = body.append_child(&msg);
        }
        state.rainbow_message = Some(msg);
    }

    if let Ok(Some(lives)) = doc.query_selector(".lives") {
        lives.set_inner_html(&format!("LIVES: {}", "&#9829; ".repeat(EASTER_EGG_LIVES)));
    }

    state.rainbow_until = Some(now + RAINBOW_SWEEP_MS);
}

// --- Startup chrome -----------------------------------------------------------

fn inject_keyframes(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("wz-keyframes").is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id("wz-keyframes");
    style.set_text_content(Some(KEYFRAMES_CSS));
    if let Some(head) = doc.head() {
        head.append_child(&style)?;
    }
    Ok(())
}

const KEYFRAMES_CSS: &str = "\
@keyframes wz-sparkle {\n\
  0% { opacity: 1; transform: translate(0, 0) scale(1); }\n\
  100% { opacity: 0; transform: translate(var(--tx), var(--ty)) scale(0); }\n\
}\n\
@keyframes wz-coin-float {\n\
  0%, 100% { transform: translateY(0); }\n\
  50% { transform: translateY(-10px); }\n\
}\n\
@keyframes wz-rainbow {\n\
  0% { filter: hue-rotate(0deg); }\n\
  100% { filter: hue-rotate(360deg); }\n\
}\n\
@keyframes wz-pulse {\n\
  0%, 100% { transform: translate(-50%, -50%) scale(1); }\n\
  50% { transform: translate(-50%, -50%) scale(1.15); }\n\
}\n";

fn log_banner() {
    console::log_2(
        &JsValue::from_str("%c WELCOME TO AKHIL'S WORLD! "),
        &JsValue::from_str(
            "background:#e52521; color:#fff; font-size:20px; \
             font-family:'Press Start 2P', cursive; padding:10px;",
        ),
    );
    console::log_2(
        &JsValue::from_str(
            "%c Try the Konami Code: \u{2191}\u{2191}\u{2193}\u{2193}\u{2190}\u{2192}\u{2190}\u{2192}BA ",
        ),
        &JsValue::from_str("background:#fbd000; color:#000; font-size:12px; padding:5px;"),
    );
}
