//! Event wiring: one delegated listener per event class instead of a listener
//! per element, so every page interaction funnels through a single dispatch
//! point before it reaches the cores.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions, Window,
};

use crate::audio::{self, SoundCue};
use crate::effects::{CollectOutcome, EffectId};
use crate::konami::MatchResult;
use crate::score::PAGE_COIN_POINTS;

use super::{
    APPEARED_ATTR, COIN_ID_ATTR, PAGE_COIN_RESET_MS, PAGE_STATE, REVEAL_CUE_DELAY_MS,
    activate_easter_egg, bump_score, now_ms, schedule, spawn_burst_at,
};

/// Elements that get the pressed-down treatment and a menu blip.
const PRESSABLE: &str = ".pixel-btn, .warp-pipe, .nav-link";
/// Elements revealed with a staggered fade/slide on first scroll into view.
const REVEAL_SELECTOR: &str = ".power-up, .quest-card, .skill-block, .achievement-card, .warp-pipe";

/// Anchors scroll to this far above their target, clearing the fixed header.
const HEADER_OFFSET_PX: f64 = 80.0;
/// XP bars restart their fill this long after scrolling into view.
const XP_REPLAY_DELAY_MS: f64 = 100.0;
/// Gap between clearing and re-applying the typewriter animation.
const TYPEWRITER_RESTART_DELAY_MS: f64 = 10.0;

pub(super) fn wire_page(win: &Window, doc: &Document) -> Result<(), JsValue> {
    bind_click_dispatch(doc)?;
    bind_press_feedback(doc)?;
    bind_hover_cues(doc)?;
    bind_keydown(doc)?;
    bind_scroll(win, doc)?;
    install_reveal_observer(doc)?;
    install_xp_observer(doc)?;
    install_typewriter_observer(doc)?;
    Ok(())
}

// --- Helpers ------------------------------------------------------------------

fn for_each_selected(doc: &Document, selector: &str, mut f: impl FnMut(usize, Element)) {
    if let Ok(list) = doc.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                f(i as usize, el);
            }
        }
    }
}

fn closest(target: &Element, selector: &str) -> Option<Element> {
    target.closest(selector).ok().flatten()
}

fn event_target(evt: &MouseEvent) -> Option<Element> {
    evt.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn set_display(root: &Element, selector: &str, value: &str) {
    if let Ok(Some(el)) = root.query_selector(selector) {
        if let Some(h) = el.dyn_ref::<HtmlElement>() {
            let _ = h.style().set_property("display", value);
        }
    }
}

// --- Pointer clicks -----------------------------------------------------------

fn bind_click_dispatch(doc: &Document) -> Result<(), JsValue> {
    let doc_c = doc.clone();
    let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
        let now = now_ms();
        let target = event_target(&evt);
        PAGE_STATE.with(|cell| {
            let mut borrow = cell.borrow_mut();
            let Some(state) = borrow.as_mut() else {
                return;
            };

            // Sparkles follow every click.
            spawn_burst_at(state, f64::from(evt.client_x()), f64::from(evt.client_y()), now);

            let Some(target) = target.as_ref() else {
                return;
            };

            // Spawned star coins. AlreadyGone (double click, expired) is a
            // silent no-op and never scores twice.
            if let Some(coin) = closest(target, "[data-wz-coin]") {
                if let Some(id) = coin
                    .get_attribute(COIN_ID_ATTR)
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    if let CollectOutcome::Collected { points } =
                        state.scheduler.collect(EffectId::from_raw(id), now)
                    {
                        audio::play_cue(SoundCue::Coin);
                        if let Some(h) = coin.dyn_ref::<HtmlElement>() {
                            let _ = h.style().set_property("transform", "scale(2)");
                            let _ = h.style().set_property("opacity", "0");
                        }
                        bump_score(state, points, now);
                    }
                }
            }

            // Decorative coins embedded in the page markup pop and snap back.
            if let Some(coin) = closest(target, ".coin") {
                audio::play_cue(SoundCue::Coin);
                if let Some(h) = coin.dyn_ref::<HtmlElement>().cloned() {
                    let _ = h.style().set_property("transform", "scale(1.5)");
                    let _ = h.style().set_property("opacity", "0");
                    schedule(state, now + PAGE_COIN_RESET_MS, move || {
                        let _ = h.style().remove_property("transform");
                        let _ = h.style().set_property("opacity", "1");
                    });
                }
                bump_score(state, PAGE_COIN_POINTS, now);
            }

            // Quest cards expand/collapse.
            if let Some(card) = closest(target, ".quest-card") {
                let _ = card.class_list().toggle("expanded");
                audio::play_cue(SoundCue::Menu);
            }

            // Button blip.
            if closest(target, PRESSABLE).is_some() {
                audio::play_cue(SoundCue::Menu);
            }

            // Mobile nav toggle.
            if let Some(toggle) = closest(target, ".nav-toggle") {
                let _ = toggle.class_list().toggle("active");
                if let Ok(Some(menu)) = doc_c.query_selector(".nav-menu") {
                    let _ = menu.class_list().toggle("active");
                }
                audio::play_cue(SoundCue::Menu);
            }

            // Following a nav link closes the mobile menu.
            if closest(target, ".nav-link").is_some() {
                if let Ok(Some(toggle)) = doc_c.query_selector(".nav-toggle") {
                    let _ = toggle.class_list().remove_1("active");
                }
                if let Ok(Some(menu)) = doc_c.query_selector(".nav-menu") {
                    let _ = menu.class_list().remove_1("active");
                }
            }

            // Sound toggle; re-enabling confirms audibly.
            if let Some(toggle) = closest(target, ".sound-toggle") {
                let on = audio::toggle_sound();
                set_display(&toggle, ".sound-on", if on { "inline" } else { "none" });
                set_display(&toggle, ".sound-off", if on { "none" } else { "inline" });
                if on {
                    audio::play_cue(SoundCue::Coin);
                }
            }

            // In-page anchors scroll smoothly under the fixed header.
            if let Some(anchor) = closest(target, "a[href^='#']") {
                if let Some(href) = anchor.get_attribute("href") {
                    if smooth_scroll_to(&doc_c, &href) {
                        evt.prevent_default();
                        audio::play_cue(SoundCue::Jump);
                    }
                }
            }
        });
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn smooth_scroll_to(doc: &Document, href: &str) -> bool {
    if !href.starts_with('#') || href.len() <= 1 {
        return false;
    }
    let Ok(Some(section)) = doc.query_selector(href) else {
        return false;
    };
    let Some(win) = web_sys::window() else {
        return false;
    };
    let top = section.get_bounding_client_rect().top() + win.scroll_y().unwrap_or(0.0)
        - HEADER_OFFSET_PX;
    let opts = ScrollToOptions::new();
    opts.set_top(top);
    opts.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&opts);
    true
}

// --- Press feedback -----------------------------------------------------------

fn bind_press_feedback(doc: &Document) -> Result<(), JsValue> {
    let down = Closure::wrap(Box::new(move |evt: MouseEvent| {
        if let Some(btn) = event_target(&evt).and_then(|t| closest(&t, PRESSABLE)) {
            if let Some(h) = btn.dyn_ref::<HtmlElement>() {
                let _ = h.style().set_property("transform", "translate(2px, 2px)");
                let _ = h.style().set_property("box-shadow", "2px 2px 0 #000");
            }
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("mousedown", down.as_ref().unchecked_ref())?;
    down.forget();

    // mouseout (not mouseleave) so a single delegated listener suffices.
    for name in ["mouseup", "mouseout"] {
        let up = Closure::wrap(Box::new(move |evt: MouseEvent| {
            if let Some(btn) = event_target(&evt).and_then(|t| closest(&t, PRESSABLE)) {
                if let Some(h) = btn.dyn_ref::<HtmlElement>() {
                    let _ = h.style().remove_property("transform");
                    let _ = h.style().remove_property("box-shadow");
                }
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback(name, up.as_ref().unchecked_ref())?;
        up.forget();
    }
    Ok(())
}

// --- Hover cues ---------------------------------------------------------------

fn bind_hover_cues(doc: &Document) -> Result<(), JsValue> {
    let over = Closure::wrap(Box::new(move |evt: MouseEvent| {
        if hover_entered(&evt, ".power-up").is_some() {
            audio::play_cue(SoundCue::Powerup);
        }
        if hover_entered(&evt, ".skill-tag").is_some() {
            audio::play_cue(SoundCue::Coin);
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("mouseover", over.as_ref().unchecked_ref())?;
    over.forget();
    Ok(())
}

/// Delegated mouseenter: matches only when the pointer crosses into `selector`
/// from outside it, not when moving between its children.
fn hover_entered(evt: &MouseEvent, selector: &str) -> Option<Element> {
    let hit = closest(&event_target(evt)?, selector)?;
    if let Some(prev) = evt
        .related_target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|r| closest(&r, selector))
    {
        if hit.is_same_node(Some(prev.as_ref())) {
            return None;
        }
    }
    Some(hit)
}

// --- Keyboard -----------------------------------------------------------------

fn bind_keydown(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        PAGE_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                if state.matcher.observe(&evt.code()) == MatchResult::Complete {
                    activate_easter_egg(state, now_ms());
                }
            }
        });
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Scroll effects -----------------------------------------------------------

fn bind_scroll(win: &Window, doc: &Document) -> Result<(), JsValue> {
    let win_c = win.clone();
    let doc_c = doc.clone();
    let closure = Closure::wrap(Box::new(move || {
        let scrolled = win_c.scroll_y().unwrap_or(0.0);

        // Header shadow deepens once the page moves.
        if let Ok(Some(header)) = doc_c.query_selector(".header") {
            if let Some(h) = header.dyn_ref::<HtmlElement>() {
                let shadow = if scrolled > 50.0 {
                    "0 4px 0 #000, 0 8px 20px rgba(0,0,0,0.3)"
                } else {
                    "0 4px 0 #000"
                };
                let _ = h.style().set_property("box-shadow", shadow);
            }
        }

        // Parallax clouds drift at staggered speeds.
        for_each_selected(&doc_c, ".cloud", |idx, cloud| {
            if let Some(h) = cloud.dyn_ref::<HtmlElement>() {
                let speed = 0.1 + idx as f64 * 0.05;
                let _ = h
                    .style()
                    .set_property("transform", &format!("translateX({}px)", scrolled * speed));
            }
        });

        // Highlight the nav link for the section containing the scroll position.
        let mut current = String::new();
        for_each_selected(&doc_c, "section[id]", |_, section| {
            if let Some(h) = section.dyn_ref::<HtmlElement>() {
                if scrolled >= f64::from(h.offset_top()) - 100.0 {
                    current = section.id();
                }
            }
        });
        for_each_selected(&doc_c, ".nav-link", |_, link| {
            if let Some(h) = link.dyn_ref::<HtmlElement>() {
                let active = link
                    .get_attribute("href")
                    .is_some_and(|href| href == format!("#{current}"));
                let (bg, fg) = if active {
                    ("#fbd000", "#000")
                } else {
                    ("#8b4513", "#fff")
                };
                let _ = h.style().set_property("background", bg);
                let _ = h.style().set_property("color", fg);
            }
        });
    }) as Box<dyn FnMut()>);
    win.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Scroll-in observers ------------------------------------------------------

fn install_reveal_observer(doc: &Document) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _obs: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let el = entry.target();
                if let Some(h) = el.dyn_ref::<HtmlElement>() {
                    let _ = h.style().set_property("opacity", "1");
                    let _ = h.style().set_property("transform", "translateY(0)");
                }
                if el.get_attribute(APPEARED_ATTR).is_none() {
                    let _ = el.set_attribute(APPEARED_ATTR, "true");
                    // Chime trails the fade-in slightly.
                    PAGE_STATE.with(|cell| {
                        if let Some(state) = cell.borrow_mut().as_mut() {
                            schedule(state, now_ms() + REVEAL_CUE_DELAY_MS, || {
                                audio::play_cue(SoundCue::Coin);
                            });
                        }
                    });
                }
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.1));
    options.set_root_margin("0px 0px -50px 0px");
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for_each_selected(doc, REVEAL_SELECTOR, |idx, el| {
        if let Some(h) = el.dyn_ref::<HtmlElement>() {
            let style = h.style();
            let _ = style.set_property("opacity", "0");
            let _ = style.set_property("transform", "translateY(30px)");
            let delay = idx as f64 * 0.1;
            let _ = style.set_property(
                "transition",
                &format!("opacity 0.5s ease {delay}s, transform 0.5s ease {delay}s"),
            );
        }
        observer.observe(&el);
    });

    keep_observer(observer);
    Ok(())
}

fn install_xp_observer(doc: &Document) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _obs: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let Ok(Some(fill)) = entry.target().query_selector(".xp-fill") else {
                    continue;
                };
                let Ok(h) = fill.dyn_into::<HtmlElement>() else {
                    continue;
                };
                // Replay the fill animation from zero.
                let width = h.style().get_property_value("width").unwrap_or_default();
                let _ = h.style().set_property("width", "0");
                PAGE_STATE.with(|cell| {
                    if let Some(state) = cell.borrow_mut().as_mut() {
                        schedule(state, now_ms() + XP_REPLAY_DELAY_MS, move || {
                            let _ = h.style().set_property("transition", "width 1.5s ease-out");
                            let _ = h.style().set_property("width", &width);
                        });
                    }
                });
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.5));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    for_each_selected(doc, ".xp-bar", |_, el| observer.observe(&el));
    keep_observer(observer);
    Ok(())
}

fn install_typewriter_observer(doc: &Document) -> Result<(), JsValue> {
    if doc.query_selector(".typewriter").ok().flatten().is_none() {
        return Ok(());
    }
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _obs: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let Ok(h) = entry.target().dyn_into::<HtmlElement>() else {
                    continue;
                };
                let _ = h.style().set_property("animation", "none");
                PAGE_STATE.with(|cell| {
                    if let Some(state) = cell.borrow_mut().as_mut() {
                        schedule(state, now_ms() + TYPEWRITER_RESTART_DELAY_MS, move || {
                            let _ = h.style().set_property(
                                "animation",
                                "typing 3s steps(25, end), blink-caret 0.75s step-end infinite",
                            );
                        });
                    }
                });
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(0.5));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    for_each_selected(doc, ".typewriter", |_, el| observer.observe(&el));
    keep_observer(observer);
    Ok(())
}

/// Root the observer in session state so its JS callback stays callable.
fn keep_observer(observer: IntersectionObserver) {
    PAGE_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            state.observers.push(observer);
        }
    });
}
