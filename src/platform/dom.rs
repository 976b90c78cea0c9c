//! DOM lookups and measurements

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::sim::{Layout, Rect};

/// Element ids the page must provide
pub mod ids {
    pub const HEARTS: &str = "hearts";
    pub const BURSTS: &str = "bursts";
    pub const START_BTN: &str = "start-btn";
    pub const QUESTION_LABEL: &str = "question-label";
    pub const QUESTION_TEXT: &str = "question-text";
    pub const YES_BTN: &str = "yes-btn";
    pub const NO_BTN: &str = "no-btn";
    pub const NO_PLACEHOLDER: &str = "no-placeholder";
    pub const ESCAPE_COUNTER: &str = "escape-counter";
    pub const FLOAT_LAYER: &str = "float-layer";
    pub const TRAILS: &str = "trails";
    pub const HINT: &str = "hint";
    pub const OPEN_LETTER_BTN: &str = "open-letter-btn";
    pub const ENVELOPE: &str = "envelope";
    pub const GIFT_LINK: &str = "gift-link";
    pub const GIFT_MISSING: &str = "gift-missing";
}

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

/// Look up an element, logging when the page is missing it
pub fn by_id(id: &str) -> Option<Element> {
    let el = document()?.get_element_by_id(id);
    if el.is_none() {
        log::warn!("Missing element #{}", id);
    }
    el
}

pub fn html_by_id(id: &str) -> Option<HtmlElement> {
    by_id(id)?.dyn_into::<HtmlElement>().ok()
}

/// Add or remove a class
pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

pub fn rect_of(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

/// Visual viewport size, falling back to the window's inner size
pub fn viewport_size() -> Vec2 {
    let Some(window) = window() else {
        return Vec2::ZERO;
    };
    if let Some(vv) = window.visual_viewport() {
        return Vec2::new(vv.width() as f32, vv.height() as f32);
    }
    inner_size()
}

/// Layout viewport size (`innerWidth` x `innerHeight`)
pub fn inner_size() -> Vec2 {
    let Some(window) = window() else {
        return Vec2::ZERO;
    };
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Vec2::new(w as f32, h as f32)
}

/// Coarse pointer or touch support
pub fn is_touch_device() -> bool {
    let Some(window) = window() else {
        return false;
    };
    let coarse = window
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .is_some_and(|mq| mq.matches());
    coarse || js_sys::Reflect::has(&window, &"ontouchstart".into()).unwrap_or(false)
}

/// Measure everything the card state needs for an update
pub fn measure_layout(floating: bool) -> Layout {
    let no = by_id(ids::NO_BTN).map(|el| rect_of(&el));
    Layout {
        viewport: viewport_size(),
        page: inner_size(),
        button: no.map(|r| Vec2::new(r.width, r.height)),
        yes: by_id(ids::YES_BTN).map(|el| rect_of(&el)),
        static_no: if floating { None } else { no },
    }
}

pub fn vibrate(ms: u32) {
    if let Some(window) = window() {
        let _ = window.navigator().vibrate_with_duration(ms);
    }
}
