//! Projects `CardState` onto the page
//!
//! Screens are static markup toggled with the `hidden` class. Particles are
//! keyed spans so a redraw never restarts a running CSS animation.

use std::collections::HashSet;

use web_sys::{Document, Element};

use super::dom::{self, ids};
use crate::sim::{BurstParticle, CardState, FloatingHeart, Step, Trail, QUESTION_COUNT};

const SCREENS: [Step; 4] = [Step::Intro, Step::Question(1), Step::Celebration, Step::Letter];

/// Ids of particle spans currently in the DOM
#[derive(Debug, Default)]
pub struct RenderCache {
    trails: HashSet<u32>,
    bursts: HashSet<u32>,
}

impl RenderCache {
    pub fn clear(&mut self) {
        self.trails.clear();
        self.bursts.clear();
    }
}

/// Fill the background once; hearts animate forever in CSS
pub fn render_hearts(hearts: &[FloatingHeart]) {
    let (Some(document), Some(container)) = (dom::document(), dom::by_id(ids::HEARTS)) else {
        return;
    };
    container.set_inner_html("");
    for heart in hearts {
        let Ok(span) = document.create_element("span") else {
            continue;
        };
        let _ = span.set_attribute("class", "heart-float");
        let _ = span.set_attribute(
            "style",
            &format!(
                "left:{:.2}%;font-size:{:.1}px;opacity:{:.2};animation-duration:{:.2}s;animation-delay:{:.2}s",
                heart.left, heart.size, heart.opacity, heart.duration, heart.delay
            ),
        );
        span.set_text_content(Some("❤"));
        let _ = container.append_child(&span);
    }
}

/// Redraw everything that depends on the card state
pub fn render(state: &CardState, cache: &mut RenderCache, now: f64) {
    let Some(document) = dom::document() else {
        return;
    };

    for screen in SCREENS {
        if let Some(el) = dom::by_id(screen.screen_id()) {
            dom::set_class(&el, "hidden", screen.screen_id() != state.step.screen_id());
        }
    }

    if let Some(number) = state.step.question_number() {
        render_question(state, number, now);
    }

    let show_float_layer = state.step.is_question() && state.floating;
    if let Some(layer) = dom::by_id(ids::FLOAT_LAYER) {
        dom::set_class(&layer, "hidden", !show_float_layer);
    }
    if let Some(container) = dom::by_id(ids::TRAILS) {
        sync_layer(&document, &container, "trail", &state.effects.trails, &mut cache.trails, trail_span);
    }
    if let Some(container) = dom::by_id(ids::BURSTS) {
        sync_layer(&document, &container, "burst", &state.effects.bursts, &mut cache.bursts, burst_span);
    }

    if state.step == Step::Letter {
        render_letter(state);
    }
}

fn render_question(state: &CardState, number: u8, now: f64) {
    dom::set_text(
        ids::QUESTION_LABEL,
        &format!("question {} of {}", number, QUESTION_COUNT),
    );
    dom::set_text(ids::QUESTION_TEXT, state.config.question(number));
    dom::set_text(
        ids::ESCAPE_COUNTER,
        &format!("No button escapes: {}", state.escape_count),
    );

    if let Some(button) = dom::html_by_id(ids::NO_BTN) {
        let label = state.no_label(now);
        if button.text_content().as_deref() != Some(label) {
            button.set_text_content(Some(label));
        }
        dom::set_class(&button, "floating", state.floating);
        let style = button.style();
        if state.floating {
            let _ = style.set_property(
                "transform",
                &format!("translate3d({:.1}px, {:.1}px, 0)", state.no_pos.x, state.no_pos.y),
            );
        } else {
            let _ = style.remove_property("transform");
        }
    }
    if let Some(placeholder) = dom::by_id(ids::NO_PLACEHOLDER) {
        dom::set_class(&placeholder, "hidden", !state.floating);
    }

    if let Some(hint) = dom::html_by_id(ids::HINT) {
        let text = state.effects.hint_text();
        hint.set_text_content(Some(text.unwrap_or("...")));
        dom::set_class(&hint, "visible", text.is_some());
        let pos = state.hint_pos();
        let style = hint.style();
        let _ = style.set_property("left", &format!("{:.1}px", pos.x));
        let _ = style.set_property("top", &format!("{:.1}px", pos.y));
    }
}

fn render_letter(state: &CardState) {
    if let Some(envelope) = dom::by_id(ids::ENVELOPE) {
        dom::set_class(&envelope, "envelope-open", state.envelope_open);
    }
    let url = crate::gift::gift_url(&state.config.gift_base_url, &state.config.gift_file_name);
    if let Some(link) = dom::by_id(ids::GIFT_LINK) {
        let _ = link.set_attribute("href", &url);
        dom::set_class(&link, "hidden", !state.gift.shows_link());
    }
    if let Some(missing) = dom::by_id(ids::GIFT_MISSING) {
        missing.set_text_content(Some(&state.config.gift_missing_text));
        dom::set_class(&missing, "hidden", state.gift.shows_link());
    }
}

/// Something drawn as one keyed span
trait Keyed {
    fn key(&self) -> u32;
}

impl Keyed for Trail {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for BurstParticle {
    fn key(&self) -> u32 {
        self.id
    }
}

fn trail_span(document: &Document, trail: &Trail) -> Option<Element> {
    let span = document.create_element("span").ok()?;
    let _ = span.set_attribute("class", "no-trail");
    let _ = span.set_attribute(
        "style",
        &format!("left:{:.1}px;top:{:.1}px", trail.pos.x, trail.pos.y),
    );
    Some(span)
}

fn burst_span(document: &Document, particle: &BurstParticle) -> Option<Element> {
    let span = document.create_element("span").ok()?;
    let _ = span.set_attribute("class", "burst-item");
    let _ = span.set_attribute(
        "style",
        &format!(
            "--dx:{:.1}px;--dy:{:.1}px;--delay:{:.2}s;--color:{};--size:{:.1}px",
            particle.offset.x,
            particle.offset.y,
            particle.delay,
            particle.color.css(),
            particle.size
        ),
    );
    span.set_text_content(Some(particle.icon.as_str()));
    Some(span)
}

/// Add spans for new items and remove spans whose item is gone
fn sync_layer<T: Keyed>(
    document: &Document,
    container: &Element,
    prefix: &str,
    items: &[T],
    rendered: &mut HashSet<u32>,
    build: fn(&Document, &T) -> Option<Element>,
) {
    let live: HashSet<u32> = items.iter().map(Keyed::key).collect();

    rendered.retain(|id| {
        if live.contains(id) {
            return true;
        }
        if let Some(el) = document.get_element_by_id(&format!("{}-{}", prefix, id)) {
            el.remove();
        }
        false
    });

    for item in items {
        let id = item.key();
        if rendered.contains(&id) {
            continue;
        }
        if let Some(span) = build(document, item) {
            span.set_id(&format!("{}-{}", prefix, id));
            if container.append_child(&span).is_ok() {
                rendered.insert(id);
            }
        }
    }
}
