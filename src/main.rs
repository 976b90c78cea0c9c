//! Valentine Card entry point
//!
//! On the web the card boots from `wasm_main`. The native binary plays a
//! headless session against a fixed viewport and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    valentine_card::platform::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Valentine card (native) starting...");
    log::info!("The card itself is a web page - run with `trunk serve` for the real thing");

    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Chase the No button through every question, then say yes
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use glam::Vec2;
    use valentine_card::CardConfig;
    use valentine_card::sim::{CardState, EscapeOutcome, Layout, Rect};

    let layout = Layout {
        viewport: Vec2::new(1280.0, 800.0),
        page: Vec2::new(1280.0, 800.0),
        button: Some(Vec2::new(140.0, 56.0)),
        yes: Some(Rect::new(500.0, 420.0, 120.0, 56.0)),
        static_no: Some(Rect::new(634.0, 420.0, 140.0, 56.0)),
    };
    let bounds = layout.bounds(CardConfig::default().tuning.padding);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut card = CardState::new(CardConfig::load(), seed);
    let mut now = 0.0;

    card.start(now);
    while card.step.is_question() {
        let (mut moved, mut paused) = (0, 0);
        for _ in 0..120 {
            now += 75.0;
            card.expire(now);
            let pointer = card.no_pos + Vec2::new(30.0, 20.0);
            match card.register_escape(&layout, Some(pointer), now) {
                EscapeOutcome::Moved(_) => moved += 1,
                EscapeOutcome::Paused => paused += 1,
                _ => {}
            }
            assert!(bounds.contains(card.no_pos), "button left the viewport");
        }
        log::info!(
            "{:?}: {} dodges, {} pauses, button at ({:.0}, {:.0})",
            card.step,
            moved,
            paused,
            card.no_pos.x,
            card.no_pos.y
        );
        card.press_yes(now);
    }

    card.open_letter(now);
    log::info!(
        "Reached {:?} after {} escapes; gift at {}",
        card.step,
        card.escape_count,
        valentine_card::gift::gift_url(&card.config.gift_base_url, &card.config.gift_file_name)
    );
}
