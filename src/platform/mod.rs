//! Browser platform layer
//!
//! Handles everything that touches the page:
//! - DOM lookups and measurements
//! - Input listeners (mouse, pointer, keyboard, viewport)
//! - Timers and the gift probe lifetime
//! - Rendering the card state

pub mod app;
pub mod dom;
pub mod render;

pub use app::App;

use crate::config::CardConfig;

/// Boot the card into the current page
pub fn run() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }

    log::info!("Valentine card starting...");

    let config = CardConfig::load();
    let seed = js_sys::Date::now() as u64;
    let app = App::new(config, seed);

    app::attach(&app);
    app.borrow_mut().mount();

    // The page keeps the card alive until pagehide tears it down
    std::mem::forget(app);

    log::info!("Valentine card running!");
}
