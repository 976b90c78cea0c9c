//! Browser host for the card
//!
//! Owns the `CardState`, every listener and every timer. Dropping the handles
//! in [`App::teardown`] is what cancels them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, EventTarget, KeyboardEvent, MouseEvent, PageTransitionEvent, PointerEvent,
};

use super::dom::{self, ids};
use super::render::{self, RenderCache};
use crate::config::CardConfig;
use crate::consts::ENVELOPE_OPEN_DELAY_MS;
use crate::gift::{self, ProbeHandle};
use crate::lifecycle::PageExit;
use crate::sim::{CardEvent, CardState, EscapeOutcome, Step};

type Shared = Rc<RefCell<App>>;

/// Card state plus everything that keeps it alive in the page
pub struct App {
    pub state: CardState,
    me: Weak<RefCell<App>>,
    cache: RenderCache,
    listeners: Vec<EventListener>,
    sweep: Option<Timeout>,
    envelope_timer: Option<Timeout>,
    viewport_frame: Option<AnimationFrame>,
    probe: Option<ProbeHandle>,
}

fn now() -> f64 {
    js_sys::Date::now()
}

/// Run `f` against the app if it is still alive
fn with_app(weak: &Weak<RefCell<App>>, f: impl FnOnce(&mut App)) {
    let Some(app) = weak.upgrade() else {
        return;
    };
    match app.try_borrow_mut() {
        Ok(mut app) => f(&mut app),
        Err(_) => log::warn!("Card busy, dropping re-entrant callback"),
    };
}

impl App {
    pub fn new(config: CardConfig, seed: u64) -> Shared {
        let mut state = CardState::new(config, seed);
        state.touch = dom::is_touch_device();
        log::info!(
            "Card initialized with seed {} ({} input)",
            seed,
            if state.touch { "touch" } else { "mouse" }
        );

        Rc::new_cyclic(|me| {
            RefCell::new(Self {
                state,
                me: me.clone(),
                cache: RenderCache::default(),
                listeners: Vec::new(),
                sweep: None,
                envelope_timer: None,
                viewport_frame: None,
                probe: None,
            })
        })
    }

    /// First paint
    pub fn mount(&mut self) {
        render::render_hearts(&self.state.hearts);
        self.render();
    }

    fn render(&mut self) {
        let now = now();
        render::render(&self.state, &mut self.cache, now);
        if self.settle() {
            render::render(&self.state, &mut self.cache, now);
        }
    }

    /// Keep the floating button on screen after the viewport or its label
    /// changed. Returns true if it had to move.
    fn settle(&mut self) -> bool {
        if !self.state.step.is_question() || !self.state.floating {
            return false;
        }
        let layout = dom::measure_layout(true);
        let before = self.state.no_pos;
        self.state.constrain(&layout);

        let recovered = dom::by_id(ids::NO_BTN)
            .is_some_and(|button| self.state.recover_if_offscreen(&layout, &dom::rect_of(&button)));
        recovered || before != self.state.no_pos
    }

    /// React to state events, redraw and re-arm the expiry sweep
    fn after_update(&mut self) {
        for event in self.state.drain_events() {
            match event {
                CardEvent::StepChanged(step) => self.on_step_changed(step),
                CardEvent::Vibrate(ms) => dom::vibrate(ms),
                CardEvent::Paused { until } => {
                    log::debug!("Paused until {}", until);
                }
                CardEvent::FloatingStarted => log::debug!("No button is floating"),
                CardEvent::Escaped { count } => log::trace!("Escape #{}", count),
                CardEvent::Burst { count } => log::trace!("Burst of {}", count),
            }
        }
        self.render();
        self.schedule_sweep();
    }

    fn on_step_changed(&mut self, step: Step) {
        // Leaving the letter (or re-entering it) cancels the old probe and timer
        self.probe = None;
        self.envelope_timer = None;

        if step != Step::Letter {
            return;
        }

        let me = self.me.clone();
        self.envelope_timer = Some(Timeout::new(ENVELOPE_OPEN_DELAY_MS, move || {
            with_app(&me, |app| {
                app.envelope_timer = None;
                app.state.open_envelope();
                app.render();
            });
        }));

        let url = gift::gift_url(
            &self.state.config.gift_base_url,
            &self.state.config.gift_file_name,
        );
        let me = self.me.clone();
        self.probe = gift::spawn_probe(url, move |status| {
            with_app(&me, |app| {
                if app.state.set_gift_status(status) {
                    app.render();
                }
            });
        });
    }

    fn schedule_sweep(&mut self) {
        let Some(deadline) = self.state.next_deadline() else {
            self.sweep = None;
            return;
        };
        let delay = (deadline - now()).max(0.0).ceil() as u32 + 1;
        let me = self.me.clone();
        self.sweep = Some(Timeout::new(delay, move || {
            with_app(&me, |app| {
                app.sweep = None;
                if app.state.expire(now()) {
                    app.render();
                }
                app.schedule_sweep();
            });
        }));
    }

    /// Re-clamp on the next frame after the viewport changed
    fn on_viewport_change(&mut self) {
        if self.viewport_frame.is_some() || !self.state.floating {
            return;
        }
        let me = self.me.clone();
        self.viewport_frame = Some(request_animation_frame(move |_| {
            with_app(&me, |app| {
                app.viewport_frame = None;
                app.render();
            });
        }));
    }

    fn escape(&mut self, pointer: Option<Vec2>) {
        let now = now();
        let layout = dom::measure_layout(self.state.floating);
        if self.state.register_escape(&layout, pointer, now) != EscapeOutcome::Ignored {
            self.after_update();
        }
    }

    /// Drop every listener, timer and in-flight request
    pub fn teardown(&mut self) {
        log::info!("Tearing down card");
        self.listeners.clear();
        self.sweep = None;
        self.envelope_timer = None;
        self.viewport_frame = None;
        self.probe = None;
        self.cache.clear();
    }
}

/// Wire up all page listeners
pub fn attach(app: &Shared) {
    let Some(window) = dom::window() else {
        return;
    };
    let weak = Rc::downgrade(app);
    let mut listeners = Vec::new();

    let mut on_click = |id: &str, action: fn(&mut App, f64)| {
        if let Some(el) = dom::by_id(id) {
            let weak = weak.clone();
            listeners.push(EventListener::new(&el, "click", move |_event: &Event| {
                with_app(&weak, |app| {
                    action(app, now());
                    app.after_update();
                });
            }));
        }
    };
    on_click(ids::START_BTN, |app, now| app.state.start(now));
    on_click(ids::YES_BTN, |app, now| app.state.press_yes(now));
    on_click(ids::OPEN_LETTER_BTN, |app, now| app.state.open_letter(now));
    on_click(ids::ENVELOPE, |app, _| app.state.open_envelope());

    if let Some(envelope) = dom::by_id(ids::ENVELOPE) {
        let weak = weak.clone();
        listeners.push(EventListener::new_with_options(
            &envelope,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.key() == "Enter" || event.key() == " " {
                    event.prevent_default();
                    with_app(&weak, |app| {
                        app.state.open_envelope();
                        app.after_update();
                    });
                }
            },
        ));
    }

    if let Some(no) = dom::by_id(ids::NO_BTN) {
        attach_no_button(&no, &weak, &mut listeners);
    }

    let viewport_targets: Vec<EventTarget> = std::iter::once(window.clone().into())
        .chain(window.visual_viewport().map(Into::into))
        .collect();
    for target in &viewport_targets {
        for kind in ["resize", "scroll"] {
            let weak = weak.clone();
            listeners.push(EventListener::new(target, kind, move |_event: &Event| {
                with_app(&weak, App::on_viewport_change);
            }));
        }
    }

    // Must outlive teardown: it is the listener doing the teardown
    {
        let weak = weak.clone();
        EventListener::new(&window, "pagehide", move |event: &Event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            let exit = PageExit::from_persisted(persisted);
            if exit.releases_card() {
                with_app(&weak, App::teardown);
            } else {
                log::debug!("Page cached, keeping card alive");
            }
        })
        .forget();
    }

    app.borrow_mut().listeners = listeners;
}

fn attach_no_button(no: &web_sys::Element, weak: &Weak<RefCell<App>>, listeners: &mut Vec<EventListener>) {
    // Hover escapes on mouse devices
    for kind in ["mouseenter", "mousemove"] {
        let weak = weak.clone();
        listeners.push(EventListener::new(no, kind, move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            with_app(&weak, |app| {
                if !app.state.touch {
                    app.escape(Some(pointer));
                }
            });
        }));
    }

    // Touch escapes on press; the press must never turn into a click
    {
        let weak = weak.clone();
        listeners.push(EventListener::new_with_options(
            no,
            "pointerdown",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                with_app(&weak, |app| {
                    if app.state.is_paused(now()) {
                        return;
                    }
                    if event.pointer_type() == "touch" || app.state.touch {
                        event.prevent_default();
                        app.escape(Some(pointer));
                    }
                });
            },
        ));
    }

    listeners.push(EventListener::new_with_options(
        no,
        "click",
        EventListenerOptions::enable_prevent_default(),
        |event: &Event| event.prevent_default(),
    ));
}
