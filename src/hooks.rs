//! Custom hooks wiring browser side effects into the app reducer.

use chase_overlay::bounty::{BountyScheduler, BountySettings};
use chase_overlay::frames::{AnimationLoop, BrowserFrames};
use chase_overlay::sprite::{SpriteAnimator, SpriteState};
use chase_overlay::state::{Action, AppState};
use chase_overlay::timers::GlooTimers;
use chase_overlay::utils::warn_once;
use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::prelude::*;

const INTERACTION_EVENTS: [&str; 2] = ["mousemove", "touchstart"];

/// Current window size in CSS pixels, with a fallback for headless contexts.
pub fn viewport_size() -> (f64, f64) {
    let window = gloo_utils::window();
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (width, height)
}

/// Shows the controls on any pointer activity and hides them again after
/// `idle_ms` without activity.
#[hook]
pub fn use_idle_controls(dispatch: UseReducerDispatcher<AppState>, idle_ms: u32) {
    use_effect_with((), move |_| {
        let window = gloo_utils::window();
        let idle_timer: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

        let on_activity = {
            let idle_timer = idle_timer.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                dispatch.dispatch(Action::PointerActivity);
                let dispatch = dispatch.clone();
                // Replacing the handle cancels the previous countdown.
                *idle_timer.borrow_mut() = Some(Timeout::new(idle_ms, move || {
                    dispatch.dispatch(Action::ControlsIdle);
                }));
            })
        };

        for event in INTERACTION_EVENTS {
            if let Err(err) =
                window.add_event_listener_with_callback(event, on_activity.as_ref().unchecked_ref())
            {
                warn!("⚠️ Could not listen for {}: {:?}", event, err);
            }
        }

        move || {
            for event in INTERACTION_EVENTS {
                let _ = window
                    .remove_event_listener_with_callback(event, on_activity.as_ref().unchecked_ref());
            }
            idle_timer.borrow_mut().take();
            drop(on_activity);
        }
    });
}

/// One bounty scheduler per app instance. Run-state changes are fed back
/// into the reducer; the scheduler is stopped when the app unmounts.
#[hook]
pub fn use_bounty_scheduler(
    dispatch: UseReducerDispatcher<AppState>,
) -> Rc<BountyScheduler<GlooTimers>> {
    let scheduler = use_memo((), move |_| {
        let scheduler = BountyScheduler::new(GlooTimers, BountySettings::default());
        scheduler.set_listener(move |run| dispatch.dispatch(Action::BountyRunChanged(run)));
        scheduler
    });

    {
        let scheduler = scheduler.clone();
        use_effect_with((), move |_| {
            move || {
                debug!("Bounty scheduler torn down");
                scheduler.stop();
            }
        });
    }

    scheduler
}

/// Drives the sprite element referenced by `sprite_ref` once per animation
/// frame while `running` is true. Position survives pauses.
#[hook]
pub fn use_sprite_animation(running: bool, sprite_ref: NodeRef) {
    let animator = use_mut_ref(|| {
        let (width, height) = viewport_size();
        SpriteAnimator::new(SpriteState::centered(width, height))
    });

    use_effect_with(running, move |&running| {
        let animation = running.then(|| {
            info!("🎮 Sprite animation started");
            let mut rng = rand::rng();
            let mut style_warned = false;
            AnimationLoop::start(BrowserFrames, move |_timestamp| {
                let (width, height) = viewport_size();
                let mut animator = animator.borrow_mut();
                animator.step(width, height, &mut rng);
                if let Some(element) = sprite_ref.cast::<HtmlElement>() {
                    let result = element
                        .style()
                        .set_property("transform", &animator.state.css_transform());
                    warn_once(&mut style_warned, "Sprite transform update", result);
                }
            })
        });

        move || {
            if let Some(animation) = animation {
                animation.cancel();
                debug!("🎮 Sprite animation stopped");
            }
        }
    });
}
