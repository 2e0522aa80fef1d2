//! Main module for the Chase Overlay application using Yew.
//! Wires UI components, state hooks, and side-effect logic.

use chase_overlay::config::{CONTROLS_IDLE_MS, SPRITE_BASE_PATH, SPRITE_TOGGLE_ICON};
use chase_overlay::images::ImageSlot;
use chase_overlay::marks::Mark;
use chase_overlay::sprite::{choose_sprite, sprite_url};
use chase_overlay::state::{Action, AppState, BountyEdit, ViewMode};
use chase_overlay::CounterId;
use log::info;
use yew::prelude::*;

mod components;
mod hooks;

use components::{
    Banner, BountyModal, BountyOverlay, CounterControl, ImageStage, ImageWithFallback, SpriteView,
};
use hooks::{use_bounty_scheduler, use_idle_controls, use_sprite_animation};

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Dispatch a fixed action on every event.
fn dispatch_on<E: 'static>(dispatch: &UseReducerDispatcher<AppState>, action: Action) -> Callback<E> {
    let dispatch = dispatch.clone();
    Callback::from(move |_: E| dispatch.dispatch(action.clone()))
}

fn render_counter(dispatch: &UseReducerDispatcher<AppState>, id: CounterId, value: u32) -> Html {
    html! {
        <CounterControl
            label={id.label()}
            {value}
            on_decrement={dispatch_on(dispatch, Action::Decrement(id))}
            on_increment={dispatch_on(dispatch, Action::Increment(id))}
        />
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// App component

#[function_component]
pub fn App() -> Html {
    let state = use_reducer(AppState::default);
    let dispatch = state.dispatcher();

    use_idle_controls(dispatch.clone(), CONTROLS_IDLE_MS);
    let scheduler = use_bounty_scheduler(dispatch.clone());
    let sprite_ref = use_node_ref();
    use_sprite_animation(state.sprite_running(), sprite_ref.clone());

    // ── Image stage ────────────────────────────────────────────────────────
    let on_upload = {
        let dispatch = dispatch.clone();
        let slot = state.view.image_slot();
        Callback::from(move |image: ImageSlot| dispatch.dispatch(Action::ImageLoaded(slot, image)))
    };
    let on_place = {
        let dispatch = dispatch.clone();
        Callback::from(move |mark: Mark| dispatch.dispatch(Action::PlaceMark(mark)))
    };
    let on_remove = {
        let dispatch = dispatch.clone();
        Callback::from(move |index: usize| dispatch.dispatch(Action::RemoveMark(index)))
    };

    // ── Bounty ─────────────────────────────────────────────────────────────
    let on_toggle_bounty = {
        let scheduler = scheduler.clone();
        let active = state.bounty_run.active;
        let settings = state.bounty.clone();
        Callback::from(move |_: MouseEvent| {
            if active {
                scheduler.stop();
            } else {
                scheduler.start(settings.clone());
            }
        })
    };
    let on_edit_bounty = {
        let dispatch = dispatch.clone();
        Callback::from(move |edit: BountyEdit| dispatch.dispatch(Action::EditBounty(edit)))
    };
    let on_cancel_bounty = dispatch_on::<()>(&dispatch, Action::CancelBountyEditor);
    let on_save_bounty = {
        let dispatch = dispatch.clone();
        let scheduler = scheduler.clone();
        let draft = state.bounty_draft.clone();
        Callback::from(move |_: ()| {
            let Some(draft) = draft.clone() else {
                return;
            };
            dispatch.dispatch(Action::SaveBountyEditor);
            scheduler.update_settings(draft);
        })
    };

    // ── Sprite ─────────────────────────────────────────────────────────────
    let on_toggle_sprite = {
        let dispatch = dispatch.clone();
        let active = state.sprite.is_some();
        Callback::from(move |_: MouseEvent| {
            if active {
                info!("🎮 Sprite off");
                dispatch.dispatch(Action::SpriteDeactivated);
            } else {
                let index = choose_sprite(&mut rand::rng());
                info!("🎮 Sprite on");
                dispatch.dispatch(Action::SpriteActivated(index));
            }
        })
    };

    let counters = &state.counters;
    let (upload_label, marks_label) = match state.view {
        ViewMode::Bags => ("Click to upload the prize image", "Mark prize"),
        ViewMode::Sections => ("Click to upload the section image", "Mark sections"),
    };
    let bounty_image = state.bounty_image().cloned();

    html! {
        <div class="app">
            <div class="background" />
            <div class="live-caption">{ "Ask me what is LIVE" }</div>

            <ImageStage
                key={format!("{:?}", state.view)}
                image={state.current_image().cloned()}
                marks={state.current_marks().to_vec()}
                marking={state.marking}
                {upload_label}
                {on_upload}
                {on_place}
                {on_remove}
            />

            if let Some(text) = state.banner_text() {
                <Banner {text} />
            }

            if state.bounty_run.visible {
                if let Some(image) = bounty_image.clone() {
                    <BountyOverlay {image} text={state.bounty.text.clone()} />
                }
            }

            if let Some(index) = state.visible_sprite() {
                <SpriteView src={sprite_url(index)} sprite_ref={sprite_ref.clone()} />
            }

            <div class={classes!("controls", (!state.controls_visible).then_some("hidden"))}>
                <div class="control-group view-switcher">
                    <button class={classes!((state.view == ViewMode::Bags).then_some("active"))}
                        onclick={dispatch_on(&dispatch, Action::SetView(ViewMode::Bags))}>{ "Bags" }</button>
                    <button class={classes!((state.view == ViewMode::Sections).then_some("active"))}
                        onclick={dispatch_on(&dispatch, Action::SetView(ViewMode::Sections))}>{ "Sections" }</button>
                </div>

                <div class="control-group counters">
                    if state.view == ViewMode::Bags {
                        { render_counter(&dispatch, CounterId::Bags, counters.bags) }
                        { render_counter(&dispatch, CounterId::Chases, counters.chases) }
                    } else {
                        { for CounterId::SECTIONS.iter().map(|&id| render_counter(&dispatch, id, counters.get(id))) }
                        { render_counter(&dispatch, CounterId::SectionChases, counters.section_chases) }
                    }
                </div>

                <div class="control-group marking">
                    <button class={classes!(state.marking.then_some("active"))}
                        onclick={dispatch_on(&dispatch, Action::ToggleMarking)}>
                        { if state.marking { "Stop marking" } else { marks_label } }
                    </button>
                    <button onclick={dispatch_on(&dispatch, Action::UndoMark)}
                        disabled={state.current_marks().is_empty()}>{ "Undo" }</button>
                    <button onclick={dispatch_on(&dispatch, Action::ClearMarks)}
                        disabled={state.current_marks().is_empty()}>{ "Clear" }</button>
                </div>

                <div class="control-group bounty">
                    <button onclick={dispatch_on(&dispatch, Action::OpenBountyEditor)}>{ "Bounty Settings" }</button>
                    if state.can_run_bounty() {
                        <button class={classes!(state.bounty_run.active.then_some("active"))}
                            onclick={on_toggle_bounty}>
                            { if state.bounty_run.active { "Stop Bounty" } else { "Start Bounty" } }
                        </button>
                    }
                </div>

                <button class={classes!("sprite-toggle", state.sprite.is_some().then_some("active"))}
                    onclick={on_toggle_sprite}>
                    <ImageWithFallback
                        class={classes!("sprite-toggle-icon")}
                        src={format!("{}{}", SPRITE_BASE_PATH, SPRITE_TOGGLE_ICON)}
                        alt="Toggle sprite" />
                </button>
            </div>

            if let Some(draft) = state.bounty_draft.clone() {
                <BountyModal
                    {draft}
                    on_edit={on_edit_bounty}
                    on_cancel={on_cancel_bounty}
                    on_save={on_save_bounty}
                />
            }
        </div>
    }
}

/// Entry point: sets up console logging and renders the App.
fn main() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed, which keeps that one.
    let _ = console_log::init_with_level(log::Level::Debug);
    info!("🚀 Chase Overlay starting");
    yew::Renderer::<App>::new().render();
}
