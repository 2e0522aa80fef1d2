//! Yew view components for the Chase Overlay UI.
//!
//! Most components here are stateless and render from props. The image stage
//! keeps its own pan/zoom transform, which nothing else needs to see.

use chase_overlay::bounty::BountySettings;
use chase_overlay::config::{
    MAX_BOUNTY_DURATION_SEC, MAX_BOUNTY_INTERVAL_SEC, MIN_BOUNTY_DURATION_SEC,
    MIN_BOUNTY_INTERVAL_SEC, PLACEHOLDER_GLYPH,
};
use chase_overlay::images::{read_selected_image, ImageSlot, UploadError};
use chase_overlay::marks::Mark;
use chase_overlay::state::BountyEdit;
use chase_overlay::utils::{format_seconds, validate_bounty_duration, validate_bounty_interval};
use chase_overlay::viewport::{PanZoom, PanZoomAction};
use log::{debug, warn};
use web_sys::{Element, HtmlInputElement};
use yew::prelude::*;

/// Pointer travel (px) after which a press counts as a drag, not a click.
const DRAG_THRESHOLD_PX: f64 = 3.0;

/// `onchange` handler for an `<input type="file">` that reads the selected
/// image and hands it to `on_loaded`. Cancelled pickers are ignored; rejected
/// files are logged and leave the slot untouched.
pub fn image_upload_callback(on_loaded: Callback<ImageSlot>) -> Callback<Event> {
    Callback::from(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let on_loaded = on_loaded.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match read_selected_image(&input).await {
                Ok(image) => on_loaded.emit(image),
                Err(UploadError::NoFile) => debug!("📂 File picker closed without a file"),
                Err(err) => warn!("📂 Upload ignored: {}", err),
            }
            // Allow picking the same file again.
            input.set_value("");
        });
    })
}

/// Image that swaps itself for the placeholder glyph when it fails to load.
#[derive(Properties, PartialEq)]
pub struct ImageWithFallbackProps {
    pub src: AttrValue,
    #[prop_or_default]
    pub alt: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(ImageWithFallback)]
pub fn image_with_fallback(props: &ImageWithFallbackProps) -> Html {
    let failed = use_state_eq(|| false);

    {
        // A new source gets a fresh attempt.
        let failed = failed.clone();
        use_effect_with(props.src.clone(), move |_| {
            failed.set(false);
            || ()
        });
    }

    if *failed {
        return html! {
            <span class={classes!("placeholder-glyph", props.class.clone())}>{ PLACEHOLDER_GLYPH }</span>
        };
    }

    let onerror = {
        let failed = failed.clone();
        let src = props.src.clone();
        Callback::from(move |_: Event| {
            warn!("🖼 Could not load {}", src);
            failed.set(true);
        })
    };

    html! {
        <img class={props.class.clone()} src={props.src.clone()} alt={props.alt.clone()} {onerror} />
    }
}

/// Label, value and -/+ buttons for one counter.
#[derive(Properties, PartialEq)]
pub struct CounterControlProps {
    pub label: AttrValue,
    pub value: u32,
    pub on_decrement: Callback<MouseEvent>,
    pub on_increment: Callback<MouseEvent>,
}

#[function_component(CounterControl)]
pub fn counter_control(props: &CounterControlProps) -> Html {
    html! {
        <div class="counter">
            <span class="counter-label">{ props.label.clone() }</span>
            <button class="counter-button" onclick={props.on_decrement.clone()}
                disabled={props.value == 0}>{ "−" }</button>
            <span class="counter-value">{ props.value }</span>
            <button class="counter-button" onclick={props.on_increment.clone()}>{ "+" }</button>
        </div>
    }
}

/// Centre banner with the bag count and hit ratio.
#[derive(Properties, PartialEq)]
pub struct BannerProps {
    pub text: AttrValue,
}

#[function_component(Banner)]
pub fn banner(props: &BannerProps) -> Html {
    html! {
        <div class="hit-ratio-banner">{ props.text.clone() }</div>
    }
}

/// The bounty announcement: image plus optional caption.
#[derive(Properties, PartialEq)]
pub struct BountyOverlayProps {
    pub image: ImageSlot,
    pub text: AttrValue,
}

#[function_component(BountyOverlay)]
pub fn bounty_overlay(props: &BountyOverlayProps) -> Html {
    html! {
        <div class="bounty-overlay">
            <ImageWithFallback class={classes!("bounty-image")}
                src={AttrValue::from(props.image.data_uri.clone())}
                alt="Bounty" />
            if !props.text.is_empty() {
                <div class="bounty-text">{ props.text.clone() }</div>
            }
        </div>
    }
}

/// Range slider for one of the bounty timings.
#[derive(Properties, PartialEq)]
pub struct SecondsSliderProps {
    pub label: AttrValue,
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub oninput: Callback<InputEvent>,
}

#[function_component(SecondsSlider)]
pub fn seconds_slider(props: &SecondsSliderProps) -> Html {
    html! {
        <div class="form-group">
            <label>{ props.label.clone() }</label>
            <div class="slider-with-value">
                <input type="range"
                    min={props.min.to_string()}
                    max={props.max.to_string()}
                    step="1"
                    value={props.value.to_string()}
                    oninput={props.oninput.clone()}
                />
                <span class="slider-value">{ format_seconds(props.value) }</span>
            </div>
        </div>
    }
}

/// Bounty settings editor. Works on the draft only; nothing reaches the
/// committed settings until Save.
#[derive(Properties, PartialEq)]
pub struct BountyModalProps {
    pub draft: BountySettings,
    pub on_edit: Callback<BountyEdit>,
    pub on_cancel: Callback<()>,
    pub on_save: Callback<()>,
}

fn slider_callback(
    on_edit: &Callback<BountyEdit>,
    validate: fn(&str) -> Result<u32, String>,
    edit: fn(u32) -> BountyEdit,
) -> Callback<InputEvent> {
    let on_edit = on_edit.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match validate(&input.value()) {
            Ok(secs) => on_edit.emit(edit(secs)),
            Err(msg) => warn!("⚠️ {}", msg),
        }
    })
}

#[function_component(BountyModal)]
pub fn bounty_modal(props: &BountyModalProps) -> Html {
    let on_image = image_upload_callback(props.on_edit.reform(BountyEdit::Image));

    let on_text = props.on_edit.reform(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        BountyEdit::Text(input.value())
    });

    let on_duration = slider_callback(&props.on_edit, validate_bounty_duration, BountyEdit::Duration);
    let on_interval = slider_callback(&props.on_edit, validate_bounty_interval, BountyEdit::Interval);

    let on_backdrop = props.on_cancel.reform(|_: MouseEvent| ());
    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());
    let on_save = props.on_save.reform(|_: MouseEvent| ());
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    let draft = &props.draft;
    html! {
        <div class="modal-backdrop" onclick={on_backdrop}>
            <div class="modal" onclick={keep_open}>
                <h2>{ "Bounty Settings" }</h2>

                <div class="form-group">
                    <label>{ "Bounty image" }</label>
                    <input type="file" accept="image/*" onchange={on_image} />
                    if let Some(image) = &draft.image {
                        <ImageWithFallback class={classes!("bounty-preview")}
                            src={AttrValue::from(image.data_uri.clone())}
                            alt={image.file_name.clone()} />
                    }
                </div>

                <div class="form-group">
                    <label>{ "Bounty text" }</label>
                    <input type="text" placeholder="e.g. 1/3 found"
                        value={draft.text.clone()} oninput={on_text} />
                </div>

                <SecondsSlider label="Display duration"
                    value={draft.duration_secs}
                    min={MIN_BOUNTY_DURATION_SEC}
                    max={MAX_BOUNTY_DURATION_SEC}
                    oninput={on_duration} />
                <SecondsSlider label="Display interval"
                    value={draft.interval_secs}
                    min={MIN_BOUNTY_INTERVAL_SEC}
                    max={MAX_BOUNTY_INTERVAL_SEC}
                    oninput={on_interval} />

                if draft.is_continuous() {
                    <p class="modal-hint">{ "Duration is not shorter than the interval: the bounty stays on screen." }</p>
                }

                <div class="modal-actions">
                    <button onclick={on_cancel}>{ "Cancel" }</button>
                    <button class="primary" onclick={on_save}>{ "Save" }</button>
                </div>
            </div>
        </div>
    }
}

/// Pan/zoom image area with the mark overlay. Shows an upload prompt until
/// an image is set.
#[derive(Properties, PartialEq)]
pub struct ImageStageProps {
    pub image: Option<ImageSlot>,
    pub marks: Vec<Mark>,
    pub marking: bool,
    pub upload_label: AttrValue,
    pub on_upload: Callback<ImageSlot>,
    pub on_place: Callback<Mark>,
    pub on_remove: Callback<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: (f64, f64),
    last: (f64, f64),
}

fn client_point(e: &MouseEvent) -> (f64, f64) {
    (e.client_x() as f64, e.client_y() as f64)
}

#[function_component(ImageStage)]
pub fn image_stage(props: &ImageStageProps) -> Html {
    let view = use_reducer(PanZoom::default);
    let wrapper_ref = use_node_ref();
    let content_ref = use_node_ref();
    let drag = use_mut_ref(|| None::<Drag>);
    // Set when the last press moved far enough to be a pan
    let dragged = use_mut_ref(|| false);

    let Some(image) = props.image.clone() else {
        return html! {
            <label class="upload-prompt">
                { props.upload_label.clone() }
                <input type="file" accept="image/*" onchange={image_upload_callback(props.on_upload.clone())} />
            </label>
        };
    };

    let onwheel = {
        let view = view.dispatcher();
        let wrapper_ref = wrapper_ref.clone();
        Callback::from(move |e: WheelEvent| {
            let Some(wrapper) = wrapper_ref.cast::<Element>() else {
                return;
            };
            let rect = wrapper.get_bounding_client_rect();
            view.dispatch(PanZoomAction::Wheel {
                delta_y: e.delta_y(),
                cursor_x: e.client_x() as f64 - rect.left(),
                cursor_y: e.client_y() as f64 - rect.top(),
            });
        })
    };

    let onmousedown = {
        let drag = drag.clone();
        let dragged = dragged.clone();
        Callback::from(move |e: MouseEvent| {
            let point = client_point(&e);
            *drag.borrow_mut() = Some(Drag { start: point, last: point });
            *dragged.borrow_mut() = false;
        })
    };

    let onmousemove = {
        let drag = drag.clone();
        let dragged = dragged.clone();
        let view = view.dispatcher();
        Callback::from(move |e: MouseEvent| {
            let mut drag = drag.borrow_mut();
            let Some(state) = drag.as_mut() else {
                return;
            };
            let (x, y) = client_point(&e);
            view.dispatch(PanZoomAction::Pan {
                dx: x - state.last.0,
                dy: y - state.last.1,
            });
            state.last = (x, y);
            if (x - state.start.0).hypot(y - state.start.1) > DRAG_THRESHOLD_PX {
                *dragged.borrow_mut() = true;
            }
        })
    };

    let end_drag = {
        let drag = drag.clone();
        Callback::from(move |_: MouseEvent| {
            drag.borrow_mut().take();
        })
    };

    let ondblclick = {
        let view = view.dispatcher();
        Callback::from(move |_: MouseEvent| view.dispatch(PanZoomAction::Reset))
    };

    let onclick = {
        let content_ref = content_ref.clone();
        let dragged = dragged.clone();
        let on_place = props.on_place.clone();
        let marking = props.marking;
        let scale = view.scale;
        Callback::from(move |e: MouseEvent| {
            if !marking || *dragged.borrow() {
                return;
            }
            let Some(content) = content_ref.cast::<Element>() else {
                return;
            };
            // The bounding box already includes the current pan offset.
            let rect = content.get_bounding_client_rect();
            let (x, y) = client_point(&e);
            on_place.emit(Mark::from_client(x, y, rect.left(), rect.top(), scale));
        })
    };

    let marks = props.marks.iter().enumerate().map(|(index, mark)| {
        let on_remove = props.on_remove.clone();
        let onclick = Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_remove.emit(index);
        });
        html! {
            <div class="mark" key={index}
                style={format!("left: {}px; top: {}px;", mark.x, mark.y)}
                {onclick} />
        }
    });

    html! {
        <div class={classes!("image-stage", props.marking.then_some("marking"))}
            ref={wrapper_ref}
            {onwheel} {onmousedown} {onmousemove}
            onmouseup={end_drag.clone()} onmouseleave={end_drag}
            {ondblclick}>
            <div class="image-content" ref={content_ref}
                style={format!("transform: {}; transform-origin: 0 0;", view.css_transform())}
                {onclick}>
                <ImageWithFallback class={classes!("stage-image")}
                    src={AttrValue::from(image.data_uri.clone())}
                    alt={image.file_name.clone()} />
                { for marks }
            </div>
        </div>
    }
}

/// The bouncing sprite. Its position is written by the animation hook
/// through `sprite_ref`, never through props.
#[derive(Properties, PartialEq)]
pub struct SpriteViewProps {
    pub src: AttrValue,
    pub sprite_ref: NodeRef,
}

#[function_component(SpriteView)]
pub fn sprite_view(props: &SpriteViewProps) -> Html {
    html! {
        <div class="sprite" ref={props.sprite_ref.clone()}>
            <ImageWithFallback class={classes!("sprite-image")} src={props.src.clone()} alt="Sprite" />
        </div>
    }
}
