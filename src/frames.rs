//! Self re-arming per-frame loop with an explicit cancellation token.

use log::warn;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Shared flag that stops a loop. Cloned into every queued frame callback,
/// which checks it before ticking and again before re-arming.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Something that can run a callback on the next display frame.
pub trait FrameHost: Clone + 'static {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);
}

/// `window.requestAnimationFrame`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserFrames;

impl FrameHost for BrowserFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(err) = gloo_utils::window().request_animation_frame(closure.unchecked_ref()) {
            warn!("requestAnimationFrame failed: {:?}", err);
        }
    }
}

/// Frame host for tests: callbacks queue up until [`ManualFrames::run_frame`].
#[derive(Clone, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<Vec<Box<dyn FnOnce(f64)>>>>,
    elapsed_ms: Rc<Cell<f64>>,
}

impl ManualFrames {
    const FRAME_MS: f64 = 16.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run one frame: every callback queued before this call fires once.
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        let timestamp = self.elapsed_ms.get() + Self::FRAME_MS;
        self.elapsed_ms.set(timestamp);
        let count = batch.len();
        for callback in batch {
            callback(timestamp);
        }
        count
    }
}

impl FrameHost for ManualFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        self.queue.borrow_mut().push(callback);
    }
}

/// A running per-frame loop. Cancelled by [`AnimationLoop::cancel`] or by
/// dropping it; at most one already-queued frame callback fires afterwards
/// and it neither ticks nor re-arms.
pub struct AnimationLoop {
    token: CancelToken,
}

impl AnimationLoop {
    pub fn start<H: FrameHost>(host: H, tick: impl FnMut(f64) + 'static) -> Self {
        let token = CancelToken::new();
        arm(host, token.clone(), Box::new(tick));
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn arm<H: FrameHost>(host: H, token: CancelToken, mut tick: Box<dyn FnMut(f64)>) {
    if token.is_cancelled() {
        return;
    }
    let next_host = host.clone();
    host.request_frame(Box::new(move |timestamp| {
        if token.is_cancelled() {
            return;
        }
        tick(timestamp);
        arm(next_host, token, tick);
    }));
}
