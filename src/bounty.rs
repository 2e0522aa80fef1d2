//! Recurring bounty announcement: shown for `duration` seconds, every
//! `interval` seconds, until stopped.
//!
//! The scheduler owns at most one repeating reveal timer, one pending hide
//! timer and one pending restart timer. Timer closures only hold a `Weak`
//! reference to the scheduler state, so dropping the scheduler cancels
//! everything.

use crate::config::{
    BOUNTY_RESTART_DELAY_MS, DEFAULT_BOUNTY_DURATION_SEC, DEFAULT_BOUNTY_INTERVAL_SEC,
};
use crate::images::ImageSlot;
use crate::timers::TimerBackend;
use log::{debug, info, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// What the bounty shows and how often.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BountySettings {
    pub image: Option<ImageSlot>,
    pub text: String,
    pub duration_secs: u32,
    pub interval_secs: u32,
}

impl Default for BountySettings {
    fn default() -> Self {
        Self {
            image: None,
            text: String::new(),
            duration_secs: DEFAULT_BOUNTY_DURATION_SEC,
            interval_secs: DEFAULT_BOUNTY_INTERVAL_SEC,
        }
    }
}

impl BountySettings {
    fn duration_ms(&self) -> u32 {
        self.duration_secs.saturating_mul(1_000)
    }

    fn interval_ms(&self) -> u32 {
        self.interval_secs.saturating_mul(1_000)
    }

    /// True when each showing lasts at least as long as the gap between
    /// showings, which leaves the bounty on screen continuously.
    pub fn is_continuous(&self) -> bool {
        self.duration_secs >= self.interval_secs
    }
}

/// `active`: the scheduler is running. `visible`: the bounty is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BountyRunState {
    pub active: bool,
    pub visible: bool,
}

type Listener = Rc<dyn Fn(BountyRunState)>;

struct Inner<B: TimerBackend> {
    run: BountyRunState,
    settings: BountySettings,
    reveal: Option<B::Interval>,
    hide: Option<B::Timeout>,
    restart: Option<B::Timeout>,
    listener: Option<Listener>,
}

/// Show/hide scheduler for the bounty overlay.
pub struct BountyScheduler<B: TimerBackend> {
    backend: B,
    inner: Rc<RefCell<Inner<B>>>,
}

impl<B: TimerBackend> BountyScheduler<B> {
    pub fn new(backend: B, settings: BountySettings) -> Self {
        Self {
            backend,
            inner: Rc::new(RefCell::new(Inner {
                run: BountyRunState::default(),
                settings,
                reveal: None,
                hide: None,
                restart: None,
                listener: None,
            })),
        }
    }

    /// Register the callback notified after every run-state change.
    pub fn set_listener(&self, listener: impl Fn(BountyRunState) + 'static) {
        self.inner.borrow_mut().listener = Some(Rc::new(listener));
    }

    pub fn run_state(&self) -> BountyRunState {
        self.inner.borrow().run
    }

    pub fn settings(&self) -> BountySettings {
        self.inner.borrow().settings.clone()
    }

    /// Start (or restart) showing the bounty with `settings`. Any timers of a
    /// previous run are cancelled first.
    pub fn start(&self, settings: BountySettings) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.restart = None;
            inner.settings = settings;
        }
        start_timers(&self.backend, &self.inner);
    }

    /// Stop the bounty and hide it. Cancels every pending timer.
    pub fn stop(&self) {
        let was_active = {
            let mut inner = self.inner.borrow_mut();
            let was_active = inner.run.active || inner.restart.is_some();
            inner.reveal = None;
            inner.hide = None;
            inner.restart = None;
            inner.run = BountyRunState::default();
            was_active
        };
        if was_active {
            info!("🎯 Bounty stopped");
        }
        notify(&self.inner);
    }

    /// Commit new settings. A running bounty is stopped and started again
    /// after a short settle delay, so it briefly disappears.
    pub fn update_settings(&self, settings: BountySettings) {
        let was_active = self.run_state().active;
        if was_active {
            self.stop();
        }
        debug!(
            "🎯 Bounty settings committed: {}",
            serde_json::to_string(&settings).unwrap_or_default()
        );
        self.inner.borrow_mut().settings = settings;

        if was_active {
            let weak = Rc::downgrade(&self.inner);
            let backend = self.backend.clone();
            let handle = self.backend.timeout(BOUNTY_RESTART_DELAY_MS, move || {
                if let Some(inner) = weak.upgrade() {
                    debug!("🎯 Restarting bounty with new settings");
                    start_timers(&backend, &inner);
                }
            });
            self.inner.borrow_mut().restart = Some(handle);
        }
    }
}

fn notify<B: TimerBackend>(inner: &Rc<RefCell<Inner<B>>>) {
    let (listener, run) = {
        let inner = inner.borrow();
        (inner.listener.clone(), inner.run)
    };
    if let Some(listener) = listener {
        listener(run);
    }
}

// Does not touch `restart`: this also runs from inside the restart timer.
fn start_timers<B: TimerBackend>(backend: &B, inner: &Rc<RefCell<Inner<B>>>) {
    {
        let mut state = inner.borrow_mut();
        state.reveal = None;
        state.hide = None;

        let settings = &state.settings;
        let (duration_ms, interval_ms) = (settings.duration_ms(), settings.interval_ms());
        if settings.is_continuous() {
            warn!(
                "🎯 Bounty duration {}s >= interval {}s, it will stay visible",
                settings.duration_secs, settings.interval_secs
            );
        }
        info!(
            "🎯 Bounty started: {}s every {}s",
            settings.duration_secs, settings.interval_secs
        );

        state.run = BountyRunState {
            active: true,
            visible: true,
        };
        state.hide = Some(schedule_hide(backend, inner, duration_ms));

        let weak = Rc::downgrade(inner);
        let tick_backend = backend.clone();
        state.reveal = Some(backend.interval(interval_ms, move || {
            if let Some(inner) = weak.upgrade() {
                reveal(&tick_backend, &inner);
            }
        }));
    }
    notify(inner);
}

fn reveal<B: TimerBackend>(backend: &B, inner: &Rc<RefCell<Inner<B>>>) {
    {
        let mut state = inner.borrow_mut();
        if !state.run.active {
            return;
        }
        state.run.visible = true;
        let duration_ms = state.settings.duration_ms();
        // Replacing the handle cancels a hide that is still pending.
        state.hide = Some(schedule_hide(backend, inner, duration_ms));
    }
    debug!("🎯 Bounty shown");
    notify(inner);
}

fn schedule_hide<B: TimerBackend>(
    backend: &B,
    inner: &Rc<RefCell<Inner<B>>>,
    delay_ms: u32,
) -> B::Timeout {
    let weak = Rc::downgrade(inner);
    backend.timeout(delay_ms, move || {
        let Some(inner) = weak.upgrade() else { return };
        inner.borrow_mut().run.visible = false;
        debug!("🎯 Bounty hidden");
        notify(&inner);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualClock;

    fn settings(duration_secs: u32, interval_secs: u32) -> BountySettings {
        BountySettings {
            text: "0/2".to_string(),
            duration_secs,
            interval_secs,
            ..BountySettings::default()
        }
    }

    /// Scheduler plus a log of (time, visible) notifications.
    fn recorded(clock: &ManualClock) -> (BountyScheduler<ManualClock>, Rc<RefCell<Vec<(u64, bool)>>>) {
        let scheduler = BountyScheduler::new(clock.clone(), BountySettings::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let (sink, clock_in) = (log.clone(), clock.clone());
        scheduler.set_listener(move |run| sink.borrow_mut().push((clock_in.now(), run.visible)));
        (scheduler, log)
    }

    #[test]
    fn test_show_hide_sequence() {
        let clock = ManualClock::new();
        let (scheduler, _) = recorded(&clock);
        scheduler.start(settings(2, 6));

        assert!(scheduler.run_state().visible);
        clock.advance(1_999);
        assert!(scheduler.run_state().visible);
        clock.advance(1);
        assert!(!scheduler.run_state().visible);
        clock.advance(4_000);
        assert!(scheduler.run_state().visible, "visible again at t=6");
        clock.advance(2_000);
        assert!(!scheduler.run_state().visible, "hidden again at t=8");
        assert!(scheduler.run_state().active);
    }

    #[test]
    fn test_notifications_follow_timeline() {
        let clock = ManualClock::new();
        let (scheduler, log) = recorded(&clock);
        scheduler.start(settings(2, 6));
        clock.advance(12_500);
        assert_eq!(
            *log.borrow(),
            vec![
                (0, true),
                (2_000, false),
                (6_000, true),
                (8_000, false),
                (12_000, true)
            ]
        );
    }

    #[test]
    fn test_double_start_keeps_single_timers() {
        let clock = ManualClock::new();
        let (scheduler, _) = recorded(&clock);
        scheduler.start(settings(2, 6));
        clock.advance(500);
        scheduler.start(settings(2, 6));

        assert_eq!(clock.active_intervals(), 1);
        assert_eq!(clock.pending_timeouts(), 1);

        // The second start resets the phase: hide at 2.5s, reveal at 6.5s.
        clock.advance(2_000);
        assert!(!scheduler.run_state().visible);
        clock.advance(3_999);
        assert!(!scheduler.run_state().visible);
        clock.advance(1);
        assert!(scheduler.run_state().visible);
        assert_eq!(clock.active_intervals(), 1);
        assert_eq!(clock.pending_timeouts(), 1);
    }

    #[test]
    fn test_stop_cancels_everything() {
        let clock = ManualClock::new();
        let (scheduler, log) = recorded(&clock);
        scheduler.start(settings(2, 6));
        clock.advance(1_000);
        scheduler.stop();

        assert_eq!(scheduler.run_state(), BountyRunState::default());
        assert_eq!(clock.active_intervals(), 0);
        assert_eq!(clock.pending_timeouts(), 0);

        let notifications = log.borrow().len();
        clock.advance(120_000);
        assert_eq!(log.borrow().len(), notifications);
        assert!(!scheduler.run_state().visible);
    }

    #[test]
    fn test_update_settings_restarts_running_bounty() {
        let clock = ManualClock::new();
        let (scheduler, _) = recorded(&clock);
        scheduler.start(settings(2, 6));
        clock.advance(1_000);

        scheduler.update_settings(settings(3, 10));
        assert_eq!(scheduler.run_state(), BountyRunState::default());
        assert_eq!(clock.active_intervals(), 0);

        clock.advance(BOUNTY_RESTART_DELAY_MS as u64);
        assert_eq!(
            scheduler.run_state(),
            BountyRunState {
                active: true,
                visible: true
            }
        );
        assert_eq!(scheduler.settings().duration_secs, 3);
        assert_eq!(clock.active_intervals(), 1);
        assert_eq!(clock.pending_timeouts(), 1);

        clock.advance(3_000);
        assert!(!scheduler.run_state().visible);
    }

    #[test]
    fn test_update_settings_while_idle_only_commits() {
        let clock = ManualClock::new();
        let (scheduler, log) = recorded(&clock);
        scheduler.update_settings(settings(4, 20));
        clock.advance(60_000);
        assert_eq!(scheduler.settings().interval_secs, 20);
        assert_eq!(scheduler.run_state(), BountyRunState::default());
        assert!(log.borrow().is_empty());
        assert_eq!(clock.pending_timeouts(), 0);
    }

    #[test]
    fn test_stop_during_restart_delay() {
        let clock = ManualClock::new();
        let (scheduler, _) = recorded(&clock);
        scheduler.start(settings(2, 6));
        scheduler.update_settings(settings(2, 8));
        scheduler.stop();
        clock.advance(10_000);
        assert!(!scheduler.run_state().active);
        assert_eq!(clock.pending_timeouts(), 0);
    }

    #[test]
    fn test_duration_not_shorter_than_interval_stays_visible() {
        let clock = ManualClock::new();
        let (scheduler, _) = recorded(&clock);
        let continuous = settings(5, 5);
        assert!(continuous.is_continuous());
        scheduler.start(continuous);
        for _ in 0..6 {
            clock.advance(2_500);
            assert!(scheduler.run_state().visible);
        }
        assert_eq!(clock.pending_timeouts(), 1);
    }

    #[test]
    fn test_dropping_scheduler_cancels_timers() {
        let clock = ManualClock::new();
        let (scheduler, log) = recorded(&clock);
        scheduler.start(settings(2, 6));
        drop(scheduler);
        assert_eq!(clock.active_intervals(), 0);
        assert_eq!(clock.pending_timeouts(), 0);
        clock.advance(30_000);
        assert_eq!(log.borrow().len(), 1);
    }
}
