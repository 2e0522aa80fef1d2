//! Timer primitives behind a small trait so schedulers can run against the
//! browser's timers or a manually advanced clock.
//!
//! Both backends cancel a timer when its handle is dropped, the same contract
//! `gloo_timers::callback::{Timeout, Interval}` provide.

use gloo_timers::callback::{Interval, Timeout};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Source of one-shot and repeating timers.
pub trait TimerBackend: Clone + 'static {
    /// Pending one-shot timer; dropping it cancels the timer.
    type Timeout: 'static;
    /// Running repeating timer; dropping it cancels the timer.
    type Interval: 'static;

    fn timeout<F: FnOnce() + 'static>(&self, delay_ms: u32, callback: F) -> Self::Timeout;
    fn interval<F: FnMut() + 'static>(&self, period_ms: u32, callback: F) -> Self::Interval;
}

/// Browser timers (`setTimeout` / `setInterval`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimers;

impl TimerBackend for GlooTimers {
    type Timeout = Timeout;
    type Interval = Interval;

    fn timeout<F: FnOnce() + 'static>(&self, delay_ms: u32, callback: F) -> Timeout {
        Timeout::new(delay_ms, callback)
    }

    fn interval<F: FnMut() + 'static>(&self, period_ms: u32, callback: F) -> Interval {
        Interval::new(period_ms, callback)
    }
}

enum Task {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>),
}

struct Entry {
    due: u64,
    period: Option<u64>,
    // None while a repeating task is running
    task: Option<Task>,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    next_id: u64,
    entries: BTreeMap<u64, Entry>,
}

impl ClockState {
    fn insert(&mut self, due: u64, period: Option<u64>, task: Task) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                due,
                period,
                task: Some(task),
            },
        );
        id
    }
}

/// Deterministic clock that only moves when [`ManualClock::advance`] is
/// called. Timers due at the same instant fire in creation order.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

/// Handle to a timer registered on a [`ManualClock`].
pub struct ManualTimer {
    id: u64,
    state: Weak<RefCell<ClockState>>,
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let removed = state.borrow_mut().entries.remove(&self.id);
            drop(removed);
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    /// Number of one-shot timers still waiting to fire.
    pub fn pending_timeouts(&self) -> usize {
        self.state
            .borrow()
            .entries
            .values()
            .filter(|e| e.period.is_none())
            .count()
    }

    /// Number of repeating timers still registered.
    pub fn active_intervals(&self) -> usize {
        self.state
            .borrow()
            .entries
            .values()
            .filter(|e| e.period.is_some())
            .count()
    }

    /// Move time forward by `ms`, firing every timer that falls due on the
    /// way, in due order.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let state = self.state.borrow();
                state
                    .entries
                    .iter()
                    .filter(|(_, e)| e.task.is_some() && e.due <= target)
                    .min_by_key(|(id, e)| (e.due, **id))
                    .map(|(id, _)| *id)
            };
            let Some(id) = next else { break };

            let task = {
                let mut state = self.state.borrow_mut();
                let Some(entry) = state.entries.get_mut(&id) else {
                    continue;
                };
                let due = entry.due;
                let task = match entry.period {
                    Some(period) => {
                        entry.due += period;
                        entry.task.take()
                    }
                    None => state.entries.remove(&id).and_then(|e| e.task),
                };
                state.now = due;
                task
            };

            match task {
                Some(Task::Once(callback)) => callback(),
                Some(Task::Repeat(mut callback)) => {
                    callback();
                    // Put the callback back unless the timer was cancelled
                    // while it ran.
                    let orphaned = {
                        let mut state = self.state.borrow_mut();
                        match state.entries.get_mut(&id) {
                            Some(entry) => {
                                entry.task = Some(Task::Repeat(callback));
                                None
                            }
                            None => Some(callback),
                        }
                    };
                    drop(orphaned);
                }
                None => {}
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl TimerBackend for ManualClock {
    type Timeout = ManualTimer;
    type Interval = ManualTimer;

    fn timeout<F: FnOnce() + 'static>(&self, delay_ms: u32, callback: F) -> ManualTimer {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay_ms as u64;
        let id = state.insert(due, None, Task::Once(Box::new(callback)));
        ManualTimer {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    fn interval<F: FnMut() + 'static>(&self, period_ms: u32, callback: F) -> ManualTimer {
        let mut state = self.state.borrow_mut();
        let period = (period_ms as u64).max(1);
        let due = state.now + period;
        let id = state.insert(due, Some(period), Task::Repeat(Box::new(callback)));
        ManualTimer {
            id,
            state: Rc::downgrade(&self.state),
        }
    }
}
