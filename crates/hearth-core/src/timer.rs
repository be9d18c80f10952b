//! One-shot timers driven by a host loop.
//!
//! `TimerQueue` never fires on its own: the platform loop (or a test) calls
//! [`TimerQueue::poll`], which runs every callback whose deadline has passed
//! according to the queue's [`Clock`]. Handles are generational keys, so a
//! handle that already fired or was cancelled can never alias a newer timer.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

new_key_type! {
    pub struct TimerHandle;
}

pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    t: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(t: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(t)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Schedules and cancels one-shot callbacks.
pub trait TimerService {
    fn now(&self) -> Instant;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Returns `false` for handles that already fired or were cancelled.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

struct Timer {
    deadline: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct QueueState {
    timers: SlotMap<TimerHandle, Timer>,
    next_seq: u64,
}

#[derive(Clone)]
pub struct TimerQueue {
    clock: Rc<dyn Clock>,
    state: Rc<RefCell<QueueState>>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    /// Queue on wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock) -> Self {
        Self {
            clock: Rc::new(clock),
            state: Rc::new(RefCell::new(QueueState::default())),
        }
    }

    /// Queue on virtual time, plus the clock that drives it.
    pub fn manual() -> (Self, ManualClock) {
        let clock = ManualClock::new();
        (Self::with_clock(clock.clone()), clock)
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.state.borrow().timers.contains_key(handle)
    }

    /// Earliest deadline, so a host loop knows how long it may sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state
            .borrow()
            .timers
            .values()
            .map(|t| t.deadline)
            .min()
    }

    /// Fires every timer that is due, earliest first (ties in scheduling
    /// order). Timers scheduled by a callback wait for the next poll.
    /// Returns how many callbacks ran.
    pub fn poll(&self) -> usize {
        let now = self.clock.now();
        let horizon = self.state.borrow().next_seq;
        let mut fired = 0;
        // One at a time: a callback may cancel a timer that is also due.
        while let Some(callback) = self.pop_due(now, horizon) {
            callback();
            fired += 1;
        }
        if fired > 0 {
            log::trace!("timer queue fired {fired} callback(s)");
        }
        fired
    }

    fn pop_due(&self, now: Instant, horizon: u64) -> Option<Box<dyn FnOnce()>> {
        let mut st = self.state.borrow_mut();
        let key = st
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now && t.seq < horizon)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(k, _)| k)?;
        st.timers.remove(key).map(|t| t.callback)
    }

    /// Drops every pending timer without running it.
    pub fn clear(&self) {
        // callbacks may own handles to things that touch the queue on drop
        let timers = std::mem::take(&mut self.state.borrow_mut().timers);
        drop(timers);
    }
}

impl TimerService for TimerQueue {
    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let deadline = self.clock.now() + delay;
        let mut st = self.state.borrow_mut();
        let seq = st.next_seq;
        st.next_seq += 1;
        st.timers.insert(Timer {
            deadline,
            seq,
            callback,
        })
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let removed = self.state.borrow_mut().timers.remove(handle);
        removed.is_some()
    }
}
