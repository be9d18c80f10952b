//! Bounded counter.

use hearth_core::{Context, ContextError, Signal, expect_context, try_context};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterOptions {
    pub initial: i64,
    pub step: i64,
    pub min: i64,
    pub max: i64,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            initial: 0,
            step: 1,
            min: i64::MIN,
            max: i64::MAX,
        }
    }
}

/// `min <= count <= max` holds after every operation.
#[derive(Clone, Debug)]
pub struct CounterContext {
    count: Signal<i64>,
    step: Signal<i64>,
    min: i64,
    max: i64,
}

impl CounterContext {
    /// Inverted bounds are swapped; `initial` is clamped and `step` is at
    /// least 1.
    pub fn new(options: CounterOptions) -> Self {
        let (min, max) = if options.min <= options.max {
            (options.min, options.max)
        } else {
            log::warn!(
                "counter bounds inverted ({} > {}), swapping",
                options.min,
                options.max
            );
            (options.max, options.min)
        };
        Self {
            count: Signal::new(options.initial.clamp(min, max)),
            step: Signal::new(options.step.max(1)),
            min,
            max,
        }
    }

    pub fn count(&self) -> i64 {
        self.count.get()
    }

    pub fn step(&self) -> i64 {
        self.step.get()
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// The observable count, for subscriptions.
    pub fn signal(&self) -> &Signal<i64> {
        &self.count
    }

    pub fn is_at_min(&self) -> bool {
        self.count() <= self.min
    }

    pub fn is_at_max(&self) -> bool {
        self.count() >= self.max
    }

    pub fn can_increment(&self) -> bool {
        self.count()
            .checked_add(self.step())
            .is_some_and(|next| next <= self.max)
    }

    pub fn can_decrement(&self) -> bool {
        self.count()
            .checked_sub(self.step())
            .is_some_and(|next| next >= self.min)
    }

    /// Ignored when the result would pass `max`.
    pub fn increment(&self) {
        if self.can_increment() {
            let step = self.step.with_untracked(|s| *s);
            self.count.update(|c| *c += step);
        }
    }

    /// Ignored when the result would pass `min`.
    pub fn decrement(&self) {
        if self.can_decrement() {
            let step = self.step.with_untracked(|s| *s);
            self.count.update(|c| *c -= step);
        }
    }

    /// Clamps into `[min, max]`.
    pub fn set(&self, value: i64) {
        self.count.set(value.clamp(self.min, self.max));
    }

    pub fn set_step(&self, step: i64) {
        self.step.set(step.max(1));
    }

    /// Back to zero, or the nearest bound when zero is out of range.
    pub fn reset(&self) {
        self.set(0);
    }
}

impl Default for CounterContext {
    fn default() -> Self {
        Self::new(CounterOptions::default())
    }
}

impl Context for CounterContext {
    const NAME: &'static str = "Counter";
    const PROVIDER: &'static str = "<CounterProvider>";
}

pub fn create_counter_context(options: CounterOptions) -> CounterContext {
    CounterContext::new(options)
}

#[track_caller]
pub fn counter_context() -> CounterContext {
    expect_context::<CounterContext>()
}

pub fn try_counter_context() -> Result<CounterContext, ContextError> {
    try_context::<CounterContext>()
}
