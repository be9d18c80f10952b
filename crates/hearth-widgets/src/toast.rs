//! Toast notifications with auto-dismiss timers and bounded capacity.
//!
//! A `ToastContext` owns an ordered list of toasts (oldest first) and one
//! timer per auto-dismissing toast. Every path that removes a toast (manual
//! dismiss, timer expiry, eviction, teardown) cancels its timer first, so a
//! removed toast can never be dismissed again by a stale callback.
//!
//! ```rust
//! use hearth_core::TimerQueue;
//! use hearth_widgets::toast::*;
//! use std::time::Duration;
//!
//! let (timers, clock) = TimerQueue::manual();
//! let toasts = ToastContext::new(ToastConfig::default(), timers.clone());
//! let id = toasts.success("Saved", Some(Duration::from_millis(100)));
//! assert_eq!(toasts.len(), 1);
//!
//! clock.advance(Duration::from_millis(100));
//! timers.poll();
//! assert!(toasts.get(&id).is_none());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hearth_core::{
    Context, ContextError, Dispose, Lifecycle, Signal, SignalVec, TimerHandle, TimerService,
    expect_context, insert_context, mount, provide_contexts, try_context, use_context,
};
use serde::{Deserialize, Serialize};
use web_time::{Instant, SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Where the viewport stacks toasts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopRight,
    TopLeft,
    TopCenter,
    #[default]
    BottomRight,
    BottomLeft,
    BottomCenter,
}

/// A single notification. Immutable once shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    id: String,
    message: String,
    kind: ToastKind,
    duration: Duration,
    created_at: Instant,
}

impl Toast {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn kind(&self) -> ToastKind {
        self.kind
    }
    /// `Duration::ZERO` means the toast stays until dismissed.
    pub fn duration(&self) -> Duration {
        self.duration
    }
    pub fn created_at(&self) -> Instant {
        self.created_at
    }
    pub fn auto_dismisses(&self) -> bool {
        !self.duration.is_zero()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastOptions {
    pub message: String,
    pub kind: Option<ToastKind>,
    pub duration: Option<Duration>,
}

impl ToastOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl From<&str> for ToastOptions {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ToastOptions {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Provider configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Used when a toast does not specify its own duration; 0 disables
    /// auto-dismiss.
    pub default_duration_ms: u64,
    /// Oldest toasts are evicted beyond this many. Values below 1 act as 1.
    pub max_toasts: usize,
    pub position: ToastPosition,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 5000,
            max_toasts: 5,
            position: ToastPosition::default(),
        }
    }
}

impl ToastConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    fn capacity(&self) -> usize {
        self.max_toasts.max(1)
    }
}

static TOAST_SEQ: AtomicU64 = AtomicU64::new(0);

// 36^5: keeps the random part fixed-width so `seq ++ random` stays unique.
const RANDOM_SPACE: u32 = 60_466_176;

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// `toast-<ms>-<seq><random>`, all base 36. The process-wide sequence makes
/// ids unique even when the clock or the entropy source repeats.
pub fn generate_toast_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let seq = TOAST_SEQ.fetch_add(1, Ordering::Relaxed);
    let random = getrandom::u32().unwrap_or(0) % RANDOM_SPACE;
    format!(
        "toast-{}-{}{:0>5}",
        to_base36(millis),
        to_base36(seq),
        to_base36(random as u64)
    )
}

struct ToastInner {
    toasts: SignalVec<Toast>,
    /// Pending auto-dismiss timers, keyed by toast id.
    timers: RefCell<HashMap<String, TimerHandle>>,
    destroyed: Cell<bool>,
    scheduler: Rc<dyn TimerService>,
    config: ToastConfig,
}

impl Drop for ToastInner {
    fn drop(&mut self) {
        for (_, handle) in self.timers.get_mut().drain() {
            self.scheduler.cancel(handle);
        }
    }
}

/// Shared handle to a toast manager.
#[derive(Clone)]
pub struct ToastContext(Rc<ToastInner>);

impl fmt::Debug for ToastContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastContext")
            .field("toasts", &self.0.toasts)
            .field("pending_timers", &self.pending_timers())
            .field("config", &self.0.config)
            .finish()
    }
}

impl ToastContext {
    pub fn new(config: ToastConfig, timers: impl TimerService + 'static) -> Self {
        Self(Rc::new(ToastInner {
            toasts: SignalVec::new(),
            timers: RefCell::new(HashMap::new()),
            destroyed: Cell::new(false),
            scheduler: Rc::new(timers),
            config,
        }))
    }

    pub fn config(&self) -> ToastConfig {
        self.0.config
    }

    pub fn position(&self) -> ToastPosition {
        self.0.config.position
    }

    /// Currently visible toasts, oldest first. Tracked read.
    pub fn toasts(&self) -> Vec<Toast> {
        self.0.toasts.snapshot()
    }

    /// The observable list, for subscriptions.
    pub fn signal(&self) -> &Signal<Vec<Toast>> {
        self.0.toasts.signal()
    }

    pub fn get(&self, id: &str) -> Option<Toast> {
        self.0
            .toasts
            .with(|list| list.iter().find(|t| t.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.0.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.toasts.is_empty()
    }

    /// Number of auto-dismiss timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.0.timers.borrow().len()
    }

    pub fn has_timer(&self, id: &str) -> bool {
        self.0.timers.borrow().contains_key(id)
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.destroyed.get()
    }

    /// Shows a toast and returns its id.
    ///
    /// Beyond `max_toasts`, the oldest toasts are evicted (and their timers
    /// cancelled) before observers see the new list.
    pub fn show(&self, options: impl Into<ToastOptions>) -> String {
        let options = options.into();
        let id = generate_toast_id();
        if self.is_destroyed() {
            log::debug!("toast {id} ignored: provider already torn down");
            return id;
        }

        let toast = Toast {
            id: id.clone(),
            message: options.message,
            kind: options.kind.unwrap_or_default(),
            duration: options
                .duration
                .unwrap_or_else(|| self.0.config.default_duration()),
            created_at: self.0.scheduler.now(),
        };

        let capacity = self.0.config.capacity();
        let evicted: Vec<String> = self.0.toasts.signal().with_untracked(|list| {
            let excess = (list.len() + 1).saturating_sub(capacity);
            list.iter().take(excess).map(|t| t.id.clone()).collect()
        });
        for old in &evicted {
            self.cancel_timer(old);
        }

        if toast.auto_dismisses() {
            let weak: Weak<ToastInner> = Rc::downgrade(&self.0);
            let target = id.clone();
            let handle = self.0.scheduler.schedule(
                toast.duration,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        log::trace!("toast {target} expired");
                        ToastContext(inner).dismiss(&target);
                    }
                }),
            );
            self.0.timers.borrow_mut().insert(id.clone(), handle);
        }

        log::debug!(
            "toast {id} shown ({:?}, {} ms), evicting {}",
            toast.kind,
            toast.duration.as_millis(),
            evicted.len()
        );
        self.0.toasts.update(|list| {
            list.push(toast);
            let excess = list.len().saturating_sub(capacity);
            list.drain(..excess);
        });
        id
    }

    pub fn info(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.show_kind(ToastKind::Info, message, duration)
    }

    pub fn success(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.show_kind(ToastKind::Success, message, duration)
    }

    pub fn warning(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.show_kind(ToastKind::Warning, message, duration)
    }

    pub fn error(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.show_kind(ToastKind::Error, message, duration)
    }

    fn show_kind(
        &self,
        kind: ToastKind,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> String {
        self.show(ToastOptions {
            message: message.into(),
            kind: Some(kind),
            duration,
        })
    }

    /// Removes a toast. Unknown ids and repeated calls are no-ops.
    pub fn dismiss(&self, id: &str) {
        // timer goes first so an expiry racing this call finds nothing to do
        self.cancel_timer(id);
        if self.0.toasts.retain(|t| t.id != id) {
            log::debug!("toast {id} dismissed");
        }
    }

    /// Cancels every timer and clears the list with a single notification.
    pub fn dismiss_all(&self) {
        let pending: Vec<TimerHandle> = self.0.timers.borrow_mut().drain().map(|(_, h)| h).collect();
        for handle in pending {
            self.0.scheduler.cancel(handle);
        }
        self.0.toasts.clear();
    }

    /// Teardown: dismisses everything and refuses further toasts. Safe to
    /// call more than once.
    pub fn destroy(&self) {
        if !self.0.destroyed.replace(true) {
            log::debug!("toast manager destroyed");
        }
        self.dismiss_all();
    }

    fn cancel_timer(&self, id: &str) {
        let handle = self.0.timers.borrow_mut().remove(id);
        if let Some(handle) = handle {
            // false when the timer already fired; nothing else to undo
            self.0.scheduler.cancel(handle);
        }
    }
}

impl Lifecycle for ToastContext {
    fn deactivate(&self) {
        self.destroy();
    }
}

impl Context for ToastContext {
    const NAME: &'static str = "Toast";
    const PROVIDER: &'static str = "<ToastProvider>";

    /// Also provides the viewport position.
    fn provide<R>(self, f: impl FnOnce() -> R) -> R {
        let position = self.position();
        provide_contexts(
            move || {
                insert_context(position);
                insert_context(self);
            },
            f,
        )
    }
}

/// Creates a toast manager and ties its teardown to the current scope.
pub fn create_toast_context(config: ToastConfig, timers: impl TimerService + 'static) -> ToastContext {
    let ctx = ToastContext::new(config, timers);
    let _: Dispose = mount(&ctx);
    ctx
}

#[track_caller]
pub fn toast_context() -> ToastContext {
    expect_context::<ToastContext>()
}

pub fn try_toast_context() -> Result<ToastContext, ContextError> {
    try_context::<ToastContext>()
}

/// Viewport position of the nearest toast provider, bottom-right otherwise.
pub fn toast_position() -> ToastPosition {
    use_context::<ToastPosition>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{ManualClock, Scope, TimerQueue};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup(max_toasts: usize) -> (ToastContext, TimerQueue, ManualClock) {
        let (timers, clock) = TimerQueue::manual();
        let config = ToastConfig {
            default_duration_ms: 1000,
            max_toasts,
            ..ToastConfig::default()
        };
        (ToastContext::new(config, timers.clone()), timers, clock)
    }

    fn messages(ctx: &ToastContext) -> Vec<String> {
        ctx.toasts().iter().map(|t| t.message().to_string()).collect()
    }

    #[test]
    fn show_appends_with_defaults() {
        let (ctx, timers, _clock) = setup(5);
        let id = ctx.show("hello");

        let toast = ctx.get(&id).unwrap();
        assert_eq!(toast.kind(), ToastKind::Info);
        assert_eq!(toast.duration(), ms(1000));
        assert!(ctx.has_timer(&id));
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn ids_are_unique_and_prefixed() {
        let (ctx, _timers, _clock) = setup(100);
        let ids: Vec<String> = (0..50).map(|i| ctx.show(format!("t{i}"))).collect();
        let mut dedup = ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), ids.len());
        assert!(ids.iter().all(|id| id.starts_with("toast-")));
    }

    #[test]
    fn capacity_evicts_oldest_first_and_cancels_their_timers() {
        let (ctx, timers, _clock) = setup(3);
        let first = ctx.show("a");
        ctx.show("b");
        ctx.show("c");
        ctx.show("d");

        assert_eq!(messages(&ctx), vec!["b", "c", "d"]);
        assert!(!ctx.has_timer(&first));
        assert_eq!(timers.pending(), 3);
        assert_eq!(ctx.pending_timers(), 3);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let (ctx, _timers, _clock) = setup(4);
        let seen_max = Rc::new(Cell::new(0));
        let s = seen_max.clone();
        ctx.signal().subscribe(move |list| s.set(s.get().max(list.len())));

        for i in 0..20 {
            ctx.show(format!("t{i}"));
            assert!(ctx.len() <= 4);
        }
        assert_eq!(seen_max.get(), 4);
        assert_eq!(messages(&ctx), vec!["t16", "t17", "t18", "t19"]);
    }

    #[test]
    fn zero_capacity_behaves_like_one() {
        let (ctx, _timers, _clock) = setup(0);
        ctx.show("a");
        ctx.show("b");
        assert_eq!(messages(&ctx), vec!["b"]);
    }

    #[test]
    fn evicted_toast_never_fires_later() {
        let (ctx, timers, clock) = setup(1);
        let dismissed = Rc::new(Cell::new(0));
        let d = dismissed.clone();
        ctx.signal().subscribe(move |_| d.set(d.get() + 1));

        ctx.show(ToastOptions::new("old").duration(ms(100)));
        ctx.show(ToastOptions::new("new").duration(Duration::ZERO));
        let before = dismissed.get();

        clock.advance(ms(500));
        assert_eq!(timers.poll(), 0);
        assert_eq!(dismissed.get(), before);
        assert_eq!(messages(&ctx), vec!["new"]);
    }

    #[test]
    fn timer_dismisses_after_duration() {
        let (ctx, timers, clock) = setup(5);
        let id = ctx.show(ToastOptions::new("bye").duration(ms(200)));

        clock.advance(ms(199));
        timers.poll();
        assert!(ctx.get(&id).is_some());

        clock.advance(ms(1));
        timers.poll();
        assert!(ctx.get(&id).is_none());
        assert!(!ctx.has_timer(&id));
    }

    #[test]
    fn zero_duration_never_auto_dismisses() {
        let (ctx, timers, clock) = setup(5);
        let id = ctx.show(ToastOptions::new("saved").duration(Duration::ZERO));
        assert!(!ctx.has_timer(&id));

        clock.advance(Duration::from_secs(3600));
        timers.poll();
        assert!(ctx.get(&id).is_some());

        ctx.dismiss(&id);
        assert!(ctx.is_empty());
    }

    #[test]
    fn dismiss_is_idempotent() {
        let (ctx, timers, _clock) = setup(5);
        let keep = ctx.show("keep");
        let id = ctx.show("gone");

        ctx.dismiss(&id);
        let after_once = (messages(&ctx), ctx.pending_timers(), timers.pending());
        ctx.dismiss(&id);
        let after_twice = (messages(&ctx), ctx.pending_timers(), timers.pending());

        assert_eq!(after_once, after_twice);
        assert_eq!(after_once.0, vec!["keep"]);
        assert!(ctx.has_timer(&keep));
    }

    #[test]
    fn dismiss_unknown_id_is_silent() {
        let (ctx, _timers, _clock) = setup(5);
        ctx.show("a");
        ctx.dismiss("toast-nope");
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn timer_after_manual_dismiss_changes_nothing() {
        let (ctx, timers, clock) = setup(5);
        let id = ctx.show(ToastOptions::new("x").duration(ms(100)));
        ctx.dismiss(&id);

        let notifications = Rc::new(Cell::new(0));
        let n = notifications.clone();
        ctx.signal().subscribe(move |_| n.set(n.get() + 1));

        clock.advance(ms(100));
        assert_eq!(timers.poll(), 0);
        assert_eq!(notifications.get(), 0);
    }

    #[test]
    fn manual_dismiss_racing_expiry_in_same_tick() {
        let (ctx, timers, clock) = setup(5);
        let target = Rc::new(RefCell::new(String::new()));

        // scheduled first, so it runs before the toast's own expiry
        let c = ctx.clone();
        let t = target.clone();
        timers.schedule(ms(50), Box::new(move || c.dismiss(&t.borrow())));
        let id = ctx.show(ToastOptions::new("x").duration(ms(50)));
        *target.borrow_mut() = id.clone();

        clock.advance(ms(50));
        assert_eq!(timers.poll(), 1);
        assert!(ctx.get(&id).is_none());
        assert_eq!(ctx.pending_timers(), 0);
    }

    #[test]
    fn simultaneous_expiries_remove_both() {
        let (ctx, timers, clock) = setup(5);
        let a = ctx.show(ToastOptions::new("a").duration(ms(50)));
        let b = ctx.show(ToastOptions::new("b").duration(ms(50)));

        clock.advance(ms(50));
        assert_eq!(timers.poll(), 2);
        assert!(ctx.get(&a).is_none());
        assert!(ctx.get(&b).is_none());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn dismiss_all_notifies_once_with_empty_state() {
        let (ctx, timers, _clock) = setup(5);
        ctx.show("a");
        ctx.show("b");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let c = ctx.clone();
        ctx.signal()
            .subscribe(move |list| s.borrow_mut().push((list.len(), c.pending_timers())));

        ctx.dismiss_all();
        assert_eq!(*seen.borrow(), vec![(0, 0)]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn destroy_mid_timer_prevents_firing() {
        let (ctx, timers, clock) = setup(5);
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        ctx.signal().subscribe(move |_| f.set(true));

        ctx.show(ToastOptions::new("pending").duration(ms(100)));
        fired.set(false);
        clock.advance(ms(50));
        ctx.destroy();
        fired.set(false);

        clock.advance(ms(100));
        assert_eq!(timers.poll(), 0);
        assert!(!fired.get());
        assert!(ctx.is_destroyed());
    }

    #[test]
    fn show_after_destroy_is_ignored() {
        let (ctx, timers, _clock) = setup(5);
        ctx.destroy();
        let id = ctx.show("late");
        assert!(ctx.get(&id).is_none());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn scope_disposal_tears_down_manager() {
        let (timers, clock) = TimerQueue::manual();
        let scope = Scope::new();
        let ctx = scope.run(|| create_toast_context(ToastConfig::default(), timers.clone()));
        ctx.show("a");
        assert_eq!(timers.pending(), 1);

        scope.dispose();
        assert!(ctx.is_empty());
        assert_eq!(timers.pending(), 0);
        clock.advance(Duration::from_secs(10));
        assert_eq!(timers.poll(), 0);
    }

    #[test]
    fn dropping_last_handle_cancels_timers() {
        let (timers, _clock) = TimerQueue::manual();
        let ctx = ToastContext::new(ToastConfig::default(), timers.clone());
        ctx.show("a");
        drop(ctx);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn convenience_methods_set_kind() {
        let (ctx, _timers, _clock) = setup(5);
        let ids = [
            ctx.info("i", None),
            ctx.success("s", None),
            ctx.warning("w", None),
            ctx.error("e", Some(ms(10))),
        ];
        let kinds: Vec<ToastKind> = ids.iter().map(|id| ctx.get(id).unwrap().kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ToastKind::Info,
                ToastKind::Success,
                ToastKind::Warning,
                ToastKind::Error
            ]
        );
        assert_eq!(ctx.get(&ids[3]).unwrap().duration(), ms(10));
    }

    #[test]
    fn provider_exposes_context_and_position() {
        let (timers, _clock) = TimerQueue::manual();
        let config = ToastConfig {
            position: ToastPosition::TopCenter,
            ..ToastConfig::default()
        };
        assert_eq!(toast_position(), ToastPosition::BottomRight);
        assert!(try_toast_context().is_err());

        let ctx = ToastContext::new(config, timers);
        ctx.clone().provide(|| {
            assert_eq!(toast_position(), ToastPosition::TopCenter);
            toast_context().show("from consumer");
        });
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn missing_provider_error_is_descriptive() {
        let err = try_toast_context().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Toast context not found. Ensure this component is inside a <ToastProvider>."
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: ToastConfig =
            serde_json::from_str(r#"{"max_toasts": 2, "position": "top-left"}"#).unwrap();
        assert_eq!(cfg.max_toasts, 2);
        assert_eq!(cfg.position, ToastPosition::TopLeft);
        assert_eq!(cfg.default_duration(), ms(5000));
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
