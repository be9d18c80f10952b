use crate::{Dispose, effect, on_unmount};

/// Explicit mount/unmount hooks for state that owns external resources
/// (timers, subscriptions, observers).
pub trait Lifecycle {
    fn activate(&self) {}

    /// Releases everything `activate` or later calls acquired. Must be safe
    /// to call more than once.
    fn deactivate(&self);
}

/// Activates `item` and ties its deactivation to the current scope, if any.
///
/// The returned guard deactivates at most once, whether it is run by hand or
/// by the scope.
pub fn mount<L>(item: &L) -> Dispose
where
    L: Lifecycle + Clone + 'static,
{
    let item = item.clone();
    effect(move || {
        item.activate();
        on_unmount(move || item.deactivate())
    })
}
