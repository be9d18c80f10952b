use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::reactive::{self, SignalId};

new_key_type! {
    /// Handle returned by [`Signal::subscribe`].
    pub struct SubId;
}

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Observable value. Cloning yields another handle to the same cell.
pub struct Signal<T: 'static>(Rc<Inner<T>>);

struct Inner<T> {
    id: SignalId,
    value: RefCell<T>,
    subs: RefCell<SlotMap<SubId, Subscriber<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&*self.0.value.borrow()).finish()
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Inner {
            id: reactive::next_signal_id(),
            value: RefCell::new(value),
            subs: RefCell::new(SlotMap::with_key()),
        }))
    }

    pub fn id(&self) -> SignalId {
        self.0.id
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        reactive::register_signal_read(self.0.id);
        self.0.value.borrow().clone()
    }

    /// Reads the value by reference; counts as a tracked read.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        reactive::register_signal_read(self.0.id);
        f(&*self.0.value.borrow())
    }

    /// Reads the value without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.0.value.borrow())
    }

    pub fn set(&self, v: T) {
        *self.0.value.borrow_mut() = v;
        self.notify();
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut *self.0.value.borrow_mut());
        self.notify();
        out
    }

    /// Mutates in place and notifies only when `f` reports a change.
    pub fn update_if<F: FnOnce(&mut T) -> bool>(&self, f: F) -> bool {
        let changed = f(&mut *self.0.value.borrow_mut());
        if changed {
            self.notify();
        }
        changed
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.subs.borrow_mut().insert(Rc::new(f))
    }

    /// Removing an unknown or already removed subscription is a no-op.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.subs.borrow_mut().remove(id).is_some()
    }

    fn notify(&self) {
        // Snapshot so subscribers can (un)subscribe while being notified.
        let subs: Vec<Subscriber<T>> = self.0.subs.borrow().values().cloned().collect();
        if !subs.is_empty() {
            let value = self.0.value.borrow();
            for s in &subs {
                s(&*value);
            }
        }
        reactive::signal_changed(self.0.id);
    }
}

impl<T: PartialEq> Signal<T> {
    /// Writes and notifies only if the value differs.
    pub fn set_if_changed(&self, v: T) -> bool {
        self.update_if(|cur| {
            if *cur == v {
                false
            } else {
                *cur = v;
                true
            }
        })
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
