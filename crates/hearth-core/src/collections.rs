//! Observable list and set built on [`Signal`].

use std::fmt;

use crate::Signal;

/// Observable ordered list.
pub struct SignalVec<T: 'static>(Signal<Vec<T>>);

impl<T> Clone for SignalVec<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for SignalVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.with_untracked(|v| f.debug_list().entries(v.iter()).finish())
    }
}

impl<T> Default for SignalVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SignalVec<T> {
    pub fn new() -> Self {
        Self(Signal::new(Vec::new()))
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self(Signal::new(items))
    }

    /// Underlying signal, for subscriptions.
    pub fn signal(&self) -> &Signal<Vec<T>> {
        &self.0
    }

    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.0.with(|v| f(v))
    }

    pub fn len(&self) -> usize {
        self.0.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, item: T) {
        self.0.update(|v| v.push(item));
    }

    /// Keeps items matching `keep`; notifies only if something was removed.
    pub fn retain(&self, keep: impl FnMut(&T) -> bool) -> bool {
        self.0.update_if(|v| {
            let before = v.len();
            v.retain(keep);
            v.len() != before
        })
    }

    pub fn clear(&self) -> bool {
        self.0.update_if(|v| {
            let changed = !v.is_empty();
            v.clear();
            changed
        })
    }

    /// Arbitrary in-place edit with a single notification.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        self.0.update(f)
    }

    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.0.get()
    }
}

impl<T: PartialEq> SignalVec<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.0.with(|v| v.contains(item))
    }
}

/// Observable set that remembers insertion order.
pub struct SignalSet<T: 'static>(Signal<Vec<T>>);

impl<T> Clone for SignalSet<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for SignalSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.with_untracked(|v| f.debug_set().entries(v.iter()).finish())
    }
}

impl<T: PartialEq> Default for SignalSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> SignalSet<T> {
    pub fn new() -> Self {
        Self(Signal::new(Vec::new()))
    }

    pub fn from_iter_dedup(items: impl IntoIterator<Item = T>) -> Self {
        let mut out = Vec::new();
        for item in items {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Self(Signal::new(out))
    }

    pub fn signal(&self) -> &Signal<Vec<T>> {
        &self.0
    }

    pub fn contains(&self, item: &T) -> bool {
        self.0.with(|v| v.contains(item))
    }

    pub fn len(&self) -> usize {
        self.0.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&self, item: T) -> bool {
        self.0.update_if(|v| {
            if v.contains(&item) {
                false
            } else {
                v.push(item);
                true
            }
        })
    }

    pub fn remove(&self, item: &T) -> bool {
        self.0.update_if(|v| match v.iter().position(|x| x == item) {
            Some(i) => {
                v.remove(i);
                true
            }
            None => false,
        })
    }

    pub fn clear(&self) -> bool {
        self.0.update_if(|v| {
            let changed = !v.is_empty();
            v.clear();
            changed
        })
    }

    /// In-place edit with at most one notification. `f` must keep entries
    /// unique and report whether it changed anything.
    pub fn replace_with(&self, f: impl FnOnce(&mut Vec<T>) -> bool) -> bool {
        self.0.update_if(f)
    }

    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.0.get()
    }
}
