use std::fmt;
use std::rc::Rc;

/// Value computed from other signals on every read.
///
/// There is no cache to invalidate: reads inside an observer track whatever
/// signals `compute` touches, so the observer re-runs when any of them change.
pub struct Derived<T: 'static> {
    compute: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            compute: self.compute.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.get()).finish()
    }
}

impl<T> Derived<T> {
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self {
            compute: Rc::new(compute),
        }
    }

    pub fn get(&self) -> T {
        (self.compute)()
    }
}

pub fn derived<T>(compute: impl Fn() -> T + 'static) -> Derived<T> {
    Derived::new(compute)
}
