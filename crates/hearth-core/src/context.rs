//! # Contexts
//!
//! A provider makes a value visible to everything composed inside it; a
//! consumer looks it up by type. Frames live on a thread-local stack, the
//! same way composition locals do:
//!
//! ```rust
//! use hearth_core::*;
//!
//! #[derive(Clone)]
//! struct Greeting(&'static str);
//!
//! impl Context for Greeting {
//!     const NAME: &'static str = "Greeting";
//!     const PROVIDER: &'static str = "<Greeter>";
//! }
//!
//! provide_context(Greeting("hi"), || {
//!     assert_eq!(expect_context::<Greeting>().0, "hi");
//! });
//! assert!(try_context::<Greeting>().is_err());
//! ```
//!
//! The nearest frame wins, so nested providers shadow outer ones. Every
//! context is also a plain cloneable handle, so passing it down explicitly
//! works just as well.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::ContextError;

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
}

/// A value that providers register and consumers look up.
///
/// The Rust type is the registry key, so two concerns can never collide.
pub trait Context: Clone + 'static {
    /// Shown in the missing-provider error, e.g. `"Tabs"`.
    const NAME: &'static str;
    /// What the consumer must be nested in, e.g. `"<Tabs> container"`.
    const PROVIDER: &'static str;

    /// Makes `self` visible to `f` and everything it composes.
    fn provide<R>(self, f: impl FnOnce() -> R) -> R {
        provide_context(self, f)
    }
}

fn with_context_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            CONTEXT_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    CONTEXT_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_context_boxed(t: TypeId, v: Box<dyn Any>) {
    CONTEXT_STACK.with(|st| {
        let mut st = st.borrow_mut();
        match st.last_mut() {
            Some(top) => {
                top.insert(t, v);
            }
            // nothing would ever pop a frame pushed here
            None => log::warn!("context inserted outside of any provider frame; dropped"),
        }
    });
}

/// Runs `f` with `value` registered for its duration.
pub fn provide_context<T: 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_context_frame(|| {
        set_context_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

/// Registers several values in one frame. `install` calls [`insert_context`]
/// for each of them.
pub fn provide_contexts<R>(install: impl FnOnce(), f: impl FnOnce() -> R) -> R {
    with_context_frame(|| {
        install();
        f()
    })
}

/// Adds `value` to the innermost frame. Outside every provider the value is
/// dropped, so lookups there keep failing.
pub fn insert_context<T: 'static>(value: T) {
    set_context_boxed(TypeId::of::<T>(), Box::new(value));
}

pub fn use_context<T: Clone + 'static>() -> Option<T> {
    CONTEXT_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return Some(t.clone());
            }
        }
        None
    })
}

pub fn has_context<T: 'static>() -> bool {
    CONTEXT_STACK.with(|st| {
        st.borrow()
            .iter()
            .any(|frame| frame.contains_key(&TypeId::of::<T>()))
    })
}

pub fn try_context<T: Context>() -> Result<T, ContextError> {
    use_context::<T>().ok_or(ContextError::Missing {
        context: T::NAME,
        provider: T::PROVIDER,
    })
}

/// Like [`try_context`], but a missing provider is a programmer error.
#[track_caller]
pub fn expect_context<T: Context>() -> T {
    match try_context::<T>() {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}
