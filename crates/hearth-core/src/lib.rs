//! # Signals, scopes, and contexts
//!
//! `hearth-core` is the small reactive runtime the hearth widget contexts are
//! built on. There are four main pieces:
//!
//! - `Signal<T>`, `SignalVec<T>`, `SignalSet<T>`: observable state.
//! - `observe`: re-runs a closure whenever a signal it read changes.
//! - `Scope` / `Dispose` / `mount`: lifecycle with guaranteed cleanup.
//! - `provide_context` / `expect_context`: typed, subtree-scoped lookup.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use hearth_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Reads participate in a dependency graph: when you call `get()` inside an
//! observer, future writes re-run that observer.
//!
//! ```rust
//! use hearth_core::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let name = signal("Jane".to_string());
//! let runs = Rc::new(Cell::new(0));
//! let obs = observe({
//!     let (name, runs) = (name.clone(), runs.clone());
//!     move || {
//!         let _ = name.get();
//!         runs.set(runs.get() + 1);
//!     }
//! });
//! name.set("Joe".into());
//! assert_eq!(runs.get(), 2);
//! remove_observer(obs);
//! ```
//!
//! ## Lifecycle
//!
//! State that owns timers or subscriptions implements [`Lifecycle`]. A
//! provider mounts it inside its `Scope`; disposing the scope deactivates it:
//!
//! ```rust
//! use hearth_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         Box::new(|| log::info!("unmounted"))
//!     });
//! });
//! scope.dispose();
//! ```
//!
//! Timers go through [`TimerService`]; the host loop polls a [`TimerQueue`],
//! and tests drive one with a [`ManualClock`].

pub mod collections;
pub mod color;
pub mod context;
pub mod effects;
pub mod error;
pub mod lifecycle;
pub mod prelude;
pub mod reactive;
pub mod scope;
pub mod signal;
pub mod state;
pub mod timer;


pub use prelude::*;
