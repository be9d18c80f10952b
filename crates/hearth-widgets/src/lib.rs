//! # Widget state contexts
//!
//! Each widget family keeps its shared state in a context: the provider
//! creates it with a `create_*_context` factory and makes it visible with
//! [`Context::provide`](hearth_core::Context::provide); descendants fetch it
//! with the matching `*_context()` lookup, which panics with a descriptive
//! message when no provider is above them.
//!
//! ```rust
//! use hearth_core::Context;
//! use hearth_widgets::tabs::*;
//!
//! let tabs = create_tabs_context(TabsOptions::default());
//! tabs.clone().provide(|| {
//!     // inside <Tab> components
//!     tabs_context().register_tab("general");
//!     tabs_context().register_tab("advanced");
//! });
//! assert!(tabs.is_active("general"));
//! ```
//!
//! Contexts are cheap `Clone` handles, so passing them down explicitly
//! works just as well as the lookup.

pub mod accordion;
pub mod counter;
pub mod tabs;
pub mod toast;

pub mod prelude {
    pub use crate::accordion::{
        AccordionContext, AccordionOptions, accordion_context, create_accordion_context,
    };
    pub use crate::counter::{
        CounterContext, CounterOptions, counter_context, create_counter_context,
    };
    pub use crate::tabs::{Orientation, TabsContext, TabsOptions, create_tabs_context, tabs_context};
    pub use crate::toast::{
        Toast, ToastConfig, ToastContext, ToastKind, ToastOptions, ToastPosition,
        create_toast_context, toast_context, toast_position,
    };
}
