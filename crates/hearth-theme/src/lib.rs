//! # Theme
//!
//! Resolves the light/dark mode from the user's preference, the system
//! setting, and an optional forced override, and mirrors it to a
//! [`PreferenceStore`] and a [`PresentationSink`].
//!
//! ```rust
//! use hearth_core::Context;
//! use hearth_theme::*;
//!
//! let system = ManualSystemSignal::new(ResolvedTheme::Dark);
//! let services = ThemeServices::default().with_system(system.clone());
//! let theme = create_theme_context(ThemeOptions::default(), services);
//!
//! theme.clone().provide(|| {
//!     assert!(theme_context().is_dark());
//!     theme_context().toggle();
//! });
//! assert_eq!(theme.preference(), ThemePreference::Light);
//! ```
//!
//! The [`server`] module seeds `data-theme` into HTML before first paint.

pub mod colors;
pub mod context;
pub mod error;
pub mod presentation;
pub mod server;
pub mod store;
pub mod system;
pub mod types;

pub use colors::{DARK, LIGHT, ThemeColors, palette};
pub use context::{
    ForcedTheme, ThemeContext, ThemeOptions, ThemeServices, create_theme_context,
    has_theme_context, theme_context, try_theme_context,
};
pub use error::{ParsePreferenceError, ThemeError};
pub use presentation::{NullPresentation, PresentationEvent, PresentationSink, RecordingPresentation};
pub use server::{PREFERENCE_KEY, preference_cookie, seed_document_theme};
pub use store::{FileStore, MemoryStore, PreferenceStore};
#[cfg(feature = "system-theme")]
pub use system::DetectedSystemSignal;
pub use system::{ManualSystemSignal, SystemSignal};
pub use types::{ResolvedTheme, ThemePreference};
