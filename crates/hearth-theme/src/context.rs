//! Theme resolver: preference + system mode + optional override.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use hearth_core::{
    Context, ContextError, Derived, Dispose, Lifecycle, Signal, expect_context, has_context,
    mount, observe, remove_observer, try_context, untracked,
};
use hearth_core::reactive::ObserverId;

use crate::colors::{ThemeColors, palette};
use crate::presentation::{NullPresentation, PresentationSink};
use crate::server::{PREFERENCE_KEY, preference_cookie};
use crate::store::{MemoryStore, PreferenceStore};
use crate::system::{ManualSystemSignal, SystemSignal};
use crate::{ResolvedTheme, ThemePreference};

/// Overrides the resolved mode. While active, nothing is persisted or
/// applied.
#[derive(Clone, Debug)]
pub enum ForcedTheme {
    Fixed(ResolvedTheme),
    /// Forced while the signal holds `Some`.
    Dynamic(Signal<Option<ResolvedTheme>>),
}

impl ForcedTheme {
    fn get(&self) -> Option<ResolvedTheme> {
        match self {
            ForcedTheme::Fixed(mode) => Some(*mode),
            ForcedTheme::Dynamic(sig) => sig.get(),
        }
    }
}

impl From<ResolvedTheme> for ForcedTheme {
    fn from(mode: ResolvedTheme) -> Self {
        ForcedTheme::Fixed(mode)
    }
}

/// Collaborators the resolver talks to.
#[derive(Clone)]
pub struct ThemeServices {
    pub store: Rc<dyn PreferenceStore>,
    pub system: Rc<dyn SystemSignal>,
    pub presentation: Rc<dyn PresentationSink>,
}

impl Default for ThemeServices {
    fn default() -> Self {
        Self {
            store: Rc::new(MemoryStore::new()),
            system: Rc::new(ManualSystemSignal::default()),
            presentation: Rc::new(NullPresentation),
        }
    }
}

impl ThemeServices {
    pub fn with_store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Rc::new(store);
        self
    }

    pub fn with_system(mut self, system: impl SystemSignal + 'static) -> Self {
        self.system = Rc::new(system);
        self
    }

    pub fn with_presentation(mut self, presentation: impl PresentationSink + 'static) -> Self {
        self.presentation = Rc::new(presentation);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ThemeOptions {
    pub forced: Option<ForcedTheme>,
}

#[derive(Default)]
struct Applied {
    preference: Option<ThemePreference>,
    mode: Option<ResolvedTheme>,
}

struct ThemeInner {
    preference: Signal<ThemePreference>,
    system_mode: Signal<ResolvedTheme>,
    forced: Option<ForcedTheme>,
    mode: Derived<ResolvedTheme>,
    services: ThemeServices,
    subscription: RefCell<Option<Dispose>>,
    observer: Cell<Option<ObserverId>>,
    applied: RefCell<Applied>,
}

impl ThemeInner {
    fn forced_mode(&self) -> Option<ResolvedTheme> {
        self.forced.as_ref().and_then(ForcedTheme::get)
    }

    /// Mirrors the current state to storage and presentation. Runs under an
    /// observer, so every signal read here re-triggers it.
    fn sync(&self) {
        let mode = self.mode.get();
        let preference = self.preference.get();
        if self.forced_mode().is_some() {
            return;
        }
        untracked(|| {
            let mut applied = self.applied.borrow_mut();
            if applied.preference != Some(preference) {
                applied.preference = Some(preference);
                self.persist(preference);
            }
            if applied.mode != Some(mode) {
                applied.mode = Some(mode);
                self.present(mode);
            }
        });
    }

    fn persist(&self, preference: ThemePreference) {
        log::debug!("theme: persisting preference {preference}");
        if let Err(e) = self.services.store.write(PREFERENCE_KEY, preference.as_str()) {
            log::warn!("theme: could not store preference: {e}");
        }
        let cookie = preference_cookie(preference);
        if let Err(e) = self.services.presentation.set_cookie(&cookie) {
            log::warn!("theme: could not set preference cookie: {e}");
        }
    }

    fn present(&self, mode: ResolvedTheme) {
        log::debug!("theme: applying {mode} mode");
        let presentation = &self.services.presentation;
        if let Err(e) = presentation.apply_mode(mode) {
            log::warn!("theme: could not apply mode: {e}");
        }
        if let Err(e) = presentation.set_content_color(&palette(mode).background.to_hex()) {
            log::warn!("theme: could not set content color: {e}");
        }
    }

    fn teardown(&self) {
        if let Some(id) = self.observer.take() {
            remove_observer(id);
        }
        if let Some(sub) = self.subscription.borrow_mut().take() {
            sub.run();
        }
    }
}

impl Drop for ThemeInner {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Shared theme state. Clones are handles to the same resolver.
#[derive(Clone)]
pub struct ThemeContext(Rc<ThemeInner>);

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("preference", &self.preference())
            .field("mode", &self.mode())
            .field("forced", &self.is_forced())
            .finish()
    }
}

impl ThemeContext {
    /// Loads the stored preference (falling back to `system` when absent or
    /// unparseable). Nothing is observed or applied until activation.
    pub fn new(options: ThemeOptions, services: ThemeServices) -> Self {
        let preference = match services.store.read(PREFERENCE_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::debug!("theme: {e}, following system");
                ThemePreference::System
            }),
            None => ThemePreference::System,
        };
        let preference = Signal::new(preference);
        let system_mode = Signal::new(services.system.current());
        let forced = options.forced;

        let mode = {
            let preference = preference.clone();
            let system_mode = system_mode.clone();
            let forced = forced.clone();
            Derived::new(move || {
                if let Some(mode) = forced.as_ref().and_then(ForcedTheme::get) {
                    return mode;
                }
                match preference.get() {
                    ThemePreference::System => system_mode.get(),
                    explicit => explicit.resolve(ResolvedTheme::Light),
                }
            })
        };

        Self(Rc::new(ThemeInner {
            preference,
            system_mode,
            forced,
            mode,
            services,
            subscription: RefCell::new(None),
            observer: Cell::new(None),
            applied: RefCell::new(Applied::default()),
        }))
    }

    pub fn mode(&self) -> ResolvedTheme {
        self.0.mode.get()
    }

    pub fn preference(&self) -> ThemePreference {
        self.0.preference.get()
    }

    /// Last known system mode.
    pub fn system_mode(&self) -> ResolvedTheme {
        self.0.system_mode.get()
    }

    pub fn is_dark(&self) -> bool {
        self.mode().is_dark()
    }

    pub fn is_light(&self) -> bool {
        !self.is_dark()
    }

    pub fn is_system(&self) -> bool {
        self.preference() == ThemePreference::System
    }

    pub fn is_forced(&self) -> bool {
        self.0.forced_mode().is_some()
    }

    pub fn colors(&self) -> &'static ThemeColors {
        palette(self.mode())
    }

    pub fn preference_signal(&self) -> Signal<ThemePreference> {
        self.0.preference.clone()
    }

    pub fn set_preference(&self, preference: ThemePreference) {
        self.0.preference.set_if_changed(preference);
    }

    /// From `system`, pins the opposite of what is showing; otherwise flips
    /// between light and dark.
    pub fn toggle(&self) {
        let next = match untracked(|| self.preference()) {
            ThemePreference::System => untracked(|| self.mode()).opposite().into(),
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        };
        self.set_preference(next);
    }

    /// Back to following the system.
    pub fn reset(&self) {
        self.set_preference(ThemePreference::System);
    }
}

impl Lifecycle for ThemeContext {
    fn activate(&self) {
        if self.0.observer.get().is_some() {
            return;
        }
        let inner = &self.0;
        inner.system_mode.set_if_changed(inner.services.system.current());

        let weak: Weak<ThemeInner> = Rc::downgrade(inner);
        let sub = inner.services.system.subscribe(Box::new(move |mode| {
            if let Some(inner) = weak.upgrade() {
                log::debug!("theme: system switched to {mode}");
                inner.system_mode.set_if_changed(mode);
            }
        }));
        *inner.subscription.borrow_mut() = Some(sub);

        let weak = Rc::downgrade(inner);
        let id = observe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.sync();
            }
        });
        inner.observer.set(Some(id));
    }

    fn deactivate(&self) {
        self.0.teardown();
    }
}

impl Context for ThemeContext {
    const NAME: &'static str = "Theme";
    const PROVIDER: &'static str = "<ThemeProvider>";
}

/// Creates a resolver, starts syncing, and ties teardown to the current
/// scope.
pub fn create_theme_context(options: ThemeOptions, services: ThemeServices) -> ThemeContext {
    let ctx = ThemeContext::new(options, services);
    let _: Dispose = mount(&ctx);
    ctx
}

#[track_caller]
pub fn theme_context() -> ThemeContext {
    expect_context::<ThemeContext>()
}

pub fn try_theme_context() -> Result<ThemeContext, ContextError> {
    try_context::<ThemeContext>()
}

/// Whether a theme provider is above the caller.
pub fn has_theme_context() -> bool {
    has_context::<ThemeContext>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThemeError;
    use crate::presentation::{PresentationEvent, RecordingPresentation};

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn read(&self, _name: &str) -> Option<String> {
            None
        }

        fn write(&self, _name: &str, _value: &str) -> Result<(), ThemeError> {
            Err(ThemeError::NoConfigDir)
        }
    }

    /// Rejects every update, like a detached document.
    struct FailingPresentation;

    impl PresentationSink for FailingPresentation {
        fn apply_mode(&self, mode: ResolvedTheme) -> Result<(), ThemeError> {
            Err(ThemeError::Presentation(format!("cannot apply {mode}")))
        }

        fn set_content_color(&self, _color: &str) -> Result<(), ThemeError> {
            Err(ThemeError::Presentation("no meta tag".into()))
        }

        fn set_cookie(&self, _cookie: &str) -> Result<(), ThemeError> {
            Err(ThemeError::Presentation("cookies disabled".into()))
        }
    }

    fn setup(
        stored: Option<&str>,
        system: ResolvedTheme,
    ) -> (ThemeContext, MemoryStore, ManualSystemSignal, RecordingPresentation) {
        let store = match stored {
            Some(v) => MemoryStore::with_value(PREFERENCE_KEY, v),
            None => MemoryStore::new(),
        };
        let signal = ManualSystemSignal::new(system);
        let rec = RecordingPresentation::new();
        let services = ThemeServices::default()
            .with_store(store.clone())
            .with_system(signal.clone())
            .with_presentation(rec.clone());
        let ctx = create_theme_context(ThemeOptions::default(), services);
        (ctx, store, signal, rec)
    }

    #[test]
    fn follows_system_then_toggle_then_reset() {
        let (theme, store, _sys, _rec) = setup(None, ResolvedTheme::Dark);
        assert_eq!(theme.preference(), ThemePreference::System);
        assert_eq!(theme.mode(), ResolvedTheme::Dark);

        theme.toggle();
        assert_eq!(theme.preference(), ThemePreference::Light);
        assert_eq!(theme.mode(), ResolvedTheme::Light);
        assert_eq!(store.read(PREFERENCE_KEY).as_deref(), Some("light"));

        theme.toggle();
        assert_eq!(theme.preference(), ThemePreference::Dark);

        theme.reset();
        assert!(theme.is_system());
        assert_eq!(store.read(PREFERENCE_KEY).as_deref(), Some("system"));
    }

    #[test]
    fn loads_stored_preference_and_ignores_garbage() {
        let (theme, ..) = setup(Some("dark"), ResolvedTheme::Light);
        assert_eq!(theme.preference(), ThemePreference::Dark);
        assert!(theme.is_dark());

        let (theme, ..) = setup(Some("sepia"), ResolvedTheme::Light);
        assert_eq!(theme.preference(), ThemePreference::System);
        assert!(theme.is_light());
    }

    #[test]
    fn activation_applies_mode_color_and_cookie() {
        let (_theme, _store, _sys, rec) = setup(None, ResolvedTheme::Dark);
        assert_eq!(
            rec.events(),
            vec![
                PresentationEvent::Cookie(
                    "theme-preference=system;path=/;max-age=31536000;SameSite=Lax".into()
                ),
                PresentationEvent::Mode(ResolvedTheme::Dark),
                PresentationEvent::ContentColor(crate::colors::DARK.background.to_hex()),
            ]
        );
    }

    #[test]
    fn system_change_reapplies_only_when_following_system() {
        let (theme, _store, sys, rec) = setup(None, ResolvedTheme::Light);
        rec.take();

        sys.set(ResolvedTheme::Dark);
        assert!(theme.is_dark());
        assert_eq!(rec.last_mode(), Some(ResolvedTheme::Dark));
        // preference did not change, so no cookie rewrite
        assert!(
            !rec.events()
                .iter()
                .any(|e| matches!(e, PresentationEvent::Cookie(_)))
        );

        theme.set_preference(ThemePreference::Dark);
        rec.take();
        sys.set(ResolvedTheme::Light);
        assert!(theme.is_dark());
        assert!(rec.events().is_empty());
    }

    #[test]
    fn forced_mode_wins_and_skips_side_effects() {
        let store = MemoryStore::new();
        let rec = RecordingPresentation::new();
        let services = ThemeServices::default()
            .with_store(store.clone())
            .with_presentation(rec.clone());
        let theme = create_theme_context(
            ThemeOptions {
                forced: Some(ResolvedTheme::Dark.into()),
            },
            services,
        );

        assert!(theme.is_forced());
        assert!(theme.is_dark());
        theme.set_preference(ThemePreference::Light);
        assert!(theme.is_dark());
        assert!(rec.events().is_empty());
        assert_eq!(store.read(PREFERENCE_KEY), None);
    }

    #[test]
    fn dynamic_override_releases_back_to_preference() {
        let forced = Signal::new(Some(ResolvedTheme::Light));
        let rec = RecordingPresentation::new();
        let services = ThemeServices::default()
            .with_system(ManualSystemSignal::new(ResolvedTheme::Dark))
            .with_presentation(rec.clone());
        let theme = create_theme_context(
            ThemeOptions {
                forced: Some(ForcedTheme::Dynamic(forced.clone())),
            },
            services,
        );
        assert!(theme.is_light());
        assert!(rec.events().is_empty());

        forced.set(None);
        assert!(!theme.is_forced());
        assert!(theme.is_dark());
        assert_eq!(rec.last_mode(), Some(ResolvedTheme::Dark));
    }

    #[test]
    fn store_failure_is_swallowed() {
        let rec = RecordingPresentation::new();
        let services = ThemeServices::default()
            .with_store(FailingStore)
            .with_presentation(rec.clone());
        let theme = create_theme_context(ThemeOptions::default(), services);

        theme.set_preference(ThemePreference::Dark);
        assert!(theme.is_dark());
        assert_eq!(rec.last_mode(), Some(ResolvedTheme::Dark));
    }

    #[test]
    fn presentation_failure_is_swallowed() {
        let store = MemoryStore::new();
        let services = ThemeServices::default()
            .with_store(store.clone())
            .with_presentation(FailingPresentation);
        let theme = create_theme_context(ThemeOptions::default(), services);

        theme.toggle();
        assert_eq!(theme.preference(), ThemePreference::Dark);
        assert!(theme.is_dark());
        assert_eq!(store.read(PREFERENCE_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn deactivate_unsubscribes_from_system() {
        let (theme, _store, sys, rec) = setup(None, ResolvedTheme::Light);
        theme.deactivate();
        theme.deactivate();
        rec.take();

        sys.set(ResolvedTheme::Dark);
        assert_eq!(theme.system_mode(), ResolvedTheme::Light);
        theme.set_preference(ThemePreference::Dark);
        assert!(rec.events().is_empty());
    }

    #[test]
    fn colors_track_mode() {
        let (theme, ..) = setup(Some("light"), ResolvedTheme::Dark);
        assert_eq!(theme.colors(), &crate::colors::LIGHT);
        theme.toggle();
        assert_eq!(theme.colors(), &crate::colors::DARK);
    }
}
