//! Sources for the operating system's light/dark setting.

use hearth_core::{Dispose, Signal};

use crate::ResolvedTheme;

/// Observable system color scheme.
pub trait SystemSignal {
    fn current(&self) -> ResolvedTheme;

    /// `on_change` runs on every change until the returned guard is run.
    fn subscribe(&self, on_change: Box<dyn Fn(ResolvedTheme)>) -> Dispose;
}

/// System signal fed by the host (or a test). Clones share state.
#[derive(Clone, Debug)]
pub struct ManualSystemSignal(Signal<ResolvedTheme>);

impl Default for ManualSystemSignal {
    fn default() -> Self {
        Self::new(ResolvedTheme::Light)
    }
}

impl ManualSystemSignal {
    pub fn new(initial: ResolvedTheme) -> Self {
        Self(Signal::new(initial))
    }

    /// Notifies subscribers only on an actual change.
    pub fn set(&self, mode: ResolvedTheme) {
        self.0.set_if_changed(mode);
    }
}

impl SystemSignal for ManualSystemSignal {
    fn current(&self) -> ResolvedTheme {
        self.0.with_untracked(|m| *m)
    }

    fn subscribe(&self, on_change: Box<dyn Fn(ResolvedTheme)>) -> Dispose {
        let id = self.0.subscribe(move |m| on_change(*m));
        let signal = self.0.clone();
        Dispose::new(move || {
            signal.unsubscribe(id);
        })
    }
}

#[cfg(feature = "system-theme")]
pub use detected::DetectedSystemSignal;

#[cfg(feature = "system-theme")]
mod detected {
    use super::*;

    /// Reads the desktop setting through `dark-light`. The OS gives no push
    /// notification here, so the host loop calls [`refresh`](Self::refresh)
    /// (e.g. on window focus) to pick up changes.
    #[derive(Clone, Debug)]
    pub struct DetectedSystemSignal(ManualSystemSignal);

    impl Default for DetectedSystemSignal {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DetectedSystemSignal {
        pub fn new() -> Self {
            Self(ManualSystemSignal::new(detect()))
        }

        pub fn refresh(&self) {
            self.0.set(detect());
        }
    }

    fn detect() -> ResolvedTheme {
        match dark_light::detect() {
            Ok(dark_light::Mode::Dark) => ResolvedTheme::Dark,
            Ok(_) => ResolvedTheme::Light,
            Err(e) => {
                log::debug!("system theme detection failed, assuming light: {e}");
                ResolvedTheme::Light
            }
        }
    }

    impl SystemSignal for DetectedSystemSignal {
        fn current(&self) -> ResolvedTheme {
            self.0.current()
        }

        fn subscribe(&self, on_change: Box<dyn Fn(ResolvedTheme)>) -> Dispose {
            self.0.subscribe(on_change)
        }
    }
}
