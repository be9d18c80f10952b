//! Where the resolved theme gets mirrored for the renderer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ResolvedTheme;
use crate::error::ThemeError;

/// Receives presentation updates. Failures are logged by the caller and
/// otherwise ignored.
pub trait PresentationSink {
    /// Document-level theme attribute and color scheme.
    fn apply_mode(&self, mode: ResolvedTheme) -> Result<(), ThemeError>;

    /// Hint for browser chrome / window decorations, e.g. `#0f172a`.
    fn set_content_color(&self, color: &str) -> Result<(), ThemeError>;

    /// Cookie mirroring the preference so a server can seed the first paint.
    fn set_cookie(&self, _cookie: &str) -> Result<(), ThemeError> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl PresentationSink for NullPresentation {
    fn apply_mode(&self, _mode: ResolvedTheme) -> Result<(), ThemeError> {
        Ok(())
    }

    fn set_content_color(&self, _color: &str) -> Result<(), ThemeError> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationEvent {
    Mode(ResolvedTheme),
    ContentColor(String),
    Cookie(String),
}

/// Keeps every update, for inspection. Clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation(Rc<RefCell<Vec<PresentationEvent>>>);

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresentationEvent> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<PresentationEvent> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn last_mode(&self) -> Option<ResolvedTheme> {
        self.0.borrow().iter().rev().find_map(|e| match e {
            PresentationEvent::Mode(m) => Some(*m),
            _ => None,
        })
    }
}

impl PresentationSink for RecordingPresentation {
    fn apply_mode(&self, mode: ResolvedTheme) -> Result<(), ThemeError> {
        self.0.borrow_mut().push(PresentationEvent::Mode(mode));
        Ok(())
    }

    fn set_content_color(&self, color: &str) -> Result<(), ThemeError> {
        self.0
            .borrow_mut()
            .push(PresentationEvent::ContentColor(color.to_string()));
        Ok(())
    }

    fn set_cookie(&self, cookie: &str) -> Result<(), ThemeError> {
        self.0
            .borrow_mut()
            .push(PresentationEvent::Cookie(cookie.to_string()));
        Ok(())
    }
}
