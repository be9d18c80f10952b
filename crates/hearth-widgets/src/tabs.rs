//! Tabs: ordered registration plus one active tab.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hearth_core::{
    Context, ContextError, Signal, SignalVec, expect_context, try_context, untracked,
};
use serde::{Deserialize, Serialize};

/// Affects keyboard navigation in the tab list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

pub type TabChangeCallback = Rc<dyn Fn(&str)>;

#[derive(Clone, Default)]
pub struct TabsOptions {
    /// Becomes active as soon as it registers, until the user picks a tab.
    pub default_tab: Option<String>,
    pub orientation: Orientation,
    pub on_tab_change: Option<TabChangeCallback>,
}

impl fmt::Debug for TabsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabsOptions")
            .field("default_tab", &self.default_tab)
            .field("orientation", &self.orientation)
            .field("on_tab_change", &self.on_tab_change.is_some())
            .finish()
    }
}

struct TabsInner {
    tab_ids: SignalVec<String>,
    active: Signal<Option<String>>,
    orientation: Orientation,
    pending_default: RefCell<Option<String>>,
    on_tab_change: Option<TabChangeCallback>,
}

#[derive(Clone)]
pub struct TabsContext(Rc<TabsInner>);

impl fmt::Debug for TabsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabsContext")
            .field("tab_ids", &self.0.tab_ids)
            .field("active", &self.0.active)
            .field("orientation", &self.0.orientation)
            .finish()
    }
}

impl TabsContext {
    pub fn new(options: TabsOptions) -> Self {
        let TabsOptions {
            default_tab,
            orientation,
            on_tab_change,
        } = options;
        Self(Rc::new(TabsInner {
            tab_ids: SignalVec::new(),
            active: Signal::new(None),
            orientation,
            pending_default: RefCell::new(default_tab.filter(|id| !id.is_empty())),
            on_tab_change,
        }))
    }

    pub fn active_tab_id(&self) -> Option<String> {
        self.0.active.get()
    }

    pub fn orientation(&self) -> Orientation {
        self.0.orientation
    }

    /// Registered ids in registration order.
    pub fn tab_ids(&self) -> Vec<String> {
        self.0.tab_ids.snapshot()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.0.active.with(|a| a.as_deref() == Some(id))
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.0.tab_ids.with(|ids| ids.iter().any(|t| t == id))
    }

    /// Called when a tab mounts. Duplicates are ignored.
    pub fn register_tab(&self, id: &str) {
        if self.is_registered(id) {
            if cfg!(debug_assertions) {
                log::warn!("[Tabs] Duplicate tab id \"{id}\" ignored.");
            }
            return;
        }
        // push first: the new id must be registered before it can be active
        self.0.tab_ids.push(id.to_string());

        let is_default = self.0.pending_default.borrow().as_deref() == Some(id);
        if is_default {
            self.0.pending_default.borrow_mut().take();
            self.0.active.set_if_changed(Some(id.to_string()));
        } else if self.0.active.with_untracked(Option::is_none) {
            self.0.active.set(Some(id.to_string()));
        }
    }

    /// Called when a tab unmounts. Losing the active tab selects the first
    /// remaining one.
    ///
    /// `active` moves off `id` before the list shrinks, so observers never
    /// see an active id that is not registered.
    pub fn unregister_tab(&self, id: &str) {
        if !untracked(|| self.is_registered(id)) {
            return;
        }
        let was_active = self.0.active.with_untracked(|a| a.as_deref() == Some(id));
        if was_active {
            let next = self
                .0
                .tab_ids
                .signal()
                .with_untracked(|ids| ids.iter().find(|t| *t != id).cloned());
            log::debug!("[Tabs] active tab {id} removed, falling back to {next:?}");
            self.0.active.set(next);
        }
        self.0.tab_ids.retain(|t| t != id);
    }

    /// Activates a registered tab and reports the change.
    pub fn set_active_tab(&self, id: &str) {
        if !self.is_registered(id) || self.is_active(id) {
            return;
        }
        // an explicit choice overrides a default that has not registered yet
        self.0.pending_default.borrow_mut().take();
        self.0.active.set(Some(id.to_string()));
        if let Some(cb) = &self.0.on_tab_change {
            cb(id);
        }
    }
}

impl Context for TabsContext {
    const NAME: &'static str = "Tabs";
    const PROVIDER: &'static str = "<Tabs> container";
}

pub fn create_tabs_context(options: TabsOptions) -> TabsContext {
    TabsContext::new(options)
}

#[track_caller]
pub fn tabs_context() -> TabsContext {
    expect_context::<TabsContext>()
}

pub fn try_tabs_context() -> Result<TabsContext, ContextError> {
    try_context::<TabsContext>()
}
