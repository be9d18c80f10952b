//! Accordion: which items are expanded, optionally at most one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hearth_core::{Context, ContextError, SignalSet, expect_context, try_context};

pub type ExpandedChangeCallback = Rc<dyn Fn(&[String])>;

#[derive(Clone, Default)]
pub struct AccordionOptions {
    /// Allow only one item open at a time.
    pub single: bool,
    pub default_expanded: Vec<String>,
    /// Receives the full expanded list after every change.
    pub on_expanded_change: Option<ExpandedChangeCallback>,
}

impl fmt::Debug for AccordionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccordionOptions")
            .field("single", &self.single)
            .field("default_expanded", &self.default_expanded)
            .field("on_expanded_change", &self.on_expanded_change.is_some())
            .finish()
    }
}

struct AccordionInner {
    expanded: SignalSet<String>,
    single: Cell<bool>,
    on_change: RefCell<Option<ExpandedChangeCallback>>,
}

#[derive(Clone)]
pub struct AccordionContext(Rc<AccordionInner>);

impl fmt::Debug for AccordionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccordionContext")
            .field("expanded", &self.0.expanded)
            .field("single", &self.0.single.get())
            .finish()
    }
}

impl AccordionContext {
    pub fn new(options: AccordionOptions) -> Self {
        let AccordionOptions {
            single,
            default_expanded,
            on_expanded_change,
        } = options;
        let mut initial = default_expanded;
        if single && initial.len() > 1 {
            // latest wins, same as a sequence of expand() calls
            initial.drain(..initial.len() - 1);
        }
        Self(Rc::new(AccordionInner {
            expanded: SignalSet::from_iter_dedup(initial),
            single: Cell::new(single),
            on_change: RefCell::new(on_expanded_change),
        }))
    }

    /// Expanded ids in the order they were opened.
    pub fn expanded_ids(&self) -> Vec<String> {
        self.0.expanded.snapshot()
    }

    pub fn is_single(&self) -> bool {
        self.0.single.get()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.0
            .expanded
            .signal()
            .with(|ids| ids.iter().any(|e| e == id))
    }

    pub fn toggle(&self, id: &str) {
        if self.is_expanded(id) {
            self.collapse(id);
        } else {
            self.expand(id);
        }
    }

    /// Reports the expanded list to the change callback, even when `id` was
    /// already open.
    pub fn expand(&self, id: &str) {
        if self.0.single.get() {
            self.0.expanded.replace_with(|ids| {
                if ids.len() == 1 && ids[0] == id {
                    return false;
                }
                ids.clear();
                ids.push(id.to_string());
                true
            });
        } else {
            self.0.expanded.insert(id.to_string());
        }
        self.notify_change();
    }

    pub fn collapse(&self, id: &str) {
        self.0.expanded.remove(&id.to_string());
        self.notify_change();
    }

    pub fn collapse_all(&self) {
        self.0.expanded.clear();
        self.notify_change();
    }

    /// Switching to single mode keeps only the most recently expanded item.
    /// The callback runs only if something had to be closed.
    pub fn set_single(&self, single: bool) {
        self.0.single.set(single);
        if !single {
            return;
        }
        let changed = self.0.expanded.replace_with(|ids| {
            if ids.len() <= 1 {
                return false;
            }
            ids.drain(..ids.len() - 1);
            true
        });
        if changed {
            self.notify_change();
        }
    }

    pub fn set_on_expanded_change(&self, callback: Option<ExpandedChangeCallback>) {
        *self.0.on_change.borrow_mut() = callback;
    }

    fn notify_change(&self) {
        // clone out so the callback may replace itself
        let callback = self.0.on_change.borrow().clone();
        if let Some(cb) = callback {
            let snapshot = self.0.expanded.signal().with_untracked(Vec::clone);
            cb(&snapshot);
        }
    }
}

impl Context for AccordionContext {
    const NAME: &'static str = "Accordion";
    const PROVIDER: &'static str = "<Accordion> container";
}

pub fn create_accordion_context(options: AccordionOptions) -> AccordionContext {
    AccordionContext::new(options)
}

#[track_caller]
pub fn accordion_context() -> AccordionContext {
    expect_context::<AccordionContext>()
}

pub fn try_accordion_context() -> Result<AccordionContext, ContextError> {
    try_context::<AccordionContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_log(single: bool) -> (AccordionContext, Rc<RefCell<Vec<Vec<String>>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let ctx = AccordionContext::new(AccordionOptions {
            single,
            on_expanded_change: Some(Rc::new(move |ids: &[String]| {
                l.borrow_mut().push(ids.to_vec())
            })),
            ..AccordionOptions::default()
        });
        (ctx, log)
    }

    #[test]
    fn multi_mode_keeps_everything_open() {
        let (acc, _) = with_log(false);
        acc.expand("a");
        acc.expand("b");
        assert_eq!(acc.expanded_ids(), vec!["a", "b"]);
    }

    #[test]
    fn single_mode_never_exceeds_one() {
        let (acc, _) = with_log(true);
        for id in ["a", "b", "c", "b", "a"] {
            acc.expand(id);
            assert!(acc.expanded_ids().len() <= 1);
        }
        assert_eq!(acc.expanded_ids(), vec!["a"]);
    }

    #[test]
    fn toggle_flips_state() {
        let (acc, log) = with_log(false);
        acc.toggle("x");
        assert!(acc.is_expanded("x"));
        acc.toggle("x");
        assert!(!acc.is_expanded("x"));
        assert_eq!(*log.borrow(), vec![vec!["x".to_string()], vec![]]);
    }

    #[test]
    fn callback_gets_snapshot_of_full_list() {
        let (acc, log) = with_log(false);
        acc.expand("a");
        acc.expand("b");
        acc.collapse("a");
        acc.collapse_all();
        let expected: Vec<Vec<String>> = vec![
            vec!["a".into()],
            vec!["a".into(), "b".into()],
            vec!["b".into()],
            vec![],
        ];
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn every_mutation_calls_back_even_without_change() {
        let (acc, log) = with_log(false);
        acc.collapse("nothing");
        acc.collapse_all();
        acc.expand("a");
        acc.expand("a");
        let expected: Vec<Vec<String>> = vec![vec![], vec![], vec!["a".into()], vec!["a".into()]];
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn set_single_without_trimming_is_silent() {
        let (acc, log) = with_log(false);
        acc.expand("a");
        acc.set_single(true);
        acc.set_single(false);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn creation_does_not_call_back() {
        let log = Rc::new(RefCell::new(0));
        let l = log.clone();
        let acc = AccordionContext::new(AccordionOptions {
            single: false,
            default_expanded: vec!["a".into(), "b".into(), "a".into()],
            on_expanded_change: Some(Rc::new(move |_: &[String]| *l.borrow_mut() += 1)),
        });
        assert_eq!(acc.expanded_ids(), vec!["a", "b"]);
        assert_eq!(*log.borrow(), 0);
    }

    #[test]
    fn single_mode_trims_defaults() {
        let acc = AccordionContext::new(AccordionOptions {
            single: true,
            default_expanded: vec!["a".into(), "b".into()],
            ..AccordionOptions::default()
        });
        assert_eq!(acc.expanded_ids(), vec!["b"]);
    }

    #[test]
    fn enabling_single_mode_keeps_latest() {
        let (acc, log) = with_log(false);
        acc.expand("a");
        acc.expand("b");
        acc.expand("c");
        acc.set_single(true);
        assert!(acc.is_single());
        assert_eq!(acc.expanded_ids(), vec!["c"]);
        assert_eq!(log.borrow().last().cloned(), Some(vec!["c".to_string()]));
    }

    #[test]
    fn callback_can_be_replaced() {
        let (acc, log) = with_log(false);
        acc.set_on_expanded_change(None);
        acc.expand("a");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn consumers_find_the_provider() {
        let acc = create_accordion_context(AccordionOptions::default());
        acc.clone().provide(|| accordion_context().expand("panel"));
        assert!(acc.is_expanded("panel"));
        assert!(try_accordion_context().is_err());
    }
}
