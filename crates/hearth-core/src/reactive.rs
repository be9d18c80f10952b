use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub type SignalId = usize;
pub type ObserverId = usize;

thread_local! {
    static CURRENT_OBSERVER: RefCell<Option<ObserverId>> = const { RefCell::new(None) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
    static NEXT_SIGNAL: Cell<SignalId> = const { Cell::new(0) };
}

#[derive(Default)]
struct DepGraph {
    next_observer: ObserverId,
    // signal_id -> observers that depend on it
    edges: HashMap<SignalId, HashSet<ObserverId>>,
    // observer_id -> signals it depends on
    back: HashMap<ObserverId, HashSet<SignalId>>,
    // recompute closures
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    running: HashSet<ObserverId>,
}

impl DepGraph {
    fn remove_all_edges_for(&mut self, obs: ObserverId) {
        if let Some(signals) = self.back.remove(&obs) {
            for s in signals {
                if let Some(set) = self.edges.get_mut(&s) {
                    set.remove(&obs);
                }
            }
        }
    }

    fn remove_observer(&mut self, obs: ObserverId) {
        self.observers.remove(&obs);
        self.remove_all_edges_for(obs);
        self.running.remove(&obs);
    }
}

/// Allocates a fresh id for a new signal on this thread.
pub fn next_signal_id() -> SignalId {
    NEXT_SIGNAL.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    })
}

pub fn register_signal_read(sig: SignalId) {
    CURRENT_OBSERVER.with(|co| {
        if let Some(obs) = *co.borrow() {
            GRAPH.with(|g| {
                let mut g = g.borrow_mut();
                // a read during a run that removed this observer must not resurrect edges
                if !g.observers.contains_key(&obs) {
                    return;
                }
                g.edges.entry(sig).or_default().insert(obs);
                g.back.entry(obs).or_default().insert(sig);
            });
        }
    });
}

pub fn signal_changed(sig: SignalId) {
    let mut queue: VecDeque<ObserverId> = GRAPH.with(|g| {
        g.borrow()
            .edges
            .get(&sig)
            .map(|set| {
                let mut ids: Vec<_> = set.iter().copied().collect();
                ids.sort_unstable();
                ids.into_iter().collect()
            })
            .unwrap_or_default()
    });
    while let Some(obs) = queue.pop_front() {
        let f = GRAPH.with(|g| {
            let mut g = g.borrow_mut();
            if g.running.contains(&obs) {
                return None;
            }
            let f = g.observers.get(&obs).cloned()?;
            g.running.insert(obs);
            // clear previous deps before recompute
            g.remove_all_edges_for(obs);
            Some(f)
        });
        let Some(f) = f else { continue };
        run_tracked(obs, &*f);
        GRAPH.with(|g| {
            g.borrow_mut().running.remove(&obs);
        });
    }
}

fn run_tracked(obs: ObserverId, f: &dyn Fn()) {
    // Restores the previous observer even if `f` unwinds.
    struct Restore(Option<ObserverId>);
    impl Drop for Restore {
        fn drop(&mut self) {
            CURRENT_OBSERVER.with(|co| *co.borrow_mut() = self.0);
        }
    }
    let prev = CURRENT_OBSERVER.with(|co| co.borrow_mut().replace(obs));
    let _restore = Restore(prev);
    f();
}

pub fn new_observer(f: impl Fn() + 'static) -> ObserverId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    })
}

/// Remove an observer and all of its dependency edges.
pub fn remove_observer(id: ObserverId) {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        g.remove_observer(id);
    });
}

pub fn run_observer_now(id: ObserverId) {
    let f = GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        g.remove_all_edges_for(id);
        g.observers.get(&id).cloned()
    });
    if let Some(f) = f {
        run_tracked(id, &*f);
    }
}

/// Registers `f` as an observer and runs it once under tracking, so every
/// signal it reads re-runs it on change.
pub fn observe(f: impl Fn() + 'static) -> ObserverId {
    let id = new_observer(f);
    run_observer_now(id);
    id
}

/// Runs `f` without recording signal reads against the current observer.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    struct Restore(Option<ObserverId>);
    impl Drop for Restore {
        fn drop(&mut self) {
            CURRENT_OBSERVER.with(|co| *co.borrow_mut() = self.0);
        }
    }
    let prev = CURRENT_OBSERVER.with(|co| co.borrow_mut().take());
    let _restore = Restore(prev);
    f()
}
