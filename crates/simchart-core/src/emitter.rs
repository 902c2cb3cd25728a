// File: crates/simchart-core/src/emitter.rs
// Summary: Single-threaded change notification channel with RAII subscriptions.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Notifies listeners in subscription order. Emission is synchronous; a listener
/// must not re-enter an object that is still borrowed while it emits.
pub struct Emitter<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> Emitter<T> {
    pub fn new() -> Self {
        Self { registry: Rc::new(RefCell::new(Registry { next_id: 0, listeners: Vec::new() })) }
    }

    /// Register `listener`. It stays registered until the returned guard is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(listener);
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.listeners.push((id, listener));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(reg) = weak.upgrade() {
                reg.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    pub fn emit(&self, value: &T) {
        // Snapshot so listeners may subscribe or unsubscribe while being notified.
        let snapshot: Vec<Listener<T>> =
            self.registry.borrow().listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Clones share the same listener list.
impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self { registry: Rc::clone(&self.registry) }
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self { Self::new() }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.registry.borrow().listeners.len())
            .finish()
    }
}

/// Teardown handle returned by [`Emitter::subscribe`]. Unsubscribes exactly once,
/// either on drop or through [`Subscription::unsubscribe`].
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self { teardown: Some(Box::new(teardown)) }
    }

    /// Run `after` once this subscription has been torn down.
    pub(crate) fn then(self, after: impl FnOnce() + 'static) -> Self {
        Self::new(move || {
            drop(self);
            after();
        })
    }

    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(f) = self.teardown.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.teardown.is_some()).finish()
    }
}
