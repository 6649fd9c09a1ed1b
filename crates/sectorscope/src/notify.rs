//! Synchronous change notification for shared view state.
//!
//! A `ChangeNotifier<T>` keeps an explicit list of listeners. Owners of
//! mutable state (`Filters`, `RangeSelection`) call [`ChangeNotifier::fire`]
//! once per logical change, handing the current state to every listener in
//! registration order. Listeners receive no payload describing *what*
//! changed: they pull whatever they need from the state reference.
//!
//! Everything runs on the UI thread, so listeners are neither `Send` nor
//! `Sync`.

use std::fmt;

type Listener<T> = Box<dyn FnMut(&T)>;

/// Handle returned by [`ChangeNotifier::subscribe`], usable to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of listeners invoked synchronously on every change.
pub struct ChangeNotifier<T> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T> ChangeNotifier<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener. It is called on every subsequent `fire`.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&T) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener. Returns false if unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Invoke every listener once with `value`.
    pub fn fire(&mut self, value: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_listeners_fire_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        let a = Rc::clone(&seen);
        notifier.subscribe(move |v: &u32| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        notifier.subscribe(move |v: &u32| b.borrow_mut().push(("b", *v)));
        notifier.fire(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(Cell::new(0));
        let mut notifier = ChangeNotifier::new();
        let c = Rc::clone(&count);
        let id = notifier.subscribe(move |_: &()| c.set(c.get() + 1));
        notifier.fire(&());
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert!(notifier.is_empty());
        notifier.fire(&());
        assert_eq!(count.get(), 1);
    }
}
