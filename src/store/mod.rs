//! Typed state stores for the viewed market and the order being composed.
//!
//! A [`Store`] owns one record and mutates it only through
//! [`Store::update`] (apply a patch) and [`Store::reset`] (restore the
//! default). Each dispatch is applied atomically with respect to observers:
//! a [`Subscription`] never sees half of a patch. Handles are cheap to clone
//! and are passed explicitly to whoever needs them.

pub mod market;
pub mod order;

use std::sync::Arc;

use tokio::sync::watch;

pub use market::{CurrentMarket, MarketPatch};
pub use order::{CurrentOrder, OrderPatch, OrderPrice};

/// A record that can be updated by merging a partial patch into it.
pub trait Reducible: Clone + Default {
    /// Partial update; every present field overwrites the stored one.
    type Patch;

    /// Merges `patch` into `self`.
    fn apply(&mut self, patch: Self::Patch);
}

/// Shared handle to a single reducer-backed record.
pub struct Store<S: Reducible> {
    tx: Arc<watch::Sender<S>>,
}

impl<S: Reducible> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Reducible> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Reducible> Store<S> {
    /// Creates a store holding `initial`.
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Applies one patch and notifies subscribers.
    pub fn update(&self, patch: S::Patch) {
        self.tx.send_modify(|state| state.apply(patch));
    }

    /// Restores the default record and notifies subscribers.
    pub fn reset(&self) {
        self.tx.send_replace(S::default());
    }

    /// Returns a copy of the current record.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Runs `f` against the current record without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Registers an observer that is notified after every dispatch.
    pub fn subscribe(&self) -> Subscription<S> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observer side of a [`Store`].
pub struct Subscription<S> {
    rx: watch::Receiver<S>,
}

impl<S: Clone> Subscription<S> {
    /// Waits for the next dispatch and returns the resulting record.
    ///
    /// Returns `None` once every store handle has been dropped.
    pub async fn changed(&mut self) -> Option<S> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Returns `true` if a dispatch happened since the last observation.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Returns the latest record and marks it as seen.
    pub fn current(&mut self) -> S {
        self.rx.borrow_and_update().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        a: u32,
        b: u32,
    }

    #[derive(Default)]
    struct CounterPatch {
        a: Option<u32>,
        b: Option<u32>,
    }

    impl Reducible for Counter {
        type Patch = CounterPatch;

        fn apply(&mut self, patch: CounterPatch) {
            if let Some(a) = patch.a {
                self.a = a;
            }
            if let Some(b) = patch.b {
                self.b = b;
            }
        }
    }

    #[test]
    fn clones_share_state() {
        let store = Store::<Counter>::default();
        let other = store.clone();
        other.update(CounterPatch {
            a: Some(3),
            ..Default::default()
        });
        assert_eq!(store.snapshot(), Counter { a: 3, b: 0 });
    }

    #[test]
    fn reset_restores_default() {
        let store = Store::new(Counter { a: 1, b: 2 });
        store.reset();
        assert_eq!(store.read(|c| c.clone()), Counter::default());
    }

    #[test]
    fn subscriber_sees_whole_patch() {
        let store = Store::<Counter>::default();
        let mut sub = store.subscribe();
        assert!(!sub.has_changed());

        store.update(CounterPatch {
            a: Some(1),
            b: Some(2),
        });

        assert!(sub.has_changed());
        assert_eq!(sub.current(), Counter { a: 1, b: 2 });
        assert!(!sub.has_changed());
    }

    #[test]
    fn changed_waits_for_dispatch() {
        let store = Store::<Counter>::default();
        let mut sub = store.subscribe();
        let mut changed = tokio_test::task::spawn(sub.changed());
        tokio_test::assert_pending!(changed.poll());

        store.update(CounterPatch {
            a: Some(4),
            ..Default::default()
        });

        assert!(changed.is_woken());
        let seen = tokio_test::assert_ready!(changed.poll());
        assert_eq!(seen.map(|c| c.a), Some(4));
    }

    #[tokio::test]
    async fn changed_resolves_after_dispatch() {
        let store = Store::<Counter>::default();
        let mut sub = store.subscribe();
        let writer = store.clone();

        tokio::spawn(async move {
            writer.update(CounterPatch {
                b: Some(9),
                ..Default::default()
            });
        });

        let seen = sub.changed().await.unwrap();
        assert_eq!(seen.b, 9);
    }

    #[tokio::test]
    async fn changed_ends_when_store_dropped() {
        let store = Store::<Counter>::default();
        let mut sub = store.subscribe();
        drop(store);
        assert!(sub.changed().await.is_none());
    }
}
