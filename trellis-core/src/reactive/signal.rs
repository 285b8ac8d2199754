//! Signals
//!
//! A [`Signal`] is a piece of mutable state that reactions can depend on.
//! Reading it inside a reaction subscribes that reaction; writing it
//! schedules every subscriber through the [`Runtime`].
//!
//! Writes always notify. There is no equality check, so `T` needs no
//! `PartialEq`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::context::ReactiveContext;
use super::runtime::Runtime;

static NEXT_SIGNAL_ID: AtomicU64 = AtomicU64::new(0);

struct SignalInner<T> {
    id: u64,
    value: RwLock<T>,
}

/// Reactive state shared between clones.
///
/// ```rust,ignore
/// let count = Signal::new(0);
/// count.update(|n| *n += 1);
/// assert_eq!(count.get(), 1);
/// ```
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: NEXT_SIGNAL_ID.fetch_add(1, Ordering::Relaxed),
                value: RwLock::new(value),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Borrow the value, subscribing the running reaction.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.value.read())
    }

    /// Borrow the value without subscribing.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Store `value` and notify subscribers.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.notify();
    }

    /// Mutate the value in place and notify subscribers.
    ///
    /// The write lock is released before anyone is notified.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.write());
        self.notify();
    }

    /// Number of reactions currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        Runtime::subscriber_count(self.inner.id)
    }

    fn track(&self) {
        if let Some(subscriber_id) = ReactiveContext::track_dependency(self.inner.id) {
            Runtime::add_dependency(self.inner.id, subscriber_id);
        }
    }

    fn notify(&self) {
        Runtime::notify_signal_change(self.inner.id);
    }
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Clone the value out, subscribing the running reaction.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Signal<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.read())
            .finish()
    }
}
