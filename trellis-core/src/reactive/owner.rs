//! Ownership Scopes
//!
//! Every reaction belongs to an owner: either a [`Root`] or the reaction
//! whose run created it. When an owner re-runs or is disposed, everything it
//! owns is disposed first. This is what keeps nested reactive positions from
//! piling up stale subscriptions each time their parent recomputes.

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::Mutex;

use super::reaction::Reaction;

type Cleanup = Box<dyn FnOnce() + Send>;

thread_local! {
    static OWNER_STACK: RefCell<Vec<Arc<Scope>>> = const { RefCell::new(Vec::new()) };
    static DETACHED: RefCell<Vec<Reaction>> = const { RefCell::new(Vec::new()) };
}

/// The reactions and cleanup callbacks owned by one owner.
#[derive(Default)]
pub struct Scope {
    reactions: Mutex<Vec<Reaction>>,
    cleanups: Mutex<Vec<Cleanup>>,
}

impl Scope {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn adopt(&self, reaction: Reaction) {
        self.reactions.lock().push(reaction);
    }

    pub(crate) fn add_cleanup(&self, cleanup: Cleanup) {
        self.cleanups.lock().push(cleanup);
    }

    /// Dispose owned reactions, then run cleanups in reverse registration order.
    ///
    /// Locks are released before calling out, since disposal can re-enter.
    pub(crate) fn dispose(&self) {
        let reactions = std::mem::take(&mut *self.reactions.lock());
        for reaction in reactions {
            reaction.dispose();
        }

        let cleanups = std::mem::take(&mut *self.cleanups.lock());
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }
    }

    /// Number of reactions currently owned.
    pub fn reaction_count(&self) -> usize {
        self.reactions.lock().len()
    }

    /// Run `f` with this scope as the current owner.
    pub(crate) fn run<R>(self: &Arc<Self>, f: impl FnOnce() -> R) -> R {
        let _guard = OwnerGuard::enter(Arc::clone(self));
        f()
    }

    pub(crate) fn current() -> Option<Arc<Scope>> {
        OWNER_STACK.with(|stack| stack.borrow().last().cloned())
    }
}

struct OwnerGuard;

impl OwnerGuard {
    fn enter(scope: Arc<Scope>) -> Self {
        OWNER_STACK.with(|stack| stack.borrow_mut().push(scope));
        Self
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        OWNER_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// A top-level owner.
///
/// Reactions created inside [`Root::run`] live until the root is disposed
/// or dropped.
///
/// ```rust,ignore
/// let root = Root::new();
/// root.run(|| mount(&body, app()));
/// // ...
/// root.dispose();
/// ```
pub struct Root {
    scope: Arc<Scope>,
}

impl Root {
    pub fn new() -> Self {
        Self { scope: Scope::new() }
    }

    /// Run `f` with this root as the current owner.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        self.scope.run(f)
    }

    /// Dispose every reaction this root owns and run its cleanups.
    pub fn dispose(&self) {
        self.scope.dispose();
    }

    /// Take ownership of every reaction created outside an owner on this
    /// thread. Returns how many were adopted.
    pub fn adopt_detached(&self) -> usize {
        let detached = DETACHED.with(|detached| std::mem::take(&mut *detached.borrow_mut()));
        let count = detached.len();
        for reaction in detached {
            self.scope.adopt(reaction);
        }
        count
    }

    /// Number of reactions owned directly by this root.
    pub fn reaction_count(&self) -> usize {
        self.scope.reaction_count()
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

/// Register `f` to run when the current owner is disposed or re-runs.
///
/// Outside of any owner the callback is dropped without running.
pub fn on_cleanup(f: impl FnOnce() + Send + 'static) {
    match Scope::current() {
        Some(scope) => scope.add_cleanup(Box::new(f)),
        None => tracing::trace!("on_cleanup called without an owner, ignoring"),
    }
}

/// Hand a reaction to the current owner, or keep it alive on this thread.
pub(crate) fn adopt(reaction: Reaction) {
    match Scope::current() {
        Some(scope) => scope.adopt(reaction),
        None => {
            if crate::config::config().warn_detached_reactions {
                tracing::warn!(
                    subscriber = reaction.subscriber_id().raw(),
                    "reaction created outside of any owner, it lives until a root adopts it"
                );
            }
            DETACHED.with(|detached| detached.borrow_mut().push(reaction));
        }
    }
}
