//! Reactive Context
//!
//! Tracks which reaction is currently running so that signal reads can be
//! attributed to it.
//!
//! # Implementation
//!
//! A thread-local stack of frames. [`ReactiveContext::enter`] pushes a
//! tracking frame for a reaction, [`untrack`] pushes a frame that swallows
//! reads, and the returned guard pops its frame on drop. Reads always go to
//! the innermost frame, so a nested reaction never leaks dependencies into
//! the reaction that created it.

use std::cell::RefCell;

use indexmap::IndexSet;

use super::SubscriberId;

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug)]
enum Frame {
    Tracking {
        subscriber_id: SubscriberId,
        reads: IndexSet<u64>,
    },
    Untracked,
}

/// Guard for one frame of the context stack.
///
/// Dropping it pops the frame, which keeps the stack balanced even if the
/// computation panics.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct ReactiveContext {
    depth: usize,
}

impl ReactiveContext {
    /// Attribute reads to `subscriber_id` until the guard is dropped.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        Self::push(Frame::Tracking {
            subscriber_id,
            reads: IndexSet::new(),
        })
    }

    /// Swallow reads until the guard is dropped.
    pub fn enter_untracked() -> Self {
        Self::push(Frame::Untracked)
    }

    fn push(frame: Frame) -> Self {
        let depth = FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            frames.push(frame);
            frames.len()
        });
        Self { depth }
    }

    /// Whether any frame, tracking or not, is open on this thread.
    pub fn is_active() -> bool {
        FRAMES.with(|frames| !frames.borrow().is_empty())
    }

    /// The reaction reads are currently attributed to.
    pub fn current_subscriber() -> Option<SubscriberId> {
        FRAMES.with(|frames| match frames.borrow().last() {
            Some(Frame::Tracking { subscriber_id, .. }) => Some(*subscriber_id),
            _ => None,
        })
    }

    /// Record a read of `signal_id` in the innermost frame.
    ///
    /// Returns the subscriber that should be registered with the runtime,
    /// or `None` when nothing is tracking.
    pub fn track_dependency(signal_id: u64) -> Option<SubscriberId> {
        FRAMES.with(|frames| match frames.borrow_mut().last_mut() {
            Some(Frame::Tracking { subscriber_id, reads }) => {
                reads.insert(signal_id);
                Some(*subscriber_id)
            }
            _ => None,
        })
    }

    /// The distinct signals read so far in the innermost frame, in first-read
    /// order.
    pub fn get_dependencies() -> Vec<u64> {
        FRAMES.with(|frames| match frames.borrow().last() {
            Some(Frame::Tracking { reads, .. }) => reads.iter().copied().collect(),
            _ => Vec::new(),
        })
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            debug_assert_eq!(frames.len(), self.depth, "reactive context dropped out of order");
            frames.pop();
        });
    }
}

/// Run `f` without subscribing the current reaction to anything it reads.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let _frame = ReactiveContext::enter_untracked();
    f()
}
