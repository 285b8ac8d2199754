//! Subscriber identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one reaction in the runtime's dependency maps and in the
/// per-batch queue, which is deduplicated on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// A fresh id, unique for the life of the process.
    pub fn new() -> Self {
        Self(NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reaction#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_fresh_and_ordered() {
        let ids: Vec<_> = (0..4).map(|_| SubscriberId::new()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn display() {
        let id = SubscriberId::new();
        assert_eq!(id.to_string(), format!("reaction#{}", id.raw()));
    }
}
