//! Fragments
//!
//! A [`Fragment`] describes the node(s) a rendered child currently occupies
//! without wrapping them in a container element. Consumers look at
//! [`Fragment::len`] and [`Fragment::is_fragmented`] to tell "one concrete
//! node, patch it in place" from "walk the nested fragments to find the
//! nodes".
//!
//! Nested entries are [`FragmentSlot`]s: shared, lockable fragments owned by
//! a reactive sub-position. When that position updates it rewrites its own
//! slot and the enclosing fragment sees the change on its next traversal.

use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::dom::Node;

/// Inline capacity of the multi-entry variants.
const INLINE: usize = 5;

/// A live, shared fragment belonging to one reactive position.
#[derive(Clone, Default)]
pub struct FragmentSlot(Arc<Mutex<Fragment>>);

impl FragmentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the slot's current fragment.
    pub fn get(&self) -> Fragment {
        self.0.lock().clone()
    }

    /// Replace the slot's fragment, returning the previous one.
    pub fn replace(&self, fragment: Fragment) -> Fragment {
        std::mem::replace(&mut *self.0.lock(), fragment)
    }

    /// The concrete nodes currently in the slot.
    pub fn nodes(&self) -> Vec<Node> {
        self.get().nodes()
    }
}

impl std::fmt::Debug for FragmentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FragmentSlot").field(&*self.0.lock()).finish()
    }
}

/// One top-level entry of a fragment.
#[derive(Clone, Debug)]
pub enum FragmentEntry {
    Node(Node),
    Fragment(FragmentSlot),
}

/// The node(s) produced by rendering a child.
#[derive(Clone, Debug, Default)]
pub enum Fragment {
    /// Nothing.
    #[default]
    Undefined,
    /// A single concrete node.
    Node(Node),
    /// A single nested fragment.
    Fragment(FragmentSlot),
    /// Two or more concrete nodes.
    Nodes(SmallVec<[Node; INLINE]>),
    /// Two or more nested fragments.
    Fragments(SmallVec<[FragmentSlot; INLINE]>),
    /// Two or more entries, some nodes and some nested fragments.
    Mixed(SmallVec<[FragmentEntry; INLINE]>),
}

impl Fragment {
    /// Build the tightest variant for `entries`.
    pub fn from_entries(entries: Vec<FragmentEntry>) -> Self {
        let nested = entries
            .iter()
            .filter(|entry| matches!(entry, FragmentEntry::Fragment(_)))
            .count();

        match entries.len() {
            0 => Self::Undefined,
            1 => match entries.into_iter().next() {
                Some(FragmentEntry::Node(node)) => Self::Node(node),
                Some(FragmentEntry::Fragment(slot)) => Self::Fragment(slot),
                None => Self::Undefined,
            },
            _ if nested == 0 => Self::Nodes(
                entries
                    .into_iter()
                    .filter_map(|entry| match entry {
                        FragmentEntry::Node(node) => Some(node),
                        FragmentEntry::Fragment(_) => None,
                    })
                    .collect(),
            ),
            len if nested == len => Self::Fragments(
                entries
                    .into_iter()
                    .filter_map(|entry| match entry {
                        FragmentEntry::Fragment(slot) => Some(slot),
                        FragmentEntry::Node(_) => None,
                    })
                    .collect(),
            ),
            _ => Self::Mixed(entries.into_iter().collect()),
        }
    }

    /// Build a fragment of concrete nodes.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self::from_entries(nodes.into_iter().map(FragmentEntry::Node).collect())
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Undefined => 0,
            Self::Node(_) | Self::Fragment(_) => 1,
            Self::Nodes(nodes) => nodes.len(),
            Self::Fragments(slots) => slots.len(),
            Self::Mixed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any top-level entry is a nested fragment.
    pub fn is_fragmented(&self) -> bool {
        matches!(self, Self::Fragment(_) | Self::Fragments(_) | Self::Mixed(_))
    }

    /// The single concrete node, when that is all the fragment holds.
    pub fn single_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// All concrete nodes, in document order, descending into nested slots.
    pub fn nodes(&self) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes(&self, out: &mut Vec<Node>) {
        match self {
            Self::Undefined => {}
            Self::Node(node) => out.push(node.clone()),
            Self::Fragment(slot) => slot.get().collect_nodes(out),
            Self::Nodes(nodes) => out.extend(nodes.iter().cloned()),
            Self::Fragments(slots) => {
                for slot in slots {
                    slot.get().collect_nodes(out);
                }
            }
            Self::Mixed(entries) => {
                for entry in entries {
                    match entry {
                        FragmentEntry::Node(node) => out.push(node.clone()),
                        FragmentEntry::Fragment(slot) => slot.get().collect_nodes(out),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_with(nodes: Vec<Node>) -> FragmentSlot {
        let slot = FragmentSlot::new();
        slot.replace(Fragment::from_nodes(nodes));
        slot
    }

    #[test]
    fn empty_is_undefined() {
        let fragment = Fragment::from_entries(Vec::new());
        assert!(matches!(fragment, Fragment::Undefined));
        assert_eq!(fragment.len(), 0);
        assert!(!fragment.is_fragmented());
    }

    #[test]
    fn single_node() {
        let node = Node::text("a");
        let fragment = Fragment::from_nodes(vec![node.clone()]);
        assert_eq!(fragment.single_node(), Some(&node));
        assert_eq!(fragment.len(), 1);
        assert!(!fragment.is_fragmented());
    }

    #[test]
    fn single_nested_fragment() {
        let slot = slot_with(vec![Node::text("a"), Node::text("b")]);
        let fragment = Fragment::from_entries(vec![FragmentEntry::Fragment(slot)]);
        assert!(matches!(fragment, Fragment::Fragment(_)));
        assert_eq!(fragment.len(), 1);
        assert!(fragment.is_fragmented());
        assert_eq!(fragment.nodes().len(), 2);
    }

    #[test]
    fn many_nodes() {
        let fragment = Fragment::from_nodes((0..3).map(|i| Node::text(i.to_string())).collect());
        assert!(matches!(fragment, Fragment::Nodes(_)));
        assert_eq!(fragment.len(), 3);
        assert!(!fragment.is_fragmented());
    }

    #[test]
    fn many_fragments_and_mixed() {
        let fragments = Fragment::from_entries(vec![
            FragmentEntry::Fragment(slot_with(vec![Node::text("a")])),
            FragmentEntry::Fragment(slot_with(vec![])),
        ]);
        assert!(matches!(fragments, Fragment::Fragments(_)));
        assert_eq!(fragments.len(), 2);
        assert!(fragments.is_fragmented());

        let mixed = Fragment::from_entries(vec![
            FragmentEntry::Node(Node::text("x")),
            FragmentEntry::Fragment(slot_with(vec![Node::text("y"), Node::text("z")])),
        ]);
        assert!(matches!(mixed, Fragment::Mixed(_)));
        assert_eq!(mixed.len(), 2);
        assert!(mixed.is_fragmented());

        let text: String = mixed.nodes().iter().map(Node::text_content).collect();
        assert_eq!(text, "xyz");
    }

    #[test]
    fn traversal_sees_slot_updates() {
        let slot = slot_with(vec![Node::text("old")]);
        let fragment = Fragment::from_entries(vec![
            FragmentEntry::Node(Node::text("<")),
            FragmentEntry::Fragment(slot.clone()),
        ]);

        slot.replace(Fragment::from_nodes(vec![Node::text("new")]));

        let text: String = fragment.nodes().iter().map(Node::text_content).collect();
        assert_eq!(text, "<new");
    }

    #[test]
    fn len_counts_past_inline_capacity() {
        let fragment = Fragment::from_nodes((0..8).map(|i| Node::text(i.to_string())).collect());
        assert_eq!(fragment.len(), 8);
    }
}
