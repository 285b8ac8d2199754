//! Template Actions
//!
//! A compiled template is a static DOM tree that gets deep-cloned per use.
//! The dynamic bits are described as actions addressed by child-index
//! paths into that tree. Paths are resolved against the clone before any
//! action runs, since an action may insert or remove nodes and shift the
//! indices of the ones after it.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::dom::Node;

/// Child indices from the template root down to one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TemplateActionPath(SmallVec<[usize; 8]>);

impl TemplateActionPath {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().collect())
    }

    /// The node at this path under `root`, if there is one.
    pub fn locate(&self, root: &Node) -> Option<Node> {
        self.0
            .iter()
            .try_fold(root.clone(), |node, &index| node.child(index))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl<const N: usize> From<[usize; N]> for TemplateActionPath {
    fn from(indices: [usize; N]) -> Self {
        Self::new(indices)
    }
}

/// One instruction against a cloned template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateAction {
    pub path: TemplateActionPath,
    pub method: String,
    pub key: Option<String>,
    pub target_path: Option<TemplateActionPath>,
}

impl TemplateAction {
    pub fn new(path: impl Into<TemplateActionPath>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            key: None,
            target_path: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn target(mut self, path: impl Into<TemplateActionPath>) -> Self {
        self.target_path = Some(path.into());
        self
    }
}

/// Performs one action: `(node, method, key, target node)`.
pub type TemplateActionProxy = Arc<dyn Fn(&Node, &str, Option<&str>, Option<&Node>) + Send + Sync>;

/// Resolve every action against `root`, then hand each to `proxy` in order.
///
/// Actions whose path does not resolve are skipped. Returns how many ran.
pub fn apply_template_actions(root: &Node, actions: &[TemplateAction], proxy: &TemplateActionProxy) -> usize {
    let located: Vec<_> = actions
        .iter()
        .filter_map(|action| {
            let Some(node) = action.path.locate(root) else {
                tracing::warn!(path = ?action.path.indices(), method = %action.method, "template path does not resolve");
                return None;
            };
            let target = match &action.target_path {
                Some(path) => match path.locate(root) {
                    Some(target) => Some(target),
                    None => {
                        tracing::warn!(path = ?path.indices(), "template target path does not resolve");
                        return None;
                    }
                },
                None => None,
            };
            Some((action, node, target))
        })
        .collect();

    for (action, node, target) in &located {
        proxy(node, &action.method, action.key.as_deref(), target.as_ref());
    }

    located.len()
}
