//! Child and Class Resolvers
//!
//! These functions turn loosely shaped [`Child`] and [`Classes`] values into
//! concrete ones, and wire up reactions where a value can change.
//!
//! - [`resolve_child`] delivers a child to a setter, once for static values
//!   and again on every change for reactive ones.
//! - [`resolve_arrays_and_statics`] flattens nested arrays and turns
//!   primitives into text nodes in one pass, reporting whether any
//!   observable was seen. It only allocates when something changes.
//! - [`resolve_resolved`] fully unwraps observables and drops void children.
//! - [`resolve_class`] collects the active class names.

use std::sync::Arc;

use indexmap::IndexSet;

use super::child::{Child, ChildArray};
use super::classes::Classes;
use crate::dom::Node;
use crate::reactive::use_reaction;

/// Receives a resolved child and whether it came from a reactive re-run.
pub type Setter = Arc<dyn Fn(Child, bool) + Send + Sync>;

/// The set of active class names, in first-seen order.
pub type ResolvedClasses = IndexSet<String>;

/// Create the text node a primitive child renders as.
///
/// Non-primitive values produce an empty text node.
pub fn create_text(value: &Child) -> Node {
    Node::text(value.primitive_text().unwrap_or_default())
}

/// Resolve `value` and hand the result to `setter`.
///
/// - Frozen and untracked functions are read once, without subscribing.
/// - Other functions are read inside a reaction; every run re-resolves the
///   result and delivers it with `dynamic = true`.
/// - Arrays are flattened with their statics resolved. If an observable
///   was found, one reaction re-unwraps the whole array whenever any of
///   them changes; otherwise the array is delivered once.
/// - Anything else is delivered once, as is.
pub fn resolve_child(value: Child, setter: Setter, dynamic: bool) {
    match value {
        Child::Function(accessor) if accessor.is_static() => {
            resolve_child(accessor.call(), setter, dynamic);
        }
        Child::Function(accessor) => {
            tracing::trace!(?accessor, "resolving child through a reaction");
            use_reaction(move || {
                resolve_child(accessor.call(), Arc::clone(&setter), true);
            });
        }
        Child::Array(array) => {
            let (items, has_observables) = resolve_arrays_and_statics(&array.items);
            let values = ChildArray {
                items,
                uncached: array.uncached,
            };

            if has_observables {
                tracing::trace!(len = values.len(), "array contains observables");
                use_reaction(move || {
                    let resolved = resolve_resolved(Child::Array(values.clone()), Vec::new());
                    setter(Child::Array(ChildArray::new(resolved)), true);
                });
            } else {
                setter(Child::Array(values), dynamic);
            }
        }
        value => setter(value, dynamic),
    }
}

/// Deeply flatten `values`, replacing primitives with text nodes, and
/// report whether any observable appears anywhere.
///
/// When nothing needs flattening or replacing, the input itself is returned
/// (the same allocation). Observables stay in place for the caller to
/// unwrap later. An observable seen before the output is materialized is
/// carried along in the copied prefix.
pub fn resolve_arrays_and_statics(values: &Arc<[Child]>) -> (Arc<[Child]>, bool) {
    let mut resolved = None;
    let mut has_observables = false;

    flatten_into(values, &mut resolved, &mut has_observables);

    match resolved {
        Some(resolved) => (resolved.into(), has_observables),
        None => (Arc::clone(values), has_observables),
    }
}

fn flatten_into(values: &[Child], resolved: &mut Option<Vec<Child>>, has_observables: &mut bool) {
    for (index, value) in values.iter().enumerate() {
        match value {
            Child::Text(_) | Child::Number(_) | Child::BigInt(_) => {
                resolved
                    .get_or_insert_with(|| values[..index].to_vec())
                    .push(Child::Node(create_text(value)));
            }
            Child::Array(nested) => {
                resolved.get_or_insert_with(|| values[..index].to_vec());
                flatten_into(&nested.items, resolved, has_observables);
            }
            Child::Function(accessor) if accessor.is_observable() => {
                if let Some(resolved) = resolved {
                    resolved.push(value.clone());
                }
                *has_observables = true;
            }
            _ => {
                if let Some(resolved) = resolved {
                    resolved.push(value.clone());
                }
            }
        }
    }
}

/// Unwrap observables until a terminal value is reached, descend into
/// arrays, and append everything that renders to `values`.
///
/// Void children are dropped here so consumers never see them.
pub fn resolve_resolved(value: Child, mut values: Vec<Child>) -> Vec<Child> {
    let mut value = value;
    while let Child::Function(accessor) = &value {
        if !accessor.is_observable() {
            break;
        }
        value = accessor.call();
    }

    match value {
        Child::Array(array) => {
            for item in array.iter() {
                values = resolve_resolved(item.clone(), values);
            }
        }
        value if value.is_void() => {}
        value => values.push(value),
    }

    values
}

/// Add the class names active in `classes` to `resolved`.
///
/// Functions are read once; the caller provides reactivity by re-running
/// this inside its own reaction. Toggle-map entries are added when truthy
/// and skipped otherwise: absence means inactive.
pub fn resolve_class(classes: &Classes, mut resolved: ResolvedClasses) -> ResolvedClasses {
    match classes {
        Classes::None => {}
        Classes::Str(list) => {
            for class in list.split_whitespace() {
                resolved.insert(class.to_owned());
            }
        }
        Classes::Accessor(f) => {
            resolved = resolve_class(&f(), resolved);
        }
        Classes::Array(items) => {
            for item in items {
                resolved = resolve_class(item, resolved);
            }
        }
        Classes::Map(map) => {
            for (class, value) in map {
                let active = match value {
                    Child::Function(accessor) => accessor.call().is_truthy(),
                    value => value.is_truthy(),
                };
                if active {
                    resolved.insert(class.clone());
                }
            }
        }
    }

    resolved
}
