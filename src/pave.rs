//! Route-tree flattener.
//!
//! Converts a nested route definition into a flat, ordered sequence of
//! `(path, leaf)` entries: `{a: {b: h1, "c/d": h2}}` flattens to
//! `[("a/b", h1), ("a/c/d", h2)]`. Traversal is depth-first in insertion
//! order, and output order is what later stages use as match priority.
//!
//! Leaf validity is deliberately not checked here; the table builder owns
//! that. This component only distinguishes "nested mapping" (recurse) from
//! "anything else" (emit as leaf).

use crate::error::DefinitionError;
use crate::tree::RouteNode;

/// A flattened route entry: joined path and the leaf found there.
///
/// Paths need not be unique at this stage; the table preserves order and the
/// dispatcher resolves collisions first-match-wins.
#[derive(Debug, Clone)]
pub struct FlatEntry<'a> {
    /// Separator-joined key path from the root to the leaf.
    pub path: String,
    /// The leaf as declared, unvalidated.
    pub leaf: &'a RouteNode,
}

/// Flatten `node` depth-first, joining nested keys with `separator`.
///
/// The separator is omitted while the prefix is empty, so a root-level key
/// `"a"` flattens to `"a"`, not `"/a"`. Fails when `node` is not a tree,
/// naming the kind that was received instead.
pub fn flatten<'a>(
    node: &'a RouteNode,
    prefix: &str,
    separator: &str,
) -> Result<Vec<FlatEntry<'a>>, DefinitionError> {
    let RouteNode::Tree(tree) = node else {
        return Err(DefinitionError::NotAMapping(node.kind()));
    };

    let mut entries = Vec::new();
    for (key, value) in tree.entries() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{separator}{key}")
        };
        match value {
            RouteNode::Tree(_) => entries.extend(flatten(value, &path, separator)?),
            leaf => entries.push(FlatEntry { path, leaf }),
        }
    }
    Ok(entries)
}
