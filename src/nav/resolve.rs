//! Menu tree resolution: key to path, path to key, breadcrumb trail and
//! sidebar selection.
//!
//! Every walk is pre-order with children in listed order, driven by an
//! explicit stack so deep trees cannot exhaust the call stack. Keys are
//! expected to be unique across the tree; when they are not, the first node in
//! walk order wins.

use crate::model::{BreadcrumbEntry, MenuNode};

/// Path a node resolves to, given the resolved path of its parent ("" at the
/// root level).
pub fn node_path(node: &MenuNode, parent: &str) -> String {
    match node.path.as_deref() {
        // Index route: same page as the parent. At the root there is no parent
        // path, so fall back to `/key`.
        Some("") if node.is_index() => {
            if parent.is_empty() {
                format!("/{}", node.key)
            } else {
                parent.to_string()
            }
        }
        Some(abs) if abs.starts_with('/') => abs.to_string(),
        Some(seg) if !seg.is_empty() => join(parent, seg),
        // No path, or an empty path that is not an index route: the key is the segment
        _ => join(parent, &node.key),
    }
}

fn join(parent: &str, seg: &str) -> String {
    if parent.is_empty() {
        format!("/{seg}")
    } else {
        format!("{parent}/{seg}")
    }
}

/// Visit every node with its resolved path until `visit` returns `Some`.
pub fn walk_resolved<'a, R>(
    tree: &'a [MenuNode],
    mut visit: impl FnMut(&'a MenuNode, &str) -> Option<R>,
) -> Option<R> {
    let mut stack: Vec<(&'a MenuNode, String)> =
        tree.iter().rev().map(|n| (n, String::new())).collect();
    while let Some((node, parent)) = stack.pop() {
        let current = node_path(node, &parent);
        if let Some(found) = visit(node, &current) {
            return Some(found);
        }
        if let Some(children) = &node.children {
            for child in children.iter().rev() {
                stack.push((child, current.clone()));
            }
        }
    }
    None
}

pub fn resolve_full_path(tree: &[MenuNode], key: &str) -> Option<String> {
    walk_resolved(tree, |node, path| (node.key == key).then(|| path.to_string()))
}

/// Exact string match against resolved paths; no normalization.
pub fn find_key_by_path<'a>(tree: &'a [MenuNode], path: &str) -> Option<&'a str> {
    walk_resolved(tree, |node, resolved| {
        (resolved == path).then_some(node.key.as_str())
    })
}

pub fn find_node<'a>(tree: &'a [MenuNode], key: &str) -> Option<&'a MenuNode> {
    let mut stack: Vec<&'a MenuNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.key == key {
            return Some(node);
        }
        if let Some(children) = &node.children {
            stack.extend(children.iter().rev());
        }
    }
    None
}

/// Nodes from a root down to and including `key`, minus intermediate entries
/// that have neither a path nor children.
pub fn ancestor_chain<'a>(tree: &'a [MenuNode], key: &str) -> Option<Vec<&'a MenuNode>> {
    let mut stack: Vec<(&'a MenuNode, usize)> = tree.iter().rev().map(|n| (n, 0)).collect();
    let mut chain: Vec<&'a MenuNode> = Vec::new();
    while let Some((node, depth)) = stack.pop() {
        chain.truncate(depth);
        chain.push(node);
        if node.key == key {
            let last = chain.len() - 1;
            let filtered = chain
                .into_iter()
                .enumerate()
                .filter(|(i, n)| {
                    *i == last
                        || n.path.as_deref().is_some_and(|p| !p.is_empty())
                        || n.has_children()
                })
                .map(|(_, n)| n)
                .collect();
            return Some(filtered);
        }
        if let Some(children) = &node.children {
            for child in children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    None
}

pub fn build_breadcrumbs(tree: &[MenuNode], key: &str) -> Option<Vec<BreadcrumbEntry>> {
    let chain = ancestor_chain(tree, key)?;
    Some(
        chain
            .into_iter()
            .map(|n| BreadcrumbEntry {
                title: n.label.clone(),
                path: resolve_full_path(tree, &n.key),
            })
            .collect(),
    )
}

/// Keys a sidebar marks active for a leaf: the leaf itself and, when it has
/// one, its immediate parent. Deeper ancestors are not included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub parent: Option<String>,
    pub leaf: String,
}

impl Selection {
    /// Parent first, then the leaf.
    pub fn keys(&self) -> Vec<String> {
        self.parent
            .iter()
            .cloned()
            .chain(std::iter::once(self.leaf.clone()))
            .collect()
    }
}

pub fn derive_selection(tree: &[MenuNode], key: &str) -> Selection {
    let mut stack: Vec<&MenuNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let Some(children) = &node.children {
            if children.iter().any(|c| c.key == key) {
                return Selection {
                    parent: Some(node.key.clone()),
                    leaf: key.to_string(),
                };
            }
            stack.extend(children.iter().rev());
        }
    }
    Selection {
        parent: None,
        leaf: key.to_string(),
    }
}
