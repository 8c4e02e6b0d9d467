use std::collections::HashMap;

use crate::model::MenuNode;
use crate::nav::resolve::walk_resolved;

/// Precomputed `key -> path` and `path -> key` lookups for one tree snapshot.
/// Rebuild whenever the menu tree is replaced.
#[derive(Debug, Default, Clone)]
pub struct RouteIndex {
    by_key: HashMap<String, String>,
    by_path: HashMap<String, String>,
    // snapshot order, for listing routes
    order: Vec<String>,
}

impl RouteIndex {
    pub fn build(tree: &[MenuNode]) -> Self {
        let mut idx = RouteIndex::default();
        walk_resolved(tree, |node, path| {
            // first in walk order wins, same as the linear lookups
            if !idx.by_key.contains_key(&node.key) {
                idx.by_key.insert(node.key.clone(), path.to_string());
                idx.order.push(node.key.clone());
            }
            idx.by_path
                .entry(path.to_string())
                .or_insert_with(|| node.key.clone());
            None::<()>
        });
        idx
    }

    pub fn path_of(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn key_at(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// `(key, path)` pairs in walk order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|k| self.by_key.get(k).map(|p| (k.as_str(), p.as_str())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
