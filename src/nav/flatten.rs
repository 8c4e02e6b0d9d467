use std::collections::HashSet;

use crate::model::MenuNode;

/// One visible sidebar row.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FlatRow<'a> {
    pub(crate) node: &'a MenuNode,
    pub(crate) depth: usize,
}

impl FlatRow<'_> {
    pub(crate) fn key(&self) -> &str {
        &self.node.key
    }
}

/// Rows in display order. Children are listed under expanded keys only,
/// unless `expand_all` is set.
pub(crate) fn flatten_nodes<'a>(
    tree: &'a [MenuNode],
    expanded: &HashSet<String>,
    expand_all: bool,
) -> Vec<FlatRow<'a>> {
    fn append<'a>(
        out: &mut Vec<FlatRow<'a>>,
        nodes: &'a [MenuNode],
        expanded: &HashSet<String>,
        expand_all: bool,
        depth: usize,
    ) {
        for node in nodes {
            out.push(FlatRow { node, depth });
            if let Some(children) = &node.children {
                if expand_all || expanded.contains(&node.key) {
                    append(out, children, expanded, expand_all, depth + 1);
                }
            }
        }
    }

    let mut out = Vec::new();
    append(&mut out, tree, expanded, expand_all, 0);
    out
}

pub(crate) fn row_index_of(rows: &[FlatRow<'_>], key: &str) -> Option<usize> {
    rows.iter().position(|r| r.key() == key)
}
