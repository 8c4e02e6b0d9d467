use crate::model::{BreadcrumbEntry, DetailRoute, MenuNode};
use crate::nav::resolve::{build_breadcrumbs, derive_selection, find_key_by_path};

/// What the shell shows for the current path: the owning menu key (if the
/// path is a menu route), the highlighted sidebar keys and the breadcrumb
/// trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub key: Option<String>,
    pub selected: Vec<String>,
    pub breadcrumbs: Vec<BreadcrumbEntry>,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.selected.is_empty() && self.breadcrumbs.is_empty()
    }
}

pub fn match_detail_route<'a>(routes: &'a [DetailRoute], path: &str) -> Option<&'a DetailRoute> {
    routes
        .iter()
        .filter(|r| !r.exclude.iter().any(|e| e == path))
        .find(|r| {
            if r.exact {
                path == r.prefix
            } else {
                path.starts_with(&r.prefix)
            }
        })
}

pub fn locate(tree: &[MenuNode], detail_routes: &[DetailRoute], path: &str) -> Location {
    // Menu not loaded yet
    if tree.is_empty() {
        return Location::default();
    }
    if let Some(key) = find_key_by_path(tree, path) {
        return Location {
            key: Some(key.to_string()),
            selected: derive_selection(tree, key).keys(),
            breadcrumbs: build_breadcrumbs(tree, key).unwrap_or_default(),
        };
    }
    if let Some(route) = match_detail_route(detail_routes, path) {
        return Location {
            key: None,
            selected: route.select.iter().cloned().collect(),
            breadcrumbs: route.breadcrumbs.clone(),
        };
    }
    Location::default()
}
