use crate::model::MenuNode;
use crate::nav::index::RouteIndex;
use crate::nav::locate::Location;
use crate::nav::resolve::find_node;
use crate::widgets::markdown::MarkdownWidget;

fn trail(location: &Location) -> String {
    location
        .breadcrumbs
        .iter()
        .map(|c| match &c.path {
            Some(p) => format!("{} ({p})", c.title),
            None => c.title.clone(),
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Content page for `path`: the owning menu entry with its sub-routes and raw
/// definition, a detail page description, or a not-found notice.
pub fn build_route_page(
    menus: &[MenuNode],
    routes: &RouteIndex,
    location: &Location,
    path: &str,
) -> MarkdownWidget {
    let node = location.key.as_deref().and_then(|k| find_node(menus, k));
    let Some(node) = node else {
        if location.is_empty() {
            let text = format!("# Not found\n\nNo page is routed at `{path}`.\n");
            return MarkdownWidget::from_text(path, &text);
        }
        let title = location
            .breadcrumbs
            .last()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| path.to_string());
        let mut text = format!("# {title}\n\nPath: {path}\n");
        text.push_str(&format!("Trail: {}\n", trail(location)));
        text.push_str("\nDetail page, not listed in the menu.\n");
        return MarkdownWidget::from_text(title, &text);
    };

    let mut text = format!("# {}\n\n", node.label);
    text.push_str(&format!("Path: {path}\n"));
    text.push_str(&format!("Key: {}\n", node.key));
    text.push_str(&format!("Trail: {}\n", trail(location)));

    if let Some(children) = node.children.as_ref().filter(|c| !c.is_empty()) {
        text.push_str("\n## Routes\n\n");
        for child in children {
            let target = routes.path_of(&child.key).unwrap_or("-");
            text.push_str(&format!("- {} {target}\n", child.label));
        }
    }

    text.push_str("\n## Definition\n\n```json\n");
    match serde_json::to_string_pretty(node) {
        Ok(json) => text.push_str(&json),
        Err(e) => text.push_str(&format!("\"<unserializable: {e}>\"")),
    }
    text.push_str("\n```\n");
    MarkdownWidget::from_text(node.label.clone(), &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_detail_routes, default_sidebar_menus};
    use crate::nav::locate::locate;

    fn page(path: &str) -> MarkdownWidget {
        let menus = default_sidebar_menus();
        let routes = RouteIndex::build(&menus);
        let location = locate(&menus, &default_detail_routes(), path);
        build_route_page(&menus, &routes, &location, path)
    }

    #[test]
    fn menu_page_lists_resolved_child_routes() {
        let p = page("/configs/history");
        assert_eq!(p.title(), "配置历史");
        assert!(p.source().contains("Key: configs-history"));
        assert!(p.source().contains("Trail: 监控配置 (/configs) > 配置历史 (/configs/history)"));
        assert!(p.source().contains("\"key\": \"configs-history\""));
    }

    #[test]
    fn group_page_shows_children() {
        let p = page("/alerts");
        assert_eq!(p.title(), "告警管理");
        assert!(p.source().contains("## Routes"));
        assert!(p.source().contains("- 告警渠道 /alerts/channels"));
    }

    #[test]
    fn detail_and_unknown_pages() {
        let p = page("/apps/42");
        assert_eq!(p.title(), "应用详情");
        assert!(p.source().contains("not listed in the menu"));

        let p = page("/nowhere");
        assert!(p.source().starts_with("# Not found"));
        assert!(p.source().contains("/nowhere"));
    }
}
