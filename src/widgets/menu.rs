use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::visible_rows;
use crate::model::Icon;
use crate::nav::flatten::FlatRow;
use crate::ui::{AppState, Focus};
use crate::widgets::chrome::panel_block_themed;

/// Glyph for a top-level icon tag; unknown or missing tags get the generic
/// menu glyph.
pub(crate) fn icon_glyph(icon: Option<&Icon>) -> &'static str {
    match icon {
        Some(Icon::Dashboard) => "◉",
        Some(Icon::Appstore) => "▦",
        Some(Icon::Setting) => "⚙",
        Some(Icon::Bell) => "♪",
        Some(Icon::Team) => "☷",
        Some(Icon::User) => "☺",
        Some(Icon::FileText) => "▤",
        Some(Icon::BarChart) => "▥",
        Some(Icon::Api) => "⇄",
        Some(Icon::Global) => "◎",
        Some(Icon::Safety) => "◈",
        Some(Icon::Database) => "▣",
        Some(Icon::Menu) | Some(Icon::Other(_)) | None => "≡",
    }
}

/// First visible row index so that `selected` stays inside a viewport of
/// `inner_h` rows.
pub(crate) fn compute_scroll_window(total: usize, selected: usize, inner_h: u16) -> (usize, usize) {
    if inner_h == 0 || total == 0 {
        return (0, 0);
    }
    let sel = selected.min(total.saturating_sub(1));
    let ih = inner_h as usize;
    let start = sel.saturating_sub(ih - 1);
    let end = (start + ih).min(total);
    (start, end)
}

fn row_label(row: &FlatRow<'_>, state: &AppState) -> String {
    let node = row.node;
    if state.collapsed {
        return format!(" {}", icon_glyph(node.icon.as_ref()));
    }
    // Only top-level items carry an icon
    let icon = if row.depth == 0 {
        format!("{} ", icon_glyph(node.icon.as_ref()))
    } else {
        String::new()
    };
    let indent = "  ".repeat(row.depth);
    let chevron = if node.has_children() {
        if state.expanded.contains(&node.key) {
            " ▾"
        } else {
            " ▸"
        }
    } else {
        ""
    };
    format!("{indent}{icon}{}{chevron}", node.label)
}

pub fn draw_menu(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = state.theme.clone();
    let focused = state.focus == Focus::Sidebar;
    let rows = visible_rows(state);
    let inner_h = area.height.saturating_sub(2);
    let (start, end) = compute_scroll_window(rows.len(), state.cursor, inner_h);

    let leaf = state.location.selected.last();
    let parent = if state.location.selected.len() > 1 {
        state.location.selected.first()
    } else {
        None
    };
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(i, row)| {
            let text = row_label(row, state);
            let mut style = Style::default().fg(theme.fg);
            if leaf.is_some_and(|k| k == row.key()) {
                style = theme.selected_style();
            } else if parent.is_some_and(|k| k == row.key()) {
                style = theme.ancestor_style();
            }
            if focused && i == state.cursor {
                style = theme.list_cursor_style();
            }
            ListItem::new(text).style(style)
        })
        .collect();
    let title = if state.collapsed { "" } else { "Menu" };
    let list = List::new(items).block(panel_block_themed(title, focused, &theme));
    f.render_widget(list, area);
}
