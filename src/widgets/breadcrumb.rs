use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::BreadcrumbEntry;
use crate::theme::Theme;
use crate::ui::AppState;

/// Spans for a trail: linked entries in the accent color, the current page
/// muted and bold.
pub(crate) fn crumb_spans<'a>(crumbs: &'a [BreadcrumbEntry], theme: &Theme) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" / ", Style::default().fg(theme.frame)));
        }
        let last = i + 1 == crumbs.len();
        let style = if last {
            theme.text_muted().add_modifier(Modifier::BOLD)
        } else if crumb.path.is_some() {
            theme.link()
        } else {
            Style::default().fg(theme.fg)
        };
        spans.push(Span::styled(crumb.title.as_str(), style));
    }
    spans
}

pub fn draw_breadcrumbs(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let crumbs = &state.location.breadcrumbs;
    let line = if crumbs.is_empty() {
        Line::from(Span::styled(state.current_path.as_str(), theme.text_muted()))
    } else {
        Line::from(crumb_spans(crumbs, theme))
    };
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.frame));
    f.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_between_entries_only() {
        let crumbs = vec![
            BreadcrumbEntry::new("告警管理", Some("/alerts")),
            BreadcrumbEntry::new("通知渠道", Some("/alerts/channels")),
        ];
        let theme = Theme::default();
        let spans = crumb_spans(&crumbs, &theme);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "告警管理 / 通知渠道");
        assert_eq!(spans[0].style, theme.link());
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD));
    }
}
