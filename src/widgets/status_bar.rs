use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState, help_text: &str) {
    let theme = &state.theme;
    let mut spans: Vec<Span> = Vec::new();
    if let Some(msg) = &state.status_text {
        let spinner = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"][state.tick as usize % 6];
        spans.push(Span::raw(format!(" {spinner} {msg}  |  ")));
    }
    if let Some(t) = &state.toast {
        let color = theme.toast_color(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[ERROR]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::styled(
            format!("{tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}  |  ", t.text),
            Style::default().fg(color),
        ));
    }
    let nav = format!(
        "{}{} ",
        if state.history.can_go_back() { "◀" } else { " " },
        if state.history.can_go_forward() { "▶" } else { " " },
    );
    spans.push(Span::styled(nav, theme.link()));
    let source = if state.routes.is_empty() {
        "no menu".to_string()
    } else {
        format!("{} ({} routes)", state.menu_source, state.routes.len())
    };
    spans.push(Span::styled(format!("{source}  |  "), theme.text_muted()));
    spans.push(Span::styled(help_text.to_string(), theme.text_muted()));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
