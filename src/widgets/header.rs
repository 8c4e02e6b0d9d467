use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::AppState;

/// Centered logo or title over a bottom border. The border turns accent while
/// requests are in flight.
pub fn draw_header(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let border = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(if state.loading > 0 {
            Style::default().fg(theme.accent)
        } else {
            theme.text_muted()
        });
    let inner = border.inner(area);
    f.render_widget(border, area);

    let mut lines: Vec<Line> = state
        .logo_lines
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), theme.selected_style())))
        .collect();
    if let Some(last) = lines.last_mut() {
        if state.loading > 0 {
            let spinner = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"][state.tick as usize % 6];
            last.spans
                .push(Span::styled(format!("  {spinner}"), theme.text_muted()));
        }
    }
    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, inner);
}
