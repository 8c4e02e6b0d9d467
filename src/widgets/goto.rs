use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::crossterm::event as rt_event;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear};
use tui_textarea::TextArea;

/// Single-line prompt for jumping to an arbitrary route path.
pub struct GotoWidget {
    ta: TextArea<'static>,
}

impl GotoWidget {
    pub fn new(initial: &str) -> Self {
        let mut ta = TextArea::default();
        ta.set_cursor_line_style(Style::default());
        ta.insert_str(initial);
        Self { ta }
    }

    pub fn value(&self) -> String {
        self.ta.lines().join("")
    }

    /// Feed a key to the text area. Enter is handled by the caller, so the
    /// value never spans more than one line.
    pub fn input(&mut self, code: KeyCode, mods: KeyModifiers) {
        let code = match code {
            KeyCode::Char(c) => rt_event::KeyCode::Char(c),
            KeyCode::Backspace => rt_event::KeyCode::Backspace,
            KeyCode::Delete => rt_event::KeyCode::Delete,
            KeyCode::Left => rt_event::KeyCode::Left,
            KeyCode::Right => rt_event::KeyCode::Right,
            KeyCode::Home => rt_event::KeyCode::Home,
            KeyCode::End => rt_event::KeyCode::End,
            _ => return,
        };
        let mods = rt_event::KeyModifiers::from_bits_truncate(mods.bits());
        let _ = self.ta.input(rt_event::KeyEvent::new(code, mods));
    }
}

impl crate::widgets::Widget for GotoWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, _focused: bool, _tick: u64) {
        self.ta.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title("Go to path: Enter go, Esc cancel"),
        );
        let rect = prompt_rect(area);
        f.render_widget(Clear, rect);
        f.render_widget(&self.ta, rect);
    }
}

/// Three rows tall (one line plus borders), 60% wide, centered.
fn prompt_rect(area: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .split(area);
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(v[1]);
    h[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_current_path_and_edits_in_place() {
        let mut g = GotoWidget::new("/alerts");
        assert_eq!(g.value(), "/alerts");
        g.input(KeyCode::Char('/'), KeyModifiers::NONE);
        g.input(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(g.value(), "/alerts/x");
        g.input(KeyCode::Backspace, KeyModifiers::NONE);
        g.input(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(g.value(), "/alerts");
    }

    #[test]
    fn ignores_keys_that_would_break_the_line() {
        let mut g = GotoWidget::new("/a");
        g.input(KeyCode::Enter, KeyModifiers::NONE);
        g.input(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(g.value(), "/a");
    }
}
