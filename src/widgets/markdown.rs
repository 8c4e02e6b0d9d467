use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Scrollable page body rendered from a small Markdown subset:
/// - `#`/`##`/`###` headings in bold
/// - fenced code blocks highlighted with syntect (language taken from the fence)
/// - everything else as plain lines
pub struct MarkdownWidget {
    title: String,
    lines: Vec<Line<'static>>,
    scroll_y: u16,
    wrap: bool,
    last_viewport_h: u16,
    source: String,
}

impl MarkdownWidget {
    pub fn from_text(title: impl Into<String>, text: &str) -> Self {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut in_code = false;
        let mut code_buf: Vec<String> = Vec::new();
        let mut code_lang: Option<String> = None;
        for raw in text.lines() {
            let trimmed = raw.trim_end_matches('\r');
            if trimmed.starts_with("```") {
                if in_code {
                    lines.append(&mut highlight_code(
                        &code_buf.join("\n"),
                        code_lang.as_deref(),
                    ));
                    code_buf.clear();
                    code_lang = None;
                } else {
                    let lang = trimmed.trim_start_matches("```").trim();
                    if !lang.is_empty() {
                        code_lang = Some(lang.to_string());
                    }
                }
                in_code = !in_code;
                continue;
            }
            if in_code {
                code_buf.push(trimmed.to_string());
                continue;
            }
            if let Some(heading) = ["### ", "## ", "# "]
                .iter()
                .find_map(|marker| trimmed.strip_prefix(marker))
            {
                lines.push(Line::from(Span::styled(
                    heading.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(trimmed.to_string()));
            }
        }
        // Unterminated fence
        if in_code && !code_buf.is_empty() {
            lines.append(&mut highlight_code(
                &code_buf.join("\n"),
                code_lang.as_deref(),
            ));
        }
        Self {
            title: title.into(),
            lines,
            scroll_y: 0,
            wrap: true,
            last_viewport_h: 0,
            source: text.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The Markdown text this page was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn max_scroll(&self) -> u16 {
        (self.lines.len() as u16).saturating_sub(self.last_viewport_h)
    }
}

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
static THEME: OnceLock<Theme> = OnceLock::new();

fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn get_theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let ts = THEME_SET.get_or_init(ThemeSet::load_defaults);
        ts.themes
            .get("base16-ocean.dark")
            .cloned()
            .unwrap_or_else(|| ts.themes.values().next().cloned().unwrap_or_default())
    })
}

fn highlight_code(code: &str, lang: Option<&str>) -> Vec<Line<'static>> {
    let ps = get_syntax_set();
    let syn: &SyntaxReference = match lang {
        Some(l) if !l.is_empty() => ps
            .find_syntax_by_token(l)
            .unwrap_or_else(|| ps.find_syntax_plain_text()),
        _ => ps.find_syntax_plain_text(),
    };
    let mut high = HighlightLines::new(syn, get_theme());
    code.split('\n')
        .map(|line| {
            let regions: Vec<(SynStyle, &str)> =
                high.highlight_line(line, ps).unwrap_or_default();
            let spans: Vec<Span<'static>> = regions
                .into_iter()
                .map(|(st, seg)| {
                    let fg = st.foreground;
                    let mut style = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
                    if st.font_style.contains(FontStyle::BOLD) {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    if st.font_style.contains(FontStyle::ITALIC) {
                        style = style.add_modifier(Modifier::ITALIC);
                    }
                    Span::styled(seg.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

impl crate::widgets::Widget for MarkdownWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, _tick: u64) {
        self.last_viewport_h = area.height.saturating_sub(2);
        self.scroll_y = self.scroll_y.min(self.max_scroll());
        let p = Paragraph::new(self.lines.clone())
            .block(panel_block(&self.title, focused))
            .wrap(Wrap { trim: !self.wrap })
            .scroll((self.scroll_y, 0));
        f.render_widget(p, area);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<crate::app::Effect> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_y = self.scroll_y.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_y = self.scroll_y.saturating_add(1).min(self.max_scroll());
            }
            KeyCode::PageUp => {
                self.scroll_y = self.scroll_y.saturating_sub(self.last_viewport_h);
            }
            KeyCode::PageDown => {
                self.scroll_y = self
                    .scroll_y
                    .saturating_add(self.last_viewport_h)
                    .min(self.max_scroll());
            }
            KeyCode::Home => self.scroll_y = 0,
            KeyCode::End => self.scroll_y = self.max_scroll(),
            KeyCode::Char('w') => self.wrap = !self.wrap,
            _ => {}
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Widget;

    #[test]
    fn headings_lose_markers_and_fences_are_hidden() {
        let md = MarkdownWidget::from_text("T", "# Title\nplain\n```json\n{\"a\": 1}\n```\n");
        let texts: Vec<String> = md
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(texts[0], "Title");
        assert_eq!(texts[1], "plain");
        assert!(texts.iter().any(|t| t.contains("\"a\"")));
        assert!(!texts.iter().any(|t| t.starts_with("```")));
        assert_eq!(md.source(), "# Title\nplain\n```json\n{\"a\": 1}\n```\n");
    }

    #[test]
    fn only_spaced_markers_make_headings() {
        let md = MarkdownWidget::from_text("T", "## Routes\n#hashtag\n####deep");
        let texts: Vec<String> = md
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(texts, vec!["Routes", "#hashtag", "####deep"]);
        assert!(md.lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(!md.lines[1].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let text = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut md = MarkdownWidget::from_text("T", &text);
        md.last_viewport_h = 10;
        md.on_key(KeyCode::End);
        assert_eq!(md.scroll_y, 40);
        md.on_key(KeyCode::PageDown);
        assert_eq!(md.scroll_y, 40);
        md.on_key(KeyCode::Home);
        md.on_key(KeyCode::Up);
        assert_eq!(md.scroll_y, 0);
    }
}
