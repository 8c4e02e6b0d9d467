use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub frame: Color,
    pub selected: Color,
    // sidebar group whose child is active
    pub ancestor: Color,
    pub success: Color,
    pub error: Color,
    pub muted: Color,
}

impl Theme {
    pub fn console_dark() -> Self {
        Self {
            bg: Color::Rgb(0, 21, 41),
            fg: Color::White,
            accent: Color::Rgb(24, 144, 255),
            frame: Color::Rgb(90, 90, 100),
            selected: Color::Rgb(24, 144, 255),
            ancestor: Color::Rgb(145, 213, 255),
            success: Color::Green,
            error: Color::Red,
            muted: Color::DarkGray,
        }
    }

    pub fn console_light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 247),
            fg: Color::Rgb(20, 20, 22),
            accent: Color::Rgb(24, 144, 255),
            frame: Color::Rgb(200, 200, 210),
            selected: Color::Rgb(9, 88, 217),
            ancestor: Color::Rgb(64, 120, 200),
            success: Color::Rgb(0, 150, 0),
            error: Color::Rgb(200, 0, 0),
            muted: Color::Rgb(120, 120, 130),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::console_dark(),
            ThemeMode::Light => Self::console_light(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::console_dark()
    }
}

impl Theme {
    pub fn base_style(&self) -> Style {
        Style::default().bg(self.bg).fg(self.fg)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.selected)
    }

    pub fn border_unfocused(&self) -> Style {
        Style::default().fg(self.frame)
    }

    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn link(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn list_cursor_style(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    pub fn ancestor_style(&self) -> Style {
        Style::default().fg(self.ancestor)
    }

    pub fn toast_color(&self, level: crate::ui::ToastLevel) -> Color {
        match level {
            crate::ui::ToastLevel::Success => self.success,
            crate::ui::ToastLevel::Error => self.error,
            crate::ui::ToastLevel::Info => self.accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mode_picks_palette() {
        assert_eq!(Theme::from_mode(ThemeMode::Light).bg, Theme::console_light().bg);
        assert_eq!(Theme::default().bg, Theme::from_mode(ThemeMode::Dark).bg);
    }
}
