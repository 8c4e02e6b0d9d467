use crate::app::{update, AppMsg, Effect};
use crate::model::{validate_app_config, AppConfig, MenuNode};
use crate::nav::history::NavigationHistory;
use crate::nav::index::RouteIndex;
use crate::nav::locate::Location;
use crate::widgets::breadcrumb::draw_breadcrumbs;
use crate::widgets::goto::GotoWidget;
use crate::widgets::header::draw_header;
use crate::widgets::markdown::MarkdownWidget;
use crate::widgets::menu::draw_menu;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::Widget;
use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

const CONFIG_FILE: &str = "console.yaml";
const CONFIG_DIR_ENV: &str = "MONITOR_CONSOLE_CONFIG_DIR";

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) header_h: u16,
    pub(crate) logo_lines: Vec<String>,
    // Current tree snapshot and its lookups
    pub(crate) menus: Vec<MenuNode>,
    pub(crate) routes: RouteIndex,
    pub(crate) menu_source: String,
    pub(crate) current_path: String,
    pub(crate) location: Location,
    pub(crate) history: NavigationHistory,
    // Sidebar
    pub(crate) expanded: HashSet<String>,
    pub(crate) cursor: usize,
    pub(crate) menu_viewport_h: u16,
    pub(crate) collapsed: bool,
    pub(crate) focus: Focus,
    // Content
    pub(crate) page: Option<MarkdownWidget>,
    pub(crate) goto: Option<GotoWidget>,
    // Pending background requests
    pub(crate) loading: usize,
    pub(crate) status_text: Option<String>,
    pub(crate) last_error: Option<String>,
    pub(crate) toast: Option<Toast>,
    pub(crate) tick: u64,
    pub(crate) boot_load_done: bool,
    pub(crate) theme: crate::theme::Theme,
    tx: Option<Sender<LoadMsg>>,
    rx: Option<Receiver<LoadMsg>>,
    // Debug log (rendered in bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    Sidebar,
    Content,
}

impl AppState {
    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg.into());
    }

    pub fn loading_add(&mut self) {
        self.loading += 1;
    }

    pub fn loading_del(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    pub(crate) fn with_config(config: AppConfig) -> Self {
        let start = config.start_path.clone();
        let theme = crate::theme::Theme::from_mode(config.theme);
        Self {
            config,
            theme,
            header_h: 3,
            current_path: start.clone(),
            history: NavigationHistory::new(start),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadFailure {
    pub(crate) message: String,
    pub(crate) session_expired: bool,
}

#[derive(Debug)]
pub(crate) struct LoadMsg {
    pub(crate) source: String,
    pub(crate) outcome: Result<Vec<MenuNode>, LoadFailure>,
}

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::LoadMenus { cmdline, unwrap } => {
                state.dbg(format!("load menus -> {cmdline}"));
                if let Some(tx) = &state.tx {
                    crate::services::loader::spawn_load_menus(cmdline, unwrap, tx.clone());
                }
            }
            Effect::CopyToClipboard { text } => {
                let copied = arboard::Clipboard::new()
                    .and_then(|mut c| c.set_text(text.clone()))
                    .is_ok();
                let (msg, level) = if copied {
                    (format!("Copied {text}"), ToastLevel::Success)
                } else {
                    ("Clipboard unavailable".to_string(), ToastLevel::Error)
                };
                run_effects(
                    state,
                    vec![Effect::ShowToast {
                        text: msg,
                        level,
                        seconds: 2,
                    }],
                );
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
        }
    }
}

fn pump_loads(state: &mut AppState) {
    let mut drained: Vec<LoadMsg> = Vec::new();
    if let Some(rx) = &state.rx {
        while let Ok(msg) = rx.try_recv() {
            drained.push(msg);
        }
    }
    for msg in drained {
        let effects = update(
            state,
            AppMsg::MenusLoaded {
                source: msg.source,
                outcome: msg.outcome,
            },
        );
        run_effects(state, effects);
    }
}

fn dispatch(state: &mut AppState, msg: AppMsg) {
    let effects = update(state, msg);
    run_effects(state, effects);
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let mut cfg = load_config()?;
    if env_flag("MONITOR_CONSOLE_DYNAMIC_MENU") {
        cfg.dynamic_menu = true;
    }
    validate_app_config(&cfg).map_err(|e| anyhow!("invalid config: {e}"))?;
    let mut state = AppState::with_config(cfg);
    init_logo_and_header(&mut state);
    let (tx, rx) = mpsc::channel::<LoadMsg>();
    state.tx = Some(tx);
    state.rx = Some(rx);

    if env_flag("MONITOR_CONSOLE_HEADLESS") {
        return run_headless(&mut state);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = event_loop(&mut terminal, &mut state);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run_headless(state: &mut AppState) -> Result<()> {
    let ticks: u64 = std::env::var("MONITOR_CONSOLE_TICKS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);
    let enter_path = std::env::var("MONITOR_CONSOLE_HEADLESS_PATH").ok();
    let backend = ratatui::backend::TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend)?;
    let mut enter_done = false;
    for _ in 0..ticks {
        if !state.boot_load_done {
            dispatch(state, AppMsg::LoadMenus);
            state.boot_load_done = true;
        }
        pump_loads(state);
        if !enter_done && !state.menus.is_empty() {
            if let Some(path) = &enter_path {
                dispatch(state, AppMsg::Navigate(path.clone()));
            }
            enter_done = true;
        }
        terminal.draw(|f| ui(f, state))?;
        state.tick = state.tick.wrapping_add(1);
        std::thread::sleep(Duration::from_millis(50));
    }
    if env_flag("MONITOR_CONSOLE_SMOKE_SUMMARY") {
        let crumbs: Vec<serde_json::Value> = state
            .location
            .breadcrumbs
            .iter()
            .map(|b| serde_json::json!({"title": b.title, "path": b.path}))
            .collect();
        let summary = serde_json::json!({
            "ok": state.last_error.is_none(),
            "menu_source": state.menu_source,
            "path": state.current_path,
            "key": state.location.key,
            "page": state.page.as_ref().map(|p| p.title()),
            "selected": state.location.selected,
            "breadcrumbs": crumbs,
            "routes": state
                .routes
                .routes()
                .map(|(key, path)| serde_json::json!({"key": key, "path": path}))
                .collect::<Vec<_>>(),
        });
        println!("{summary}");
    }
    Ok(())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut AppState) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    loop {
        if !state.boot_load_done {
            dispatch(state, AppMsg::LoadMenus);
            state.boot_load_done = true;
        }
        pump_loads(state);
        terminal.draw(|f| ui(f, state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(state, key.code, key.modifiers) {
                    return Ok(());
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    }
}

/// Returns false when the app should quit.
pub(crate) fn handle_key(state: &mut AppState, code: KeyCode, mods: KeyModifiers) -> bool {
    // Go-to prompt captures all keys while open
    if let Some(goto) = &mut state.goto {
        match code {
            KeyCode::Esc => dispatch(state, AppMsg::CancelGoto),
            KeyCode::Enter => {
                let path = goto.value();
                dispatch(state, AppMsg::SubmitGoto(path));
            }
            other => {
                goto.input(other, mods);
            }
        }
        return true;
    }
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return false;
    }
    match code {
        KeyCode::Char('q') => return false,
        KeyCode::Tab => dispatch(state, AppMsg::ToggleFocus),
        KeyCode::Char('[') => dispatch(state, AppMsg::ToggleCollapsed),
        KeyCode::Char('g') | KeyCode::Char(':') => dispatch(state, AppMsg::OpenGoto),
        KeyCode::Char('y') => dispatch(state, AppMsg::CopyPath),
        KeyCode::Char('Y') => dispatch(state, AppMsg::CopyPage),
        KeyCode::Char('r') => dispatch(state, AppMsg::LoadMenus),
        KeyCode::Left | KeyCode::Backspace if mods.contains(KeyModifiers::ALT) => {
            dispatch(state, AppMsg::Back)
        }
        KeyCode::Right if mods.contains(KeyModifiers::ALT) => dispatch(state, AppMsg::Forward),
        KeyCode::Char('b') => dispatch(state, AppMsg::Back),
        KeyCode::Char('f') => dispatch(state, AppMsg::Forward),
        _ => match state.focus {
            Focus::Sidebar => match code {
                KeyCode::Up | KeyCode::Char('k') => dispatch(state, AppMsg::MoveCursor(-1)),
                KeyCode::Down | KeyCode::Char('j') => dispatch(state, AppMsg::MoveCursor(1)),
                KeyCode::PageUp => {
                    let step = state.menu_viewport_h.max(1) as isize;
                    dispatch(state, AppMsg::MoveCursor(-step))
                }
                KeyCode::PageDown => {
                    let step = state.menu_viewport_h.max(1) as isize;
                    dispatch(state, AppMsg::MoveCursor(step))
                }
                KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') => {
                    dispatch(state, AppMsg::ActivateCursor)
                }
                _ => {}
            },
            Focus::Content => {
                if let Some(page) = &mut state.page {
                    let effs = page.on_key(code);
                    run_effects(state, effs);
                }
            }
        },
    }
    true
}

fn config_dir_candidates(cwd: &Path, home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut out = vec![cwd.join(CONFIG_FILE), cwd.join(".console").join(CONFIG_FILE)];
    let mut cur = cwd;
    while let Some(parent) = cur.parent() {
        out.push(parent.join(".console").join(CONFIG_FILE));
        cur = parent;
    }
    if let Some(home) = home {
        out.push(home.join(".console").join(CONFIG_FILE));
    }
    out
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let cfg: AppConfig = serde_yaml::from_str(&s).with_context(|| format!("parsing {path:?}"))?;
    Ok(cfg)
}

fn load_config() -> Result<AppConfig> {
    // 1) Explicit directory
    if let Ok(base) = std::env::var(CONFIG_DIR_ENV) {
        return read_config(&PathBuf::from(base).join(CONFIG_FILE));
    }
    // 2) CWD, CWD/.console, ancestors' .console, then ~/.console
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from);
    for p in config_dir_candidates(&cwd, home) {
        if p.exists() {
            if let Some(dir) = p.parent() {
                std::env::set_var(CONFIG_DIR_ENV, dir);
            }
            return read_config(&p);
        }
    }
    // 3) Built-in sidebar menu
    Ok(AppConfig::default())
}

fn init_logo_and_header(state: &mut AppState) {
    let mut lines: Vec<String> = Vec::new();
    if let Some(path) = state.config.logo.clone() {
        let pb = PathBuf::from(&path);
        let full = if pb.is_absolute() {
            pb
        } else if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            PathBuf::from(dir).join(&path)
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(&path)
        };
        if let Ok(s) = fs::read_to_string(&full) {
            lines = s.lines().map(|l| l.to_string()).collect();
        }
    }
    if lines.is_empty() {
        let title = state
            .config
            .header
            .clone()
            .unwrap_or_else(|| "Monitor Console".to_string());
        lines = vec![title];
    }
    // One extra row for the header's bottom border
    state.header_h = (lines.len() as u16).saturating_add(1);
    state.logo_lines = lines;
}

pub(crate) fn ui(f: &mut Frame, state: &mut AppState) {
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }
    let screen = f.area();
    f.render_widget(Block::default().style(state.theme.base_style()), screen);

    const DEBUG_H: u16 = 5;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(state.header_h.max(1)),
            Constraint::Length(2), // breadcrumbs
            Constraint::Min(0),
            Constraint::Length(DEBUG_H),
            Constraint::Length(1),
        ])
        .split(screen);

    draw_header(f, rows[0], state);
    draw_breadcrumbs(f, rows[1], state);

    let sidebar_w = if state.collapsed { 6 } else { 28 };
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_w), Constraint::Min(0)])
        .split(rows[2]);

    state.menu_viewport_h = body[0].height.saturating_sub(2);
    draw_menu(f, body[0], state);
    draw_content(f, body[1], state);
    draw_debug(f, rows[3], state);

    let help = if state.goto.is_some() {
        "Enter go  Esc cancel"
    } else {
        match state.focus {
            Focus::Sidebar => {
                "↑/↓ select  Enter open  Tab content  g go to  b/f back/fwd  y/Y copy path/page  [ collapse  r reload  q quit"
            }
            Focus::Content => "↑/↓ scroll  PgUp/PgDn  w wrap  Tab sidebar  q quit",
        }
    };
    draw_footer(f, rows[4], state, help);

    if let Some(goto) = &mut state.goto {
        goto.render(f, screen, true, state.tick);
    }
}

fn draw_content(f: &mut Frame, area: Rect, state: &mut AppState) {
    let focused = state.focus == Focus::Content;
    if let Some(page) = &mut state.page {
        page.render(f, area, focused, state.tick);
        return;
    }
    let text = if state.loading > 0 {
        "Loading menus..."
    } else {
        "No menu loaded."
    };
    let p = Paragraph::new(text)
        .style(state.theme.text_muted())
        .block(crate::widgets::chrome::panel_block("Page", focused));
    f.render_widget(p, area);
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            "Debug",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
    let h = area.height.saturating_sub(1) as usize;
    let start = state.debug_log.len().saturating_sub(h);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(start)
        .map(|s| Line::raw(s.clone()))
        .collect();
    let p = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn booted() -> AppState {
        let mut st = AppState::with_config(AppConfig::default());
        dispatch(&mut st, AppMsg::LoadMenus);
        st
    }

    fn screen_text(st: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, st)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_sidebar_breadcrumbs_and_page() {
        let mut st = booted();
        dispatch(&mut st, AppMsg::Navigate("/alerts/channels".into()));
        let text = screen_text(&mut st);
        assert!(text.contains("/alerts/channels"));
        assert!(text.contains("Debug"));
    }

    #[test]
    fn goto_prompt_navigates_on_enter() {
        let mut st = booted();
        assert!(handle_key(&mut st, KeyCode::Char('g'), KeyModifiers::NONE));
        assert!(st.goto.is_some());
        // clear the prefilled path, then type a new one
        for _ in 0..st.current_path.chars().count() {
            handle_key(&mut st, KeyCode::Backspace, KeyModifiers::NONE);
        }
        for c in "/settings/auth".chars() {
            handle_key(&mut st, KeyCode::Char(c), KeyModifiers::NONE);
        }
        handle_key(&mut st, KeyCode::Enter, KeyModifiers::NONE);
        assert!(st.goto.is_none());
        assert_eq!(st.current_path, "/settings/auth");
        assert_eq!(st.location.selected, vec!["settings", "settings-auth"]);
    }

    #[test]
    fn quit_keys() {
        let mut st = booted();
        assert!(!handle_key(&mut st, KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!handle_key(
            &mut st,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        ));
    }

    #[test]
    fn config_candidates_walk_ancestors() {
        let c = config_dir_candidates(Path::new("/srv/ops/app"), Some(PathBuf::from("/home/me")));
        assert_eq!(c[0], PathBuf::from("/srv/ops/app/console.yaml"));
        assert_eq!(c[1], PathBuf::from("/srv/ops/app/.console/console.yaml"));
        assert!(c.contains(&PathBuf::from("/srv/.console/console.yaml")));
        assert_eq!(
            c.last().unwrap(),
            &PathBuf::from("/home/me/.console/console.yaml")
        );
    }
}
