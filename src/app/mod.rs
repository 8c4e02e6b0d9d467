use crate::model::MenuNode;
use crate::nav::flatten::{flatten_nodes, row_index_of, FlatRow};
use crate::nav::index::RouteIndex;
use crate::nav::locate::locate;
use crate::nav::resolve::{find_node, resolve_full_path};
use crate::ui::{AppState, Focus, LoadFailure, ToastLevel};
use crate::widgets::route_page::build_route_page;
use std::collections::HashSet;

pub enum AppMsg {
    /// (Re)load the menu tree from the configured source.
    LoadMenus,
    MenusLoaded {
        source: String,
        outcome: Result<Vec<MenuNode>, LoadFailure>,
    },
    Navigate(String),
    /// Sidebar click on a menu key.
    ActivateKey(String),
    ActivateCursor,
    MoveCursor(isize),
    Back,
    Forward,
    ToggleCollapsed,
    ToggleFocus,
    CopyPath,
    /// Copy the current page's Markdown.
    CopyPage,
    OpenGoto,
    SubmitGoto(String),
    CancelGoto,
}

pub enum Effect {
    LoadMenus {
        cmdline: String,
        unwrap: Option<String>,
    },
    CopyToClipboard {
        text: String,
    },
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        LoadMenus => {
            let cmd = state
                .config
                .menu_command
                .clone()
                .filter(|c| !c.trim().is_empty());
            match cmd {
                Some(cmdline) if state.config.dynamic_menu => {
                    state.loading_add();
                    state.status_text = Some("Loading menus...".into());
                    effects.push(Effect::LoadMenus {
                        cmdline,
                        unwrap: state.config.menu_unwrap.clone(),
                    });
                }
                None if state.config.dynamic_menu => {
                    state.dbg("dynamic_menu is set but menu_command is empty; using static menus");
                    state.last_error = Some("dynamic_menu without menu_command".into());
                    let menus = state.config.menus.clone();
                    set_menus(state, menus, "static fallback");
                }
                _ => {
                    let menus = state.config.menus.clone();
                    set_menus(state, menus, "static config");
                }
            }
        }
        MenusLoaded { source, outcome } => {
            state.loading_del();
            state.status_text = None;
            match outcome {
                Ok(menus) => {
                    state.dbg(format!("menus loaded from {source}: {} roots", menus.len()));
                    effects.push(Effect::ShowToast {
                        text: format!("Loaded {} top-level menus", menus.len()),
                        level: ToastLevel::Info,
                        seconds: 2,
                    });
                    set_menus(state, menus, &source);
                }
                Err(failure) => {
                    state.dbg(format!("menu load failed ({source}): {}", failure.message));
                    let text = if failure.session_expired {
                        "Session expired; using static menus".to_string()
                    } else {
                        format!("Menu load failed: {}", failure.message)
                    };
                    effects.push(Effect::ShowToast {
                        text,
                        level: ToastLevel::Error,
                        seconds: 4,
                    });
                    state.last_error = Some(failure.message);
                    let fallback = state.config.menus.clone();
                    set_menus(state, fallback, "static fallback");
                }
            }
        }
        Navigate(path) => {
            state.history.push(path.clone());
            state.current_path = path;
            relocate(state);
        }
        ActivateKey(key) => {
            let Some(node) = find_node(&state.menus, &key) else {
                state.dbg(format!("menu key not found: {key}"));
                return effects;
            };
            if node.has_children() {
                if !state.expanded.remove(&key) {
                    state.expanded.insert(key.clone());
                }
                return effects;
            }
            match resolve_full_path(&state.menus, &key) {
                Some(path) => {
                    state.dbg(format!("menu {key} -> {path}"));
                    effects.extend(update(state, Navigate(path)));
                }
                None => state.dbg(format!("no path for menu key {key}")),
            }
        }
        ActivateCursor => {
            let key = visible_rows(state)
                .get(state.cursor)
                .map(|r| r.key().to_string());
            if let Some(key) = key {
                effects.extend(update(state, ActivateKey(key)));
            }
        }
        MoveCursor(delta) => {
            let total = visible_rows(state).len();
            if total > 0 {
                let cur = state.cursor as isize + delta;
                state.cursor = cur.clamp(0, total as isize - 1) as usize;
            }
        }
        Back => {
            if let Some(path) = state.history.back().map(str::to_string) {
                state.current_path = path;
                relocate(state);
            }
        }
        Forward => {
            if let Some(path) = state.history.forward().map(str::to_string) {
                state.current_path = path;
                relocate(state);
            }
        }
        ToggleCollapsed => {
            state.collapsed = !state.collapsed;
            sync_cursor(state);
        }
        ToggleFocus => {
            state.focus = match state.focus {
                Focus::Sidebar => Focus::Content,
                Focus::Content => Focus::Sidebar,
            };
        }
        CopyPath => {
            effects.push(Effect::CopyToClipboard {
                text: state.current_path.clone(),
            });
        }
        CopyPage => {
            if let Some(page) = &state.page {
                effects.push(Effect::CopyToClipboard {
                    text: page.source().to_string(),
                });
            }
        }
        OpenGoto => {
            state.goto = Some(crate::widgets::goto::GotoWidget::new(&state.current_path));
        }
        SubmitGoto(path) => {
            state.goto = None;
            let path = path.trim().to_string();
            if path.is_empty() {
                return effects;
            }
            if state.routes.key_at(&path).is_none() {
                state.dbg(format!("goto {path}: not a menu route"));
            }
            effects.extend(update(state, Navigate(path)));
        }
        CancelGoto => {
            state.goto = None;
        }
    }
    effects
}

/// Swap in a new tree snapshot and recompute everything derived from it.
fn set_menus(state: &mut AppState, menus: Vec<MenuNode>, source: &str) {
    state.routes = RouteIndex::build(&menus);
    state.menus = menus;
    state.menu_source = source.to_string();
    state.dbg(format!("{} routes indexed ({source})", state.routes.len()));
    relocate(state);
}

/// Recompute selection, breadcrumbs and page for the current path.
pub(crate) fn relocate(state: &mut AppState) {
    if state.menus.is_empty() {
        state.dbg("menus not loaded yet");
        return;
    }
    let location = locate(
        &state.menus,
        &state.config.detail_routes,
        &state.current_path,
    );
    state.dbg(format!(
        "path {} -> key {}",
        state.current_path,
        location.key.as_deref().unwrap_or("-")
    ));
    // Make the highlighted leaf visible in the sidebar
    if location.selected.len() == 2 {
        state.expanded.insert(location.selected[0].clone());
    }
    state.page = Some(build_route_page(
        &state.menus,
        &state.routes,
        &location,
        &state.current_path,
    ));
    state.location = location;
    sync_cursor(state);
}

/// Sidebar rows as currently shown; a collapsed sidebar lists top-level items
/// only.
pub(crate) fn visible_rows(state: &AppState) -> Vec<FlatRow<'_>> {
    if state.collapsed {
        flatten_nodes(&state.menus, &HashSet::new(), false)
    } else {
        flatten_nodes(&state.menus, &state.expanded, false)
    }
}

/// Put the cursor on the highlighted leaf, or on its parent when the leaf is
/// hidden.
fn sync_cursor(state: &mut AppState) {
    let target = {
        let rows = visible_rows(state);
        state
            .location
            .selected
            .iter()
            .rev()
            .find_map(|k| row_index_of(&rows, k))
    };
    if let Some(i) = target {
        state.cursor = i;
    }
}
