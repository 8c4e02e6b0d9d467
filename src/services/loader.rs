use crate::model::{validate_menus, MenuNode};
use crate::services::cli_runner::run_cmdline_to_json;
use crate::services::envelope::{check_envelope, ApiError};
use crate::ui::{LoadFailure, LoadMsg};
use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::sync::mpsc::Sender;
use std::thread;

pub fn get_by_path<'a>(v: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut cur = v;
    for seg in path.split('.') {
        cur = cur.get(seg)?;
    }
    Some(cur)
}

/// Pull the menu array out of a command response.
/// unwrap formats:
/// - None: a bare array, else `data`
/// - "data.menus": dot path to the array
pub(crate) fn parse_menus_from_json(
    v: JsonValue,
    unwrap: Option<&str>,
    origin: &str,
) -> Result<Vec<MenuNode>> {
    let v = check_envelope(v, origin)?;
    let target = match unwrap {
        Some(path) if !path.is_empty() => get_by_path(&v, path),
        _ if v.is_array() => Some(&v),
        _ => v.get("data"),
    };
    let arr = target
        .filter(|t| t.is_array())
        .ok_or_else(|| anyhow!("no menu array in response of {origin}"))?;
    let menus: Vec<MenuNode> =
        serde_json::from_value(arr.clone()).with_context(|| format!("parsing menus from {origin}"))?;
    validate_menus(&menus).map_err(|e| anyhow!("{origin}: {e}"))?;
    Ok(menus)
}

pub fn load_menus_cmd(cmdline: &str, unwrap: Option<&str>) -> Result<Vec<MenuNode>> {
    let v = run_cmdline_to_json(cmdline)?;
    parse_menus_from_json(v, unwrap, cmdline)
}

pub(crate) fn failure_from(err: &anyhow::Error) -> LoadFailure {
    let session_expired = err
        .downcast_ref::<ApiError>()
        .map(|e| e.session_expired)
        .unwrap_or(false);
    LoadFailure {
        message: format!("{err:#}"),
        session_expired,
    }
}

/// Fetch the menu tree off-thread and report back on `tx`.
pub fn spawn_load_menus(cmdline: String, unwrap: Option<String>, tx: Sender<LoadMsg>) {
    thread::spawn(move || {
        let outcome = load_menus_cmd(&cmdline, unwrap.as_deref()).map_err(|e| failure_from(&e));
        let _ = tx.send(LoadMsg {
            source: cmdline,
            outcome,
        });
    });
}

#[cfg(test)]
mod loader_tests;
