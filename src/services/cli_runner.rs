use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::process::Command;
use std::{collections::HashMap, env};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Expand `${VAR}` from `vars`. `${API_URL}` falls back to
/// `MONITOR_CONSOLE_API_URL`, then to the local dev server.
pub(crate) fn expand_with(cmdline: &str, vars: &HashMap<String, String>) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z0-9_]+)\}")?;
    Ok(re
        .replace_all(cmdline, |caps: &regex::Captures| {
            let key = &caps[1];
            if key == "API_URL" {
                let url = vars
                    .get("API_URL")
                    .or_else(|| vars.get("MONITOR_CONSOLE_API_URL"))
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_API_URL);
                // Keep it a single arg in shlex::split
                if url.chars().any(|c| c.is_whitespace()) {
                    return format!("\"{}\"", url.replace('"', "\\\""));
                }
                return url.to_string();
            }
            vars.get(key).cloned().unwrap_or_default()
        })
        .to_string())
}

fn expand_cmdline_env(cmdline: &str) -> Result<String> {
    let env_map: HashMap<String, String> = env::vars().collect();
    expand_with(cmdline, &env_map)
}

/// Run a command line and parse its stdout as JSON.
pub fn run_cmdline_to_json(cmdline: &str) -> Result<JsonValue> {
    let expanded = expand_cmdline_env(cmdline)?;
    let parts = shlex::split(&expanded).ok_or_else(|| anyhow!("Failed to parse command line"))?;
    if parts.is_empty() {
        return Err(anyhow!("Empty command line"));
    }
    let program = &parts[0];
    let args = &parts[1..];
    let output = Command::new(program)
        .args(args)
        .env("MONITOR_CONSOLE_JSON", "1")
        .output()
        .with_context(|| format!("spawning {expanded}"))?;
    if !output.status.success() {
        let err = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(anyhow!("Command failed: {}\n{}", cmdline, err));
    }
    let text = String::from_utf8_lossy(&output.stdout).to_string();
    let v: JsonValue = serde_json::from_str(&text).with_context(|| "parsing command JSON")?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn api_url_defaults_and_overrides() {
        let cmd = "curl -s ${API_URL}/api/menus";
        assert_eq!(
            expand_with(cmd, &HashMap::new()).unwrap(),
            "curl -s http://localhost:3000/api/menus"
        );
        let v = vars(&[("MONITOR_CONSOLE_API_URL", "https://ops.example")]);
        assert_eq!(
            expand_with(cmd, &v).unwrap(),
            "curl -s https://ops.example/api/menus"
        );
    }

    #[test]
    fn unknown_vars_expand_to_empty() {
        let v = vars(&[("TOKEN", "abc")]);
        assert_eq!(
            expand_with("fetch --token=${TOKEN} ${MISSING}x", &v).unwrap(),
            "fetch --token=abc x"
        );
    }

    #[test]
    fn empty_command_is_an_error() {
        let err = run_cmdline_to_json("   ").unwrap_err();
        assert!(format!("{err}").contains("Empty command line"));
    }
}
