use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};

/// Symbolic icon name attached to a menu node. Opaque to the resolver; the
/// sidebar maps it to a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Icon {
    Dashboard,
    Appstore,
    Setting,
    Bell,
    Team,
    User,
    FileText,
    BarChart,
    Api,
    Global,
    Safety,
    Database,
    Menu,
    Other(String),
}

impl From<String> for Icon {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DashboardOutlined" => Icon::Dashboard,
            "AppstoreOutlined" => Icon::Appstore,
            "SettingOutlined" => Icon::Setting,
            "BellOutlined" => Icon::Bell,
            "TeamOutlined" => Icon::Team,
            "UserOutlined" => Icon::User,
            "FileTextOutlined" => Icon::FileText,
            "BarChartOutlined" => Icon::BarChart,
            "ApiOutlined" => Icon::Api,
            "GlobalOutlined" => Icon::Global,
            "SafetyOutlined" => Icon::Safety,
            "DatabaseOutlined" => Icon::Database,
            "MenuOutlined" => Icon::Menu,
            _ => Icon::Other(s),
        }
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        let name = match icon {
            Icon::Dashboard => "DashboardOutlined",
            Icon::Appstore => "AppstoreOutlined",
            Icon::Setting => "SettingOutlined",
            Icon::Bell => "BellOutlined",
            Icon::Team => "TeamOutlined",
            Icon::User => "UserOutlined",
            Icon::FileText => "FileTextOutlined",
            Icon::BarChart => "BarChartOutlined",
            Icon::Api => "ApiOutlined",
            Icon::Global => "GlobalOutlined",
            Icon::Safety => "SafetyOutlined",
            Icon::Database => "DatabaseOutlined",
            Icon::Menu => "MenuOutlined",
            Icon::Other(s) => return s,
        };
        name.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MenuNode {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    // None: segment is the key; "" + index: parent's path; "/x": absolute; "x": relative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuNode>>,
}

impl MenuNode {
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn is_index(&self) -> bool {
        self.index.unwrap_or(false)
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbEntry {
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl BreadcrumbEntry {
    pub fn new(title: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            title: title.into(),
            path: path.map(str::to_string),
        }
    }
}

/// Breadcrumbs and sidebar selection for paths that exist as pages but not as
/// menu entries (detail and edit screens).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DetailRoute {
    pub prefix: String,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub breadcrumbs: Vec<BreadcrumbEntry>,
    #[serde(default)]
    pub select: Option<String>,
    // Match `prefix` as the whole path instead of as a prefix
    #[serde(default)]
    pub exact: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_start_path")]
    pub start_path: String,
    // Fetch the tree with `menu_command` instead of using `menus` directly
    #[serde(default)]
    pub dynamic_menu: bool,
    #[serde(default)]
    pub menu_command: Option<String>,
    #[serde(default)]
    pub menu_unwrap: Option<String>,
    #[serde(default = "default_sidebar_menus")]
    pub menus: Vec<MenuNode>,
    #[serde(default = "default_detail_routes")]
    pub detail_routes: Vec<DetailRoute>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            header: Some("Monitor Console".to_string()),
            logo: None,
            theme: ThemeMode::Dark,
            start_path: default_start_path(),
            dynamic_menu: false,
            menu_command: None,
            menu_unwrap: None,
            menus: default_sidebar_menus(),
            detail_routes: default_detail_routes(),
        }
    }
}

fn default_start_path() -> String {
    "/dashboard".to_string()
}

fn leaf(key: &str, label: &str, icon: Option<&str>, path: &str, index: bool) -> MenuNode {
    MenuNode {
        key: key.to_string(),
        label: label.to_string(),
        icon: icon.map(|s| Icon::from(s.to_string())),
        path: Some(path.to_string()),
        index: index.then_some(true),
        children: None,
    }
}

fn group(key: &str, label: &str, icon: &str, path: &str, children: Vec<MenuNode>) -> MenuNode {
    MenuNode {
        children: Some(children),
        ..leaf(key, label, Some(icon), path, false)
    }
}

/// Built-in sidebar tree, used when the config omits `menus` and as the
/// fallback when a dynamic load fails.
pub fn default_sidebar_menus() -> Vec<MenuNode> {
    vec![
        leaf("dashboard", "监控大盘", Some("DashboardOutlined"), "dashboard", true),
        leaf("apps", "应用管理", Some("AppstoreOutlined"), "apps", true),
        group(
            "configs",
            "监控配置",
            "SettingOutlined",
            "configs",
            vec![
                leaf("configs-list", "配置管理", None, "", true),
                leaf("configs-history", "配置历史", None, "history", false),
            ],
        ),
        group(
            "alerts",
            "告警管理",
            "BellOutlined",
            "alerts",
            vec![
                leaf("alerts-rules", "告警规则", None, "rules", false),
                leaf("alerts-channels", "告警渠道", None, "channels", false),
                leaf("alerts-history", "告警历史", None, "history", false),
            ],
        ),
        leaf("members", "成员管理", Some("TeamOutlined"), "members", true),
        leaf("roles", "角色权限", Some("UserOutlined"), "roles", true),
        leaf("logs", "操作日志", Some("FileTextOutlined"), "logs", true),
        leaf("analysis", "多维分析", Some("BarChartOutlined"), "analysis", true),
        leaf("plugins", "插件市场", Some("ApiOutlined"), "plugins", true),
        group(
            "settings",
            "系统设置",
            "GlobalOutlined",
            "settings",
            vec![
                leaf("settings-platform", "平台信息", None, "platform", false),
                leaf("settings-i18n", "国际化", None, "i18n", false),
                leaf("settings-auth", "登录认证", None, "auth", false),
                leaf("settings-storage", "日志与存储", None, "storage", false),
            ],
        ),
    ]
}

pub fn default_detail_routes() -> Vec<DetailRoute> {
    vec![
        DetailRoute {
            prefix: "/apps/".into(),
            exclude: vec![],
            breadcrumbs: vec![
                BreadcrumbEntry::new("应用管理", Some("/apps")),
                BreadcrumbEntry::new("应用详情", None),
            ],
            select: Some("apps".into()),
            exact: false,
        },
        DetailRoute {
            prefix: "/configs/".into(),
            exclude: vec!["/configs".into(), "/configs/history".into()],
            breadcrumbs: vec![
                BreadcrumbEntry::new("监控配置", None),
                BreadcrumbEntry::new("配置管理", Some("/configs")),
                BreadcrumbEntry::new("配置编辑", None),
            ],
            select: Some("configs-list".into()),
            exact: false,
        },
        DetailRoute {
            prefix: "/plugins/config".into(),
            exclude: vec![],
            breadcrumbs: vec![
                BreadcrumbEntry::new("插件市场", Some("/plugins")),
                BreadcrumbEntry::new("插件配置", None),
            ],
            select: Some("plugins".into()),
            exact: false,
        },
        // Home page, for dynamic trees that carry no dashboard entry
        DetailRoute {
            prefix: "/dashboard".into(),
            exclude: vec![],
            breadcrumbs: vec![BreadcrumbEntry::new("监控大盘", None)],
            select: Some("dashboard".into()),
            exact: true,
        },
    ]
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuTreeError {
    #[error("menu at {loc} has an empty key")]
    EmptyKey { loc: String },
    #[error("duplicate menu key: '{key}' at {loc} (first defined at {first})")]
    DuplicateKey {
        key: String,
        loc: String,
        first: String,
    },
}

/// Reject trees the resolver cannot answer unambiguously. Keys must be unique
/// across the whole tree, not just among siblings.
pub(crate) fn validate_menus(menus: &[MenuNode]) -> Result<(), MenuTreeError> {
    use std::collections::HashMap;
    let mut seen: HashMap<&str, String> = HashMap::new();
    let mut stack: Vec<(&MenuNode, String)> = menus
        .iter()
        .enumerate()
        .rev()
        .map(|(i, n)| (n, format!("menus[{i}]")))
        .collect();
    while let Some((node, loc)) = stack.pop() {
        if node.key.is_empty() {
            return Err(MenuTreeError::EmptyKey { loc });
        }
        if let Some(first) = seen.get(node.key.as_str()) {
            return Err(MenuTreeError::DuplicateKey {
                key: node.key.clone(),
                loc,
                first: first.clone(),
            });
        }
        seen.insert(&node.key, loc.clone());
        if let Some(children) = &node.children {
            for (i, c) in children.iter().enumerate().rev() {
                stack.push((c, format!("{loc}.children[{i}]")));
            }
        }
    }
    Ok(())
}

pub(crate) fn validate_app_config(cfg: &AppConfig) -> Result<(), String> {
    validate_menus(&cfg.menus).map_err(|e| e.to_string())?;
    if !cfg.start_path.starts_with('/') {
        return Err(format!(
            "start_path must be absolute, got '{}'",
            cfg.start_path
        ));
    }
    for (i, r) in cfg.detail_routes.iter().enumerate() {
        if r.prefix.is_empty() {
            return Err(format!("detail_routes[{i}] has an empty prefix"));
        }
        if r.breadcrumbs.is_empty() {
            return Err(format!(
                "detail route '{}' must define at least one breadcrumb",
                r.prefix
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_detects_duplicate_keys_across_levels() {
        let menus = vec![
            MenuNode {
                key: "alerts".into(),
                label: "Alerts".into(),
                children: Some(vec![MenuNode {
                    key: "history".into(),
                    label: "History".into(),
                    ..Default::default()
                }]),
                ..Default::default()
            },
            MenuNode {
                key: "history".into(),
                label: "Config history".into(),
                ..Default::default()
            },
        ];
        let err = validate_menus(&menus).unwrap_err();
        assert_eq!(
            err,
            MenuTreeError::DuplicateKey {
                key: "history".into(),
                loc: "menus[1]".into(),
                first: "menus[0].children[0]".into(),
            }
        );
        assert!(err.to_string().starts_with("duplicate menu key: 'history'"));
    }

    #[test]
    fn default_sidebar_is_valid() {
        let cfg = AppConfig::default();
        assert!(validate_app_config(&cfg).is_ok());
        assert_eq!(cfg.menus.len(), 10);
    }

    #[test]
    fn dynamic_menu_without_command_still_loads() {
        let cfg = AppConfig {
            dynamic_menu: true,
            ..Default::default()
        };
        assert!(validate_app_config(&cfg).is_ok());
    }

    #[test]
    fn detail_routes_default_to_prefix_match() {
        let yaml = r#"
detail_routes:
  - prefix: /hosts/
    breadcrumbs:
      - title: Hosts
        path: /hosts
      - title: Host
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.detail_routes.len(), 1);
        assert!(!cfg.detail_routes[0].exact);
    }

    #[test]
    fn yaml_menus_parse_with_unknown_icons() {
        let yaml = r#"
start_path: /configs
menus:
  - key: configs
    label: Configs
    icon: SettingOutlined
    path: configs
    children:
      - { key: configs-list, label: List, path: "", index: true }
      - { key: configs-history, label: History, path: history, icon: Sparkles }
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.start_path, "/configs");
        assert_eq!(cfg.menus[0].icon, Some(Icon::Setting));
        let children = cfg.menus[0].children.as_ref().unwrap();
        assert!(children[0].is_index());
        assert_eq!(children[0].path.as_deref(), Some(""));
        assert_eq!(children[1].icon, Some(Icon::Other("Sparkles".into())));
        // detail routes fall back to the built-in set
        assert_eq!(cfg.detail_routes.len(), 3);
    }
}
