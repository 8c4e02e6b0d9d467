use super::*;
use serde_json::json;

#[test]
fn get_by_path_traverses_nested_objects() {
    let v = json!({
        "data": {
            "menus": [1, 2, 3],
            "meta": {"version": 4}
        }
    });
    assert_eq!(
        get_by_path(&v, "data.menus")
            .unwrap()
            .as_array()
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        get_by_path(&v, "data.meta.version")
            .unwrap()
            .as_i64()
            .unwrap(),
        4
    );
    assert!(get_by_path(&v, "data.missing").is_none());
    assert!(get_by_path(&v, "").is_none());
}

#[test]
fn parse_menus_accepts_envelope_bare_array_and_unwrap() {
    let menu = json!({"key": "apps", "label": "应用管理", "icon": "AppstoreOutlined", "path": "apps", "index": true});
    let enveloped = json!({"code": 0, "message": "ok", "data": [menu.clone()]});
    let menus = parse_menus_from_json(enveloped, None, "menus").unwrap();
    assert_eq!(menus[0].key, "apps");

    let bare = json!([menu.clone()]);
    assert_eq!(parse_menus_from_json(bare, None, "menus").unwrap().len(), 1);

    let nested = json!({"data": {"menus": [menu]}});
    let menus = parse_menus_from_json(nested, Some("data.menus"), "menus").unwrap();
    assert_eq!(menus[0].path.as_deref(), Some("apps"));
}

#[test]
fn parse_menus_rejects_errors_and_duplicates() {
    let err = parse_menus_from_json(json!({"code": 10010004, "message": "登录超时"}), None, "menus")
        .unwrap_err();
    let failure = failure_from(&err);
    assert!(failure.session_expired);
    assert!(failure.message.contains("登录超时"));

    let dup = json!([
        {"key": "a", "label": "A"},
        {"key": "b", "label": "B", "children": [{"key": "a", "label": "A again"}]}
    ]);
    let err = parse_menus_from_json(dup, None, "menus").unwrap_err();
    assert!(format!("{err}").contains("duplicate menu key"));
    assert!(!failure_from(&err).session_expired);

    let not_array = json!({"code": 0, "data": {"key": "a"}});
    assert!(parse_menus_from_json(not_array, None, "menus").is_err());
}
