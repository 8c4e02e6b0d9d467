use serde_json::Value as JsonValue;

/// Backend codes meaning the login session is gone.
pub const SESSION_EXPIRED_CODES: [i64; 2] = [10010004, 173001];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ApiError {
    // Raw `code` as sent, e.g. `500` or `"E42"`
    pub code: String,
    pub message: String,
    pub session_expired: bool,
}

/// Accept responses whose `code` is absent, null or the integer 0; reject
/// any other code with the server message. `origin` names the request in the
/// fallback message.
pub fn check_envelope(v: JsonValue, origin: &str) -> Result<JsonValue, ApiError> {
    let code = match v.get("code") {
        None | Some(JsonValue::Null) => return Ok(v),
        Some(c) if c.as_i64() == Some(0) => return Ok(v),
        Some(c) => c,
    };
    let session_expired = code
        .as_i64()
        .is_some_and(|n| SESSION_EXPIRED_CODES.contains(&n));
    let code = match code {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    let message = v
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed: {origin}"));
    Err(ApiError {
        code,
        message,
        session_expired,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_code_and_bare_payloads_pass() {
        let ok = json!({"code": 0, "data": [1]});
        assert_eq!(check_envelope(ok.clone(), "menus").unwrap(), ok);
        let bare = json!([{"key": "a"}]);
        assert!(check_envelope(bare, "menus").is_ok());
    }

    #[test]
    fn non_zero_code_fails_with_message() {
        let err = check_envelope(json!({"code": 500, "message": "boom"}), "menus").unwrap_err();
        assert_eq!(err.code, "500");
        assert_eq!(err.message, "boom");
        assert!(!err.session_expired);

        let err = check_envelope(json!({"code": "42"}), "curl menus").unwrap_err();
        assert_eq!(err.message, "request failed: curl menus");
    }

    #[test]
    fn only_integer_zero_counts_as_success() {
        assert!(check_envelope(json!({"code": null, "data": []}), "menus").is_ok());
        for code in [json!("0"), json!("E42"), json!(0.5), json!(true)] {
            let err = check_envelope(json!({"code": code, "data": []}), "menus").unwrap_err();
            assert!(!err.session_expired);
        }
        let err = check_envelope(json!({"code": "E42", "message": "bad"}), "menus").unwrap_err();
        assert_eq!(err.code, "E42");
        assert_eq!(err.to_string(), "bad (code E42)");
        // Session codes are numeric only
        let err = check_envelope(json!({"code": "173001"}), "menus").unwrap_err();
        assert!(!err.session_expired);
    }

    #[test]
    fn session_codes_are_flagged() {
        let err = check_envelope(json!({"code": 173001, "message": "登录超时"}), "menus")
            .unwrap_err();
        assert!(err.session_expired);
        let wrapped: anyhow::Error = err.into();
        assert!(wrapped.downcast_ref::<ApiError>().is_some());
    }
}
