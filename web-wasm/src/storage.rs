//! chrome.storage.local からの読み込み

use sidekick_common::{Profile, DEFAULT_SESSION_ID};
use wasm_bindgen::prelude::*;

/// プロフィールを保存しているキー
const PROFILE_KEY: &str = "profileData";
const SESSION_KEY: &str = "session_id";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get, catch)]
    async fn storage_get(keys: JsValue) -> Result<JsValue, JsValue>;
}

async fn read_key(key: &str) -> Result<Option<JsValue>, JsValue> {
    let result = storage_get(JsValue::from_str(key)).await?;
    let value = js_sys::Reflect::get(&result, &JsValue::from_str(key))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    Ok(Some(value))
}

/// 保存済みプロフィール（未保存なら None）
pub async fn load_profile() -> Result<Option<Profile>, JsValue> {
    let Some(value) = read_key(PROFILE_KEY).await? else {
        return Ok(None);
    };
    let profile: Profile = serde_wasm_bindgen::from_value(value)?;
    Ok(Some(profile))
}

/// バックエンドのセッションID（未設定なら既定値）
pub async fn load_session_id() -> String {
    match read_key(SESSION_KEY).await {
        Ok(value) => session_or_default(value.and_then(|v| v.as_string())),
        Err(e) => {
            tracing::warn!("セッションIDを読めません: {:?}", e);
            DEFAULT_SESSION_ID.to_string()
        }
    }
}

fn session_or_default(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string())
}
