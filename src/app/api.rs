//! Client-side API functions for fetching data.
//!
//! Plain fetch against the JSON API; the bearer token from localStorage is
//! attached when present. Each helper has an SSR stub so server rendering
//! never issues network calls.

use serde::{Deserialize, Serialize};

// =============================================================================
// Wire types
// =============================================================================

/// Signed-in user as the API reports it
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

/// Login / register response
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionPayload {
    pub token: String,
    pub user: UserInfo,
    #[serde(default)]
    pub role: Option<String>,
}

/// GET /api/auth/session response
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WhoAmI {
    pub user: UserInfo,
    #[serde(default)]
    pub role: Option<String>,
}

/// GET /api/users/{id} response
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Event as listed and edited
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    pub sport: String,
    pub city: String,
    pub area: String,
    pub date_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_by: String,
    pub creator_email: String,
    #[serde(default)]
    pub created_at: String,
}

/// Request body for event create / update
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EventPayload {
    pub title: String,
    pub sport: String,
    pub city: String,
    pub area: String,
    pub date_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Reference item (category, city or area)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RefOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city_name: Option<String>,
}

/// Request body for reference-data adds
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RefAddPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
}

/// POST /api/upload request / response
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadPayload {
    pub file_name: String,
    pub data: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadResult {
    pub url: String,
}

// =============================================================================
// Token persistence (localStorage)
// =============================================================================

#[cfg(target_arch = "wasm32")]
const TOKEN_KEY: &str = "sb-token";

#[cfg(target_arch = "wasm32")]
pub fn load_token() -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage.get_item(TOKEN_KEY).ok()?
}

#[cfg(target_arch = "wasm32")]
pub fn save_token(token: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn clear_token() {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_token() -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_token(_token: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear_token() {}

// =============================================================================
// Fetch helpers (client-side only)
// =============================================================================

/// One request through the browser fetch API, bearer token attached
#[cfg(target_arch = "wasm32")]
async fn request_json<R: for<'de> Deserialize<'de>>(
    method: &str,
    url: &str,
    token: Option<String>,
    body: Option<String>,
) -> Result<R, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    let window = web_sys::window().ok_or("No window")?;

    let headers = Headers::new().map_err(|e| format!("{:?}", e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{:?}", e))?;
    if let Some(token) = token {
        headers
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(|e| format!("{:?}", e))?;
    }

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_headers(&headers);
    if let Some(body) = body {
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{:?}", e))?;

    let resp: Response = resp_value.dyn_into().map_err(|_| "Not a Response")?;

    let json = JsFuture::from(resp.json().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("{:?}", e))?;

    if !resp.ok() {
        // Error bodies carry {"error": "..."}
        let message = js_sys::Reflect::get(&json, &"error".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| format!("HTTP {}", resp.status()));
        return Err(message);
    }

    serde_wasm_bindgen::from_value(json).map_err(|e| format!("{:?}", e))
}

/// Fetch JSON from a URL (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_json<R: for<'de> Deserialize<'de>>(url: &str) -> Result<R, String> {
    request_json("GET", url, load_token(), None).await
}

/// POST JSON to a URL (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn post_json<T: Serialize, R: for<'de> Deserialize<'de>>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    request_json("POST", url, load_token(), Some(body)).await
}

/// POST with an explicit bearer token. Sign-out clears the stored token
/// right away, so its revocation request carries the token it captured.
#[cfg(target_arch = "wasm32")]
pub async fn post_json_with_token<T: Serialize, R: for<'de> Deserialize<'de>>(
    url: &str,
    token: &str,
    body: &T,
) -> Result<R, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    request_json("POST", url, Some(token.to_string()), Some(body)).await
}

/// PUT JSON to a URL (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn put_json<T: Serialize, R: for<'de> Deserialize<'de>>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    request_json("PUT", url, load_token(), Some(body)).await
}

/// DELETE a resource (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn delete_json<R: for<'de> Deserialize<'de>>(url: &str) -> Result<R, String> {
    request_json("DELETE", url, load_token(), None).await
}

// SSR stubs - return errors (should not be called during SSR)

#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_json<R: for<'de> Deserialize<'de>>(_url: &str) -> Result<R, String> {
    Err("fetch_json is only available in browser".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn post_json<T: Serialize, R: for<'de> Deserialize<'de>>(
    _url: &str,
    _body: &T,
) -> Result<R, String> {
    Err("post_json is only available in browser".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn post_json_with_token<T: Serialize, R: for<'de> Deserialize<'de>>(
    _url: &str,
    _token: &str,
    _body: &T,
) -> Result<R, String> {
    Err("post_json_with_token is only available in browser".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn put_json<T: Serialize, R: for<'de> Deserialize<'de>>(
    _url: &str,
    _body: &T,
) -> Result<R, String> {
    Err("put_json is only available in browser".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn delete_json<R: for<'de> Deserialize<'de>>(_url: &str) -> Result<R, String> {
    Err("delete_json is only available in browser".to_string())
}
