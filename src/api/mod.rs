//! HTTP API handlers

use crate::auth::{AuthError, Identity, Role, SessionTokens, User, UserStore};
use crate::storage::ObjectStorage;
use crate::store::{EventFields, EventRecord, EventStore, RefItem, RefKind, RefStore, StoreError};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub sessions: SessionTokens,
    pub events: EventStore,
    pub refs: RefStore,
    pub storage: ObjectStorage,
    pub admin_email: Option<String>,
}

impl AppState {
    pub fn new(data_dir: std::path::PathBuf, admin_email: Option<String>) -> Self {
        Self {
            users: UserStore::new(data_dir.clone()),
            sessions: SessionTokens::new(),
            events: EventStore::new(data_dir.clone()),
            refs: RefStore::new(data_dir.clone()),
            storage: ObjectStorage::new(data_dir),
            admin_email,
        }
    }
}

/// API routes; mounted by main alongside the UI
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/status", get(status_handler))
        // Auth
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/session", get(session_handler))
        .route("/api/users/{user_id}", get(user_handler))
        // Events
        .route("/api/events", get(events_list_handler))
        .route("/api/events", post(event_create_handler))
        .route("/api/events/{event_id}", get(event_handler))
        .route("/api/events/{event_id}", axum::routing::put(event_update_handler))
        .route("/api/events/{event_id}", delete(event_delete_handler))
        .route("/api/my-events", get(my_events_handler))
        // Reference data
        .route("/api/categories", get(categories_list_handler))
        .route("/api/categories", post(categories_add_handler))
        .route("/api/categories/{id}", delete(categories_delete_handler))
        .route("/api/cities", get(cities_list_handler))
        .route("/api/cities", post(cities_add_handler))
        .route("/api/cities/{id}", delete(cities_delete_handler))
        .route("/api/areas", get(areas_list_handler))
        .route("/api/areas", post(areas_add_handler))
        .route("/api/areas/{id}", delete(areas_delete_handler))
        // Images
        .route("/api/upload", post(upload_handler))
        .route("/uploads/{file_name}", get(uploads_handler))
        .with_state(state)
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidEmail | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
            AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl StoreError {
    fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::NotOwner => StatusCode::FORBIDDEN,
            StoreError::EmptyName | StoreError::MissingCity => StatusCode::BAD_REQUEST,
        }
    }
}

/// Resolve the bearer token in the Authorization header to a user
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, axum::response::Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))?;

    let user_id = state
        .sessions
        .user_id_for(token)
        .await
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "invalid or expired session"))?;

    state
        .users
        .get(&user_id)
        .await
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "unknown user"))
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, axum::response::Response> {
    let user = authenticate(state, headers).await?;
    if user.role != Role::Admin {
        return Err(error_response(StatusCode::FORBIDDEN, "admin role required"));
    }
    Ok(user)
}

// =============================================================================
// Status
// =============================================================================

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
    pub events: usize,
    pub users_registered: bool,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "sports-buddy",
        version: env!("SB_VERSION"),
        git_sha: env!("SB_GIT_SHA"),
        events: state.events.list_recent().await.len(),
        users_registered: state.users.count().await > 0,
    })
}

// =============================================================================
// Auth handlers
// =============================================================================

/// Register / login request body
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Session response: a token plus who it belongs to
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: Identity,
    pub role: Role,
}

/// POST /api/auth/register - Create an account and sign in
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    match state
        .users
        .register(&req.email, &req.password, state.admin_email.as_deref())
        .await
    {
        Ok(user) => {
            let token = state.sessions.issue(&user.id).await;
            (
                StatusCode::CREATED,
                Json(SessionResponse {
                    token,
                    user: Identity::from(&user),
                    role: user.role,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e.status(), e.to_string()),
    }
}

/// POST /api/auth/login - Sign in with email and password
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    match state.users.verify(&req.email, &req.password).await {
        Ok(user) => {
            let token = state.sessions.issue(&user.id).await;
            (
                StatusCode::OK,
                Json(SessionResponse {
                    token,
                    user: Identity::from(&user),
                    role: user.role,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(e.status(), e.to_string()),
    }
}

/// POST /api/auth/logout - Revoke the presented token
pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.sessions.revoke(token).await;
    }
    // Logout is idempotent; a missing or stale token is still a success
    (StatusCode::OK, Json(serde_json::json!({"ok": true}))).into_response()
}

/// Who-am-I response
#[derive(Serialize)]
pub struct WhoAmIResponse {
    pub user: Identity,
    pub role: Role,
}

/// GET /api/auth/session - Resolve the presented token
pub async fn session_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    match authenticate(&state, &headers).await {
        Ok(user) => (
            StatusCode::OK,
            Json(WhoAmIResponse {
                user: Identity::from(&user),
                role: user.role,
            }),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

/// Public view of a user
#[derive(Serialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// GET /api/users/{user_id} - Look up a user's public record
pub async fn user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    match state.users.get(&user_id).await {
        Some(user) => (
            StatusCode::OK,
            Json(UserView {
                id: user.id,
                email: user.email,
                role: user.role,
            }),
        )
            .into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("User not found: {}", user_id)),
    }
}

// =============================================================================
// Event handlers
// =============================================================================

/// GET /api/events - All events, newest first
pub async fn events_list_handler(State(state): State<AppState>) -> Json<Vec<EventRecord>> {
    Json(state.events.list_recent().await)
}

/// GET /api/my-events - Events created by the signed-in user
pub async fn my_events_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    match authenticate(&state, &headers).await {
        Ok(user) => Json(state.events.list_by_creator(&user.id).await).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/events/{event_id} - Get one event
pub async fn event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    match state.events.get(&event_id).await {
        Some(event) => (StatusCode::OK, Json(event)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Event not found: {}", event_id),
        ),
    }
}

/// POST /api/events - Publish an event
pub async fn event_create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(fields): Json<EventFields>,
) -> impl IntoResponse {
    let user = match authenticate(&state, &headers).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let event = state.events.create(fields, &Identity::from(&user)).await;
    (StatusCode::CREATED, Json(event)).into_response()
}

/// PUT /api/events/{event_id} - Update an event (creator only)
pub async fn event_update_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
    Json(fields): Json<EventFields>,
) -> impl IntoResponse {
    let user = match authenticate(&state, &headers).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match state.events.update(&event_id, &user.id, fields).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => error_response(e.status(), e.to_string()),
    }
}

/// DELETE /api/events/{event_id} - Delete an event (creator only)
pub async fn event_delete_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match authenticate(&state, &headers).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match state.events.delete(&event_id, &user.id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"ok": true}))).into_response(),
        Err(e) => error_response(e.status(), e.to_string()),
    }
}

// =============================================================================
// Reference data handlers
// =============================================================================

/// Add-item request body; `city_name` applies to areas only
#[derive(Deserialize)]
pub struct RefAddRequest {
    pub name: String,
    #[serde(default)]
    pub city_name: Option<String>,
}

/// Optional city filter for area listings
#[derive(Deserialize)]
pub struct AreaQuery {
    #[serde(default)]
    pub city: Option<String>,
}

async fn list_ref(state: AppState, kind: RefKind) -> Json<Vec<RefItem>> {
    Json(state.refs.list(kind).await)
}

async fn add_ref(
    state: AppState,
    headers: HeaderMap,
    kind: RefKind,
    req: RefAddRequest,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&state, &headers).await {
        return resp;
    }

    match state.refs.add(kind, &req.name, req.city_name).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => error_response(e.status(), e.to_string()),
    }
}

async fn delete_ref(
    state: AppState,
    headers: HeaderMap,
    kind: RefKind,
    id: String,
) -> axum::response::Response {
    if let Err(resp) = require_admin(&state, &headers).await {
        return resp;
    }

    match state.refs.delete(kind, &id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"ok": true}))).into_response(),
        Err(e) => error_response(e.status(), e.to_string()),
    }
}

/// GET /api/categories - List sport categories
pub async fn categories_list_handler(State(state): State<AppState>) -> Json<Vec<RefItem>> {
    list_ref(state, RefKind::Categories).await
}

/// POST /api/categories - Add a category (admin)
pub async fn categories_add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefAddRequest>,
) -> impl IntoResponse {
    add_ref(state, headers, RefKind::Categories, req).await
}

/// DELETE /api/categories/{id} - Remove a category (admin)
pub async fn categories_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    delete_ref(state, headers, RefKind::Categories, id).await
}

/// GET /api/cities - List cities
pub async fn cities_list_handler(State(state): State<AppState>) -> Json<Vec<RefItem>> {
    list_ref(state, RefKind::Cities).await
}

/// POST /api/cities - Add a city (admin)
pub async fn cities_add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefAddRequest>,
) -> impl IntoResponse {
    add_ref(state, headers, RefKind::Cities, req).await
}

/// DELETE /api/cities/{id} - Remove a city (admin)
pub async fn cities_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    delete_ref(state, headers, RefKind::Cities, id).await
}

/// GET /api/areas?city=Name - List areas, optionally for one city
pub async fn areas_list_handler(
    State(state): State<AppState>,
    Query(query): Query<AreaQuery>,
) -> Json<Vec<RefItem>> {
    match query.city {
        Some(city) => Json(state.refs.areas_for_city(&city).await),
        None => Json(state.refs.list(RefKind::Areas).await),
    }
}

/// POST /api/areas - Add an area (admin)
pub async fn areas_add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefAddRequest>,
) -> impl IntoResponse {
    add_ref(state, headers, RefKind::Areas, req).await
}

/// DELETE /api/areas/{id} - Remove an area (admin)
pub async fn areas_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    delete_ref(state, headers, RefKind::Areas, id).await
}

// =============================================================================
// Image upload / serving
// =============================================================================

///// Upload request: base64 payload with its original file name
#[derive(Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub data: String,
}

///// Upload response: where the image is now served from
#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/upload - Store an image, returning its URL
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    if let Err(resp) = authenticate(&state, &headers).await {
        return resp;
    }

    let bytes = match base64::engine::general_purpose::STANDARD.decode(&req.data) {
        Ok(bytes) => bytes,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "invalid base64 payload"),
    };

    match state.storage.save(&req.file_name, &bytes) {
        Ok(url) => (StatusCode::CREATED, Json(UploadResponse { url })).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// GET /uploads/{file_name} - Serve a stored image
pub async fn uploads_handler(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> impl IntoResponse {
    match state.storage.open(&file_name) {
        Some(bytes) => {
            let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.to_string())],
                bytes,
            )
                .into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "image not found"),
    }
}
