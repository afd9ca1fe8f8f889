//! Route table and handlers.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth required)
//! - `GET /me`: Current user
//! - `GET /friends`: Derived friends list
//! - `GET /friends/requests`: Incoming pending requests
//! - `GET /friends/requests/sent`: Outgoing pending requests
//! - `POST /friends/requests`: Send a request `{ "to": "<email or id>" }`
//! - `POST /friends/requests/{id}/accept`
//! - `POST /friends/requests/{id}/reject`
//! - `GET /shops`: Owned and shared shops
//! - `POST /shops`: Create a shop `{ "name": "..." }`
//! - `GET /shops/{id}`
//! - `GET /shops/{id}/shared-with`: Friends and current selection
//! - `PUT /shops/{id}/shared-with`: Replace members `{ "members": [...] }`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::auth::{auth_middleware, AuthUser};
use super::AppState;
use crate::error::ShareError;
use crate::models::{AccessibleShop, DerivedFriend, FriendshipRequest, Shop, User};
use crate::social::SharingView;

type ApiResult<T> = Result<T, ShareError>;

/// Builds the full router with auth applied to everything but `/health`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/friends", get(list_friends))
        .route(
            "/friends/requests",
            get(list_incoming_requests).post(send_friend_request),
        )
        .route("/friends/requests/sent", get(list_sent_requests))
        .route("/friends/requests/{id}/accept", post(accept_request))
        .route("/friends/requests/{id}/reject", post(reject_request))
        .route("/shops", get(list_shops).post(create_shop))
        .route("/shops/{id}", get(get_shop))
        .route(
            "/shops/{id}/shared-with",
            get(sharing_view).put(update_shared_with),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.app.user(&user.user_id).await?))
}

#[derive(Deserialize)]
struct SendRequestBody {
    /// Email address or user id of the receiver
    to: String,
}

async fn send_friend_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SendRequestBody>,
) -> ApiResult<(StatusCode, Json<FriendshipRequest>)> {
    let request = state
        .app
        .send_friend_request(&user.user_id, &body.to)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn list_incoming_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<FriendshipRequest>>> {
    Ok(Json(state.app.list_incoming_requests(&user.user_id).await?))
}

async fn list_sent_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<FriendshipRequest>>> {
    Ok(Json(state.app.list_sent_requests(&user.user_id).await?))
}

async fn accept_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.app.accept_request(&user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reject_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.app.reject_request(&user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_friends(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<DerivedFriend>>> {
    Ok(Json(state.app.list_friends(&user.user_id).await?))
}

async fn list_shops(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<AccessibleShop>>> {
    Ok(Json(state.app.list_accessible_shops(&user.user_id).await?))
}

#[derive(Deserialize)]
struct CreateShopBody {
    name: String,
}

async fn create_shop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateShopBody>,
) -> ApiResult<(StatusCode, Json<Shop>)> {
    let shop = state.app.create_shop(&user.user_id, &body.name).await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

async fn get_shop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccessibleShop>> {
    Ok(Json(state.app.get_shop(&user.user_id, id).await?))
}

async fn sharing_view(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SharingView>> {
    Ok(Json(state.app.sharing_view(&user.user_id, id).await?))
}

#[derive(Deserialize)]
struct SharedWithBody {
    members: Vec<String>,
}

async fn update_shared_with(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<SharedWithBody>,
) -> ApiResult<StatusCode> {
    state
        .app
        .update_shared_with(id, &user.user_id, &body.members)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
