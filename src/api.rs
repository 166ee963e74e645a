//! HTTP surface for echelon CRUD
//!
//! REST endpoints over the registry:
//!
//! - `GET /echelons` - list all echelon records
//! - `GET /echelons/:scope` - fetch a single record
//! - `PUT /echelons/:scope` - create a record (409 if it already exists)
//! - `POST /echelons/:scope` - update metadata and member sets
//! - `DELETE /echelons/:scope` - remove a record

use crate::error::EchelonError;
use crate::registry::EchelonRegistry;
use crate::types::{Echelon, MemberType};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    registry: EchelonRegistry,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// API error type mapped onto HTTP status codes
#[derive(Debug)]
pub enum ApiError {
    /// Malformed scope, member type, or request body
    BadRequest(String),
    /// Scope is not defined
    NotFound(String),
    /// Scope is already defined
    Conflict(String),
    /// Backing store unreachable
    Unavailable(String),
    /// Invariant violation inside the service
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::NotFound(scope) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Echelon \"{}\" is not defined", scope),
            ),
            Self::Conflict(scope) => (
                StatusCode::CONFLICT,
                "conflict",
                format!("Echelon \"{}\" already exists", scope),
            ),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<EchelonError> for ApiError {
    fn from(err: EchelonError) -> Self {
        match err {
            EchelonError::InvalidScope(_) | EchelonError::InvalidMemberType(_) => {
                Self::BadRequest(err.to_string())
            }
            EchelonError::StoreUnavailable(msg) => Self::Unavailable(msg),
        }
    }
}

/// PUT body: initial definition for a new echelon
#[derive(Debug, Deserialize)]
struct CreateEchelonRequest {
    /// Optional scope echo; must match the path when present
    scope: Option<String>,
    name: Option<String>,
    help: Option<String>,
    #[serde(default)]
    users: Vec<String>,
    #[serde(default)]
    groups: Vec<String>,
}

/// Member identifiers to add or remove in one update
#[derive(Debug, Default, Deserialize)]
struct MemberPatch {
    #[serde(default)]
    users: Vec<String>,
    #[serde(default)]
    groups: Vec<String>,
}

/// POST body: metadata and member-set updates for an existing echelon
#[derive(Debug, Deserialize)]
struct UpdateEchelonRequest {
    name: Option<String>,
    help: Option<String>,
    add: Option<MemberPatch>,
    remove: Option<MemberPatch>,
}

/// GET /echelons - list every defined echelon
async fn list_echelons(State(state): State<ApiState>) -> Result<Json<Vec<Echelon>>, ApiError> {
    let mut records: Vec<Echelon> = state.registry.all_echelons().await?.into_values().collect();
    records.sort_by(|a, b| a.scope.cmp(&b.scope));
    Ok(Json(records))
}

/// GET /echelons/:scope - fetch one echelon record
async fn get_echelon(
    State(state): State<ApiState>,
    Path(scope): Path<String>,
) -> Result<Json<Echelon>, ApiError> {
    state
        .registry
        .get_echelon(&scope)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(scope))
}

/// PUT /echelons/:scope - create an echelon
async fn create_echelon(
    State(state): State<ApiState>,
    Path(scope): Path<String>,
    Json(req): Json<CreateEchelonRequest>,
) -> Result<(StatusCode, Json<Echelon>), ApiError> {
    if let Some(body_scope) = &req.scope {
        if body_scope != &scope {
            return Err(ApiError::BadRequest(format!(
                "Body scope \"{}\" does not match path scope \"{}\"",
                body_scope, scope
            )));
        }
    }

    if state.registry.get_echelon(&scope).await?.is_some() {
        return Err(ApiError::Conflict(scope));
    }

    let registry = &state.registry;
    registry
        .define_echelon(&scope, req.name.as_deref(), req.help.as_deref())
        .await?;
    registry.add_member(&scope, req.users, MemberType::User).await?;
    registry.add_member(&scope, req.groups, MemberType::Group).await?;

    info!(scope = %scope, "echelon created");
    let record = fetch_defined(registry, &scope).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /echelons/:scope - update an existing echelon
async fn update_echelon(
    State(state): State<ApiState>,
    Path(scope): Path<String>,
    Json(req): Json<UpdateEchelonRequest>,
) -> Result<Json<Echelon>, ApiError> {
    let registry = &state.registry;
    let existing = registry
        .get_echelon(&scope)
        .await?
        .ok_or_else(|| ApiError::NotFound(scope.clone()))?;

    // Untouched metadata is carried over so a member-only update never
    // resets name or help to their defaults
    let name = req.name.unwrap_or(existing.name);
    let help = req.help.unwrap_or(existing.help);
    registry
        .define_echelon(&scope, Some(&name), Some(&help))
        .await?;

    if let Some(add) = req.add {
        registry.add_member(&scope, add.users, MemberType::User).await?;
        registry.add_member(&scope, add.groups, MemberType::Group).await?;
    }
    if let Some(remove) = req.remove {
        registry
            .remove_member(&scope, remove.users, MemberType::User)
            .await?;
        registry
            .remove_member(&scope, remove.groups, MemberType::Group)
            .await?;
    }

    info!(scope = %scope, "echelon updated");
    let record = fetch_defined(registry, &scope).await?;
    Ok(Json(record))
}

/// DELETE /echelons/:scope - remove an echelon, defined or not
async fn delete_echelon(
    State(state): State<ApiState>,
    Path(scope): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.remove_echelon(&scope).await?;
    info!(scope = %scope, "echelon removed");
    Ok(StatusCode::OK)
}

async fn fetch_defined(registry: &EchelonRegistry, scope: &str) -> Result<Echelon, ApiError> {
    registry
        .get_echelon(scope)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("Echelon \"{}\" vanished after write", scope)))
}

/// Build the echelon CRUD router
pub fn router(registry: EchelonRegistry) -> Router {
    let state = ApiState { registry };

    Router::new()
        .route("/echelons", get(list_echelons))
        .route(
            "/echelons/:scope",
            put(create_echelon)
                .get(get_echelon)
                .post(update_echelon)
                .delete(delete_echelon),
        )
        .with_state(state)
}
