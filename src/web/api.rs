//! JSON API behind the dashboard.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditEntry;
use crate::core::models::shop::{MentionField, Shop, ShopUpdate};
use crate::web::AppState;
use crate::web::auth::ApiUser;
use crate::web::response::ApiResponse;

const BAD_REQUEST_MSG: &str = "❌ بيانات غير صالحة";
const UNKNOWN_ACTION_MSG: &str = "❌ أمر غير معروف";

pub async fn list_stores(
    State(state): State<Arc<AppState>>,
    _user: ApiUser,
) -> Result<Json<Vec<Shop>>> {
    Ok(Json(state.shops.list_shops()?))
}

#[derive(Deserialize)]
pub struct LogsQuery {
    limit: Option<usize>,
}

pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    _user: ApiUser,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<AuditEntry>>> {
    let limit = query.limit.unwrap_or(state.dashboard_limit);
    Ok(Json(state.shops.recent_logs(Some(limit))?))
}

#[derive(Deserialize)]
pub struct StoreRequest {
    action: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct CreateData {
    name: String,
    #[serde(rename = "type")]
    tier: String,
}

#[derive(Deserialize)]
struct UseMentionData {
    id: u64,
    field: String,
    amount: u32,
}

#[derive(Deserialize)]
struct IdData {
    id: u64,
}

#[derive(Deserialize)]
struct UpdateData {
    id: u64,
    #[serde(flatten)]
    changes: ShopUpdate,
}

/// `POST /api/store` with `{action, data}`.
pub async fn store_action(
    State(state): State<Arc<AppState>>,
    user: ApiUser,
    body: std::result::Result<Json<StoreRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "malformed store request");
            return bad_request(BAD_REQUEST_MSG);
        }
    };

    let shops = &state.shops;
    let actor = &user.actor;
    let outcome = match request.action.as_str() {
        "create" => parse::<CreateData>(request.data)
            .map(|d| shops.create_shop(actor, &d.name, &d.tier).map(ApiResponse::ok)),
        "useMention" => parse::<UseMentionData>(request.data).map(|d| {
            d.field
                .parse::<MentionField>()
                .and_then(|field| shops.use_mention(actor, d.id, field, d.amount))
                .map(ApiResponse::ok)
        }),
        "renew" => parse::<IdData>(request.data)
            .map(|d| shops.renew_mentions(actor, d.id).map(ApiResponse::ok)),
        "update" => parse::<UpdateData>(request.data)
            .map(|d| shops.update_shop(actor, d.id, &d.changes).map(ApiResponse::ok)),
        "delete" => parse::<IdData>(request.data)
            .map(|d| shops.delete_shop(actor, d.id).map(ApiResponse::ok)),
        other => {
            debug!(action = other, "unknown store action");
            return bad_request(UNKNOWN_ACTION_MSG);
        }
    };

    match outcome {
        None => bad_request(BAD_REQUEST_MSG),
        Some(Ok(response)) => Json(response).into_response(),
        Some(Err(e)) => e.into_response(),
    }
}

fn parse<T: DeserializeOwned>(data: serde_json::Value) -> Option<T> {
    serde_json::from_value(data).ok()
}

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(msg))).into_response()
}
