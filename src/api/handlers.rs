//! Record API handlers
//!
//! Every write accepts a JSON object, checks only the type and presence of
//! its fields, and performs one unconditional insert or update. Every read
//! returns all rows (or the singleton count).

use std::net::SocketAddr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::USER_AGENT;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

use super::error::ApiError;
use super::{AppState, with_store};
use crate::persistence::schema::DEFAULT_ORDER_INDEX;
use crate::persistence::{MAX_HIGH_SCORES, NewCartItem, NewTimelineEvent};

type ApiResult = Result<Json<Value>, ApiError>;

/// Non-empty string field
fn required_str(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

pub async fn get_hearts(State(state): State<AppState>) -> ApiResult {
    let count = with_store(&state, |store| store.heart_count()).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn set_hearts(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let count = body
        .get("count")
        .and_then(Value::as_i64)
        .ok_or(ApiError::BadRequest("Invalid count value"))?;

    with_store(&state, move |store| store.set_heart_count(count)).await?;
    Ok(Json(json!({ "success": true, "count": count })))
}

pub async fn get_timeline(State(state): State<AppState>) -> ApiResult {
    let events = with_store(&state, |store| store.timeline_events()).await?;
    Ok(Json(json!({ "events": events })))
}

pub async fn add_timeline_event(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let (Some(title), Some(date), Some(description)) = (
        required_str(&body, "title"),
        required_str(&body, "date"),
        required_str(&body, "description"),
    ) else {
        return Err(ApiError::BadRequest("Missing required fields"));
    };
    // Absent or zero order index sorts the event last
    let order_index = body
        .get("order_index")
        .and_then(Value::as_i64)
        .filter(|&i| i != 0)
        .unwrap_or(DEFAULT_ORDER_INDEX);

    let event = NewTimelineEvent {
        title,
        date,
        description,
        order_index,
    };
    let id = with_store(&state, move |store| store.add_timeline_event(&event)).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn get_cart(State(state): State<AppState>) -> ApiResult {
    let items = with_store(&state, |store| store.cart_items()).await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn add_cart_item(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let item_name =
        required_str(&body, "item_name").ok_or(ApiError::BadRequest("Item name required"))?;
    let item = NewCartItem {
        item_name,
        image: required_str(&body, "image"),
    };

    let id = with_store(&state, move |store| store.add_cart_item(&item)).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn add_high_score(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let score = body
        .get("score")
        .and_then(Value::as_u64)
        .and_then(|s| u32::try_from(s).ok())
        .ok_or(ApiError::BadRequest("Invalid score value"))?;

    with_store(&state, move |store| store.record_high_score(score)).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn get_high_scores(State(state): State<AppState>) -> ApiResult {
    let scores = with_store(&state, |store| store.high_scores(MAX_HIGH_SCORES)).await?;
    Ok(Json(json!({ "scores": scores })))
}

/// Analytics are best-effort: failures are logged and the caller still
/// gets a success flag.
pub async fn record_visit(State(state): State<AppState>, request: Request) -> Json<Value> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let result = with_store(&state, move |store| {
        store.record_visit(ip.as_deref(), user_agent.as_deref())
    })
    .await;
    if let Err(e) = result {
        log::error!("Error tracking visit: {}", e);
    }
    Json(json!({ "success": true }))
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult {
    let stats = with_store(&state, |store| store.stats()).await?;
    Ok(Json(json!(stats)))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "message": "💖 Valentine's website backend is running!",
    }))
}
