//! Notification routes: dispatch and listing.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use huddle_common::error::AppError;
use huddle_common::types::{Notification, NotificationFilter, StoredNotification};
use huddle_dispatch::dispatcher::DispatchOutcome;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/notifications", post(send_notification))
        .route("/v1/notifications", get(list_notifications))
}

/// POST /v1/notifications — Dispatch a notification.
///
/// Returns `{"notificationId": ..., "errors": {...}}`. A non-empty errors
/// mapping still means the dispatch succeeded; callers inspect it for
/// per-recipient and per-channel failures.
async fn send_notification(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<DispatchOutcome>, AppError> {
    // Decode failures (unknown type, unknown channel, wrong shape) surface
    // exactly like validation failures: 400, nothing persisted.
    let notification: Notification = serde_json::from_value(body)
        .map_err(|_| AppError::Validation("malformed request body".to_string()))?;

    let outcome = state.dispatcher.dispatch(&notification).await?;
    Ok(Json(outcome))
}

/// GET /v1/notifications — List persisted notification records.
async fn list_notifications(
    State(state): State<AppState>,
    Query(filter): Query<NotificationFilter>,
) -> Result<Json<Vec<StoredNotification>>, AppError> {
    let notifications = state.store.list(&filter).await?;
    tracing::info!(count = notifications.len(), "retrieved notifications");
    Ok(Json(notifications))
}
