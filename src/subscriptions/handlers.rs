use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{is_valid_email, normalize_email},
};

pub const SUBSCRIBED_MESSAGE: &str = "Thank you! Your download will begin shortly.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub message: String,
    pub download_url: String,
}

pub fn subscription_routes() -> Router<AppState> {
    Router::new().route("/email-subscribe", post(subscribe_email))
}

#[instrument(skip(state, payload))]
pub async fn subscribe_email(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> ApiResult<Json<SubscribeResponse>> {
    let email = payload
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| is_valid_email(e))
        .ok_or_else(|| ApiError::BadRequest("Email required".into()))?;

    match state.subscriptions.subscribe(&email).await? {
        Some(row) => info!(
            subscription_id = %row.id,
            email = %row.email,
            created_at = %row.created_at,
            "email subscribed"
        ),
        None => info!(email = %email, "email already subscribed"),
    }

    Ok(Json(SubscribeResponse {
        message: SUBSCRIBED_MESSAGE.into(),
        download_url: state.config.download_url.clone(),
    }))
}
