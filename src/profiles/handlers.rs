use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::PublicUser,
        extractors::AuthUser,
        repo_types::{ProfileChanges, UserType},
    },
    error::{ApiError, ApiResult},
    profiles::dto::ProfileCompletionRequest,
    state::AppState,
    validation::{non_blank, normalize_email},
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/register/founder", post(register_founder))
        .route("/register/investor", post(register_investor))
}

#[instrument(skip(state, payload))]
pub async fn register_founder(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileCompletionRequest>,
) -> ApiResult<Json<PublicUser>> {
    complete(&state, user_id, UserType::Founder, payload).await
}

#[instrument(skip(state, payload))]
pub async fn register_investor(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileCompletionRequest>,
) -> ApiResult<Json<PublicUser>> {
    complete(&state, user_id, UserType::Investor, payload).await
}

async fn complete(
    state: &AppState,
    user_id: Uuid,
    user_type: UserType,
    payload: ProfileCompletionRequest,
) -> ApiResult<Json<PublicUser>> {
    let current = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".into()))?;

    if normalize_email(&payload.email) != current.email {
        warn!(user_id = %user_id, "profile completion email mismatch");
        return Err(ApiError::BadRequest(
            "Email does not match the signed-in account".into(),
        ));
    }

    let changes = ProfileChanges {
        name: non_blank(Some(payload.name)),
        user_type: Some(user_type),
        company: non_blank(payload.company).map(Some),
        additional_info: non_blank(payload.additional_info).map(Some),
    };
    let user = state
        .users
        .update(user_id, changes)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".into()))?;

    info!(user_id = %user.id, user_type = %user_type, "profile completed");
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use crate::test_support::{spawn_backend, unique_email};

    #[tokio::test]
    async fn completion_needs_a_session() {
        let base = spawn_backend().await;
        let res = reqwest::Client::new()
            .post(format!("{base}/api/register/investor"))
            .json(&json!({ "name": "A", "email": unique_email() }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn investor_completion_sets_type_and_info() {
        let base = spawn_backend().await;
        let http = reqwest::Client::new();
        let email = unique_email();
        let reg: Value = http
            .post(format!("{base}/api/auth/register"))
            .json(&json!({ "name": "A", "email": email, "password": "12345678" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let token = reg["access_token"].as_str().unwrap();

        let res = http
            .post(format!("{base}/api/register/investor"))
            .bearer_auth(token)
            .json(&json!({
                "name": "A",
                "email": email.to_uppercase(),
                "company": "Fund",
                "additional_info": "Investment Range: $5M+, Investment Stage: Seed, Additional Info: AI"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let user: Value = res.json().await.unwrap();
        assert_eq!(user["user_type"], "investor");
        assert_eq!(user["company"], "Fund");
    }
}
