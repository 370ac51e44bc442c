use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateProfileRequest},
        extractors::AuthUser,
        password::{hash_password, verify_password},
        repo::CreateUserError,
        repo_types::{NewUser, ProfileChanges, User, UserType},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{is_valid_email, is_valid_password, non_blank, normalize_email, PASSWORD_TOO_SHORT},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(get_profile).put(update_profile))
}

fn issue(state: &AppState, user: User) -> ApiResult<Json<AuthResponse>> {
    let access_token = state.jwt.sign_access(&user).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        ApiError::Internal(e)
    })?;
    Ok(Json(AuthResponse {
        user: user.into(),
        access_token,
        token_type: "bearer".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);
    let name = payload.name.trim().to_string();

    if name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if !is_valid_password(&payload.password) {
        warn!("password too short");
        return Err(ApiError::BadRequest(PASSWORD_TOO_SHORT.into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let new = NewUser {
        name,
        email,
        password_hash,
        company: non_blank(payload.company),
        additional_info: non_blank(payload.additional_info),
    };

    let user = match state.users.create(new).await {
        Ok(u) => u,
        Err(CreateUserError::EmailTaken) => {
            warn!("email already registered");
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        Err(CreateUserError::Other(e)) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Internal(e));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    issue(&state, user)
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token for unknown user");
        ApiError::Unauthorized("Invalid session".into())
    })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<PublicUser>> {
    if payload.user_type == Some(UserType::Pending) {
        return Err(ApiError::BadRequest(
            "user_type must be founder or investor".into(),
        ));
    }
    let name = payload.name.map(|n| n.trim().to_string());
    if name.as_deref() == Some("") {
        return Err(ApiError::BadRequest("Name cannot be empty".into()));
    }

    let changes = ProfileChanges {
        name,
        user_type: payload.user_type,
        // sent but blank clears the field
        company: payload.company.map(|c| non_blank(Some(c))),
        additional_info: payload.additional_info.map(|i| non_blank(Some(i))),
    };
    let user = state
        .users
        .update(user_id, changes)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session".into()))?;

    info!(user_id = %user.id, user_type = %user.user_type, "profile updated");
    Ok(Json(user.into()))
}
