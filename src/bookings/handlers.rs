use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    bookings::{
        dto::{BookingRequest, BookingResponse, Pagination},
        repo_types::NewBooking,
    },
    error::{ApiError, ApiResult},
    schedule::{is_time_slot, parse_date},
    state::AppState,
    validation::{is_valid_email, non_blank, normalize_email},
};

pub fn booking_routes() -> Router<AppState> {
    Router::new().route("/bookings", post(create_booking).get(list_bookings))
}

#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let name = payload.name.trim().to_string();
    let email = normalize_email(&payload.email);

    if name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    let date = parse_date(&payload.date).ok_or_else(|| {
        warn!(date = %payload.date, "unparsable booking date");
        ApiError::BadRequest("Invalid date".into())
    })?;
    if !is_time_slot(&payload.time) {
        warn!(time = %payload.time, "unknown booking slot");
        return Err(ApiError::BadRequest("Invalid time slot".into()));
    }

    let booking = state
        .bookings
        .create(NewBooking {
            name,
            email,
            date,
            time: payload.time,
            message: non_blank(payload.message),
        })
        .await?;

    info!(booking_id = %booking.id, date = %payload.date, "booking created");
    Ok(Json(booking.into()))
}

#[instrument(skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let limit = p.limit.clamp(1, 1000);
    let rows = state.bookings.list(limit, p.offset.max(0)).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use crate::test_support::{spawn_backend, unique_email};

    fn booking(date: &str, time: &str) -> Value {
        json!({ "name": "A", "email": "a@x.com", "date": date, "time": time })
    }

    #[tokio::test]
    async fn rejects_unknown_slot_and_bad_date() {
        let base = spawn_backend().await;
        let http = reqwest::Client::new();
        let url = format!("{base}/api/bookings");

        let res = http.post(&url).json(&booking("2030-01-02", "12:00")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["detail"], "Invalid time slot");

        let res = http.post(&url).json(&booking("02/01/2030", "09:00")).send().await.unwrap();
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["detail"], "Invalid date");
    }

    #[tokio::test]
    async fn listing_requires_auth_and_returns_newest_first() {
        let base = spawn_backend().await;
        let http = reqwest::Client::new();
        let url = format!("{base}/api/bookings");

        for time in ["09:00", "09:30"] {
            let res = http.post(&url).json(&booking("2030-01-02", time)).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }

        let res = http.get(&url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let reg: Value = http
            .post(format!("{base}/api/auth/register"))
            .json(&json!({ "name": "A", "email": unique_email(), "password": "12345678" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let rows: Vec<Value> = http
            .get(format!("{url}?limit=1"))
            .bearer_auth(reg["access_token"].as_str().unwrap())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["time"], "09:30");
        assert_eq!(rows[0]["date"], "2030-01-02");
    }
}
