use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Booking record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date: Date,
    pub time: String, // one of schedule::TIME_SLOTS
    pub message: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub date: Date,
    pub time: String,
    pub message: Option<String>,
}
