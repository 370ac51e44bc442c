use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::bookings::repo_types::{Booking, NewBooking};

#[async_trait]
pub trait BookingRepo: Send + Sync {
    async fn create(&self, new: NewBooking) -> anyhow::Result<Booking>;
    /// Newest first.
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Booking>>;
}

pub struct PgBookingRepo {
    db: PgPool,
}

impl PgBookingRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepo for PgBookingRepo {
    async fn create(&self, new: NewBooking) -> anyhow::Result<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (name, email, date, time, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, date, time, message, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(new.date)
        .bind(&new.time)
        .bind(&new.message)
        .fetch_one(&self.db)
        .await?;
        Ok(booking)
    }

    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, name, email, date, time, message, created_at
            FROM bookings
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepo {
    bookings: RwLock<Vec<Booking>>,
}

#[async_trait]
impl BookingRepo for InMemoryBookingRepo {
    async fn create(&self, new: NewBooking) -> anyhow::Result<Booking> {
        let booking = Booking {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            date: new.date,
            time: new.time,
            message: new.message,
            created_at: OffsetDateTime::now_utc(),
        };
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn new_booking(name: &str) -> NewBooking {
        NewBooking {
            name: name.into(),
            email: "a@x.com".into(),
            date: date!(2030 - 01 - 02),
            time: "09:00".into(),
            message: None,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let repo = InMemoryBookingRepo::default();
        for name in ["first", "second", "third"] {
            repo.create(new_booking(name)).await.unwrap();
        }
        let names: Vec<_> = repo
            .list(2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["third", "second"]);

        let rest = repo.list(10, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "first");
    }
}
