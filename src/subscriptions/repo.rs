use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lead-gate email record.
#[derive(Debug, Clone, FromRow)]
pub struct EmailSubscription {
    pub id: Uuid,
    pub email: String,
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// Inserts `email` unless already present; returns the new row, or
    /// `None` for an address seen before.
    async fn subscribe(&self, email: &str) -> anyhow::Result<Option<EmailSubscription>>;
}

pub struct PgSubscriptionRepo {
    db: PgPool,
}

impl PgSubscriptionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepo for PgSubscriptionRepo {
    async fn subscribe(&self, email: &str) -> anyhow::Result<Option<EmailSubscription>> {
        let inserted = sqlx::query_as::<_, EmailSubscription>(
            r#"
            INSERT INTO email_subscriptions (email)
            VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, created_at
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(inserted)
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    by_email: RwLock<HashMap<String, EmailSubscription>>,
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn subscribe(&self, email: &str) -> anyhow::Result<Option<EmailSubscription>> {
        let mut by_email = self.by_email.write().await;
        if by_email.contains_key(email) {
            return Ok(None);
        }
        let row = EmailSubscription {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        by_email.insert(row.email.clone(), row.clone());
        Ok(Some(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_subscribe_is_a_no_op() {
        let repo = InMemorySubscriptionRepo::default();
        let first = repo.subscribe("a@x.com").await.unwrap().expect("new row");
        assert_eq!(first.email, "a@x.com");
        assert!(repo.subscribe("a@x.com").await.unwrap().is_none());
        let other = repo.subscribe("b@x.com").await.unwrap().expect("new row");
        assert_ne!(other.id, first.id);
    }
}
