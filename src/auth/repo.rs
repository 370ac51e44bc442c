use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, ProfileChanges, User, UserRow, UserType};

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create(&self, new: NewUser) -> Result<User, CreateUserError>;
    /// Applies the fields set in `changes`; `None` if the user is gone.
    async fn update(&self, id: Uuid, changes: ProfileChanges) -> anyhow::Result<Option<User>>;
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, user_type, company, additional_info, picture, created_at";

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn create(&self, new: NewUser) -> Result<User, CreateUserError> {
        let res = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, user_type, company, additional_info)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(UserType::Pending.as_str())
        .bind(&new.company)
        .bind(&new.additional_info)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(row) => Ok(User::try_from(row)?),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CreateUserError::EmailTaken)
            }
            Err(e) => Err(CreateUserError::Other(e.into())),
        }
    }

    async fn update(&self, id: Uuid, changes: ProfileChanges) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                user_type = COALESCE($3, user_type),
                company = CASE WHEN $4 THEN $5 ELSE company END,
                additional_info = CASE WHEN $6 THEN $7 ELSE additional_info END
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(changes.user_type.map(|t| t.as_str()))
        .bind(changes.company.is_some())
        .bind(changes.company.clone().flatten())
        .bind(changes.additional_info.is_some())
        .bind(changes.additional_info.clone().flatten())
        .fetch_optional(&self.db)
        .await?;
        row.map(User::try_from).transpose()
    }
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryUserRepo {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, CreateUserError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(CreateUserError::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            user_type: UserType::Pending,
            company: new.company,
            additional_info: new.additional_info,
            picture: None,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: ProfileChanges) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(t) = changes.user_type {
            user.user_type = t;
        }
        if let Some(company) = changes.company {
            user.company = company;
        }
        if let Some(info) = changes.additional_info {
            user.additional_info = info;
        }
        Ok(Some(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: email.into(),
            password_hash: "hash".into(),
            company: None,
            additional_info: None,
        }
    }

    #[tokio::test]
    async fn created_users_start_pending() {
        let repo = InMemoryUserRepo::default();
        let user = repo.create(new_user("a@x.com")).await.expect("create");
        assert_eq!(user.user_type, UserType::Pending);
        let found = repo.find_by_email("a@x.com").await.unwrap().expect("found");
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = InMemoryUserRepo::default();
        repo.create(new_user("a@x.com")).await.expect("first");
        let err = repo.create(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, CreateUserError::EmailTaken));
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let repo = InMemoryUserRepo::default();
        let user = repo.create(new_user("a@x.com")).await.expect("create");
        let updated = repo
            .update(
                user.id,
                ProfileChanges {
                    user_type: Some(UserType::Founder),
                    company: Some(Some("Acme".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("exists");
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.user_type, UserType::Founder);
        assert_eq!(updated.company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn update_can_clear_optional_fields() {
        let repo = InMemoryUserRepo::default();
        let mut new = new_user("a@x.com");
        new.company = Some("Acme".into());
        new.additional_info = Some("info".into());
        let user = repo.create(new).await.expect("create");

        let updated = repo
            .update(
                user.id,
                ProfileChanges {
                    company: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("exists");
        assert_eq!(updated.company, None);
        assert_eq!(updated.additional_info.as_deref(), Some("info"));
    }

    #[tokio::test]
    async fn update_unknown_user_is_none() {
        let repo = InMemoryUserRepo::default();
        let res = repo.update(Uuid::new_v4(), ProfileChanges::default()).await;
        assert!(res.unwrap().is_none());
    }
}
