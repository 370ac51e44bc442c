use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role a user picked while completing their profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Pending,
    Founder,
    Investor,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Pending => "pending",
            UserType::Founder => "founder",
            UserType::Investor => "investor",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserType::Pending),
            "founder" => Ok(UserType::Founder),
            "investor" => Ok(UserType::Investor),
            other => anyhow::bail!("unknown user_type {other:?}"),
        }
    }
}

/// User record as stored.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String, // argon2, never leaves the backend
    pub user_type: UserType,
    pub company: Option<String>,
    pub additional_info: Option<String>,
    pub picture: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Raw `users` row; `user_type` is TEXT in the database.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub company: Option<String>,
    pub additional_info: Option<String>,
    pub picture: Option<String>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            user_type: r.user_type.parse()?,
            company: r.company,
            additional_info: r.additional_info,
            picture: r.picture,
            created_at: r.created_at,
        })
    }
}

/// Fields needed to insert a user; the repo assigns id, type and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub company: Option<String>,
    pub additional_info: Option<String>,
}

/// Partial update; `None` leaves the column untouched. For the nullable
/// columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub user_type: Option<UserType>,
    pub company: Option<Option<String>>,
    pub additional_info: Option<Option<String>>,
}
