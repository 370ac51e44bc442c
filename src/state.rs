use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{InMemoryUserRepo, PgUserRepo, UserRepo},
    },
    bookings::repo::{BookingRepo, InMemoryBookingRepo, PgBookingRepo},
    config::AppConfig,
    subscriptions::repo::{InMemorySubscriptionRepo, PgSubscriptionRepo, SubscriptionRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub bookings: Arc<dyn BookingRepo>,
    pub subscriptions: Arc<dyn SubscriptionRepo>,
}

impl AppState {
    /// Connects to Postgres when `DATABASE_URL` is set, otherwise falls back
    /// to in-memory stores that lose everything on restart.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let Some(url) = config.database_url.clone() else {
            warn!("DATABASE_URL not set; using in-memory stores");
            return Ok(Self::in_memory(config));
        };

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("database ready");

        Ok(Self::from_pool(db, config))
    }

    pub fn from_pool(db: PgPool, config: AppConfig) -> Self {
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            config: Arc::new(config),
            users: Arc::new(PgUserRepo::new(db.clone())),
            bookings: Arc::new(PgBookingRepo::new(db.clone())),
            subscriptions: Arc::new(PgSubscriptionRepo::new(db)),
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            jwt: JwtKeys::from_config(&config.jwt),
            config: Arc::new(config),
            users: Arc::new(InMemoryUserRepo::default()),
            bookings: Arc::new(InMemoryBookingRepo::default()),
            subscriptions: Arc::new(InMemorySubscriptionRepo::default()),
        }
    }

    pub fn fake() -> Self {
        Self::in_memory(AppConfig::for_tests())
    }
}
