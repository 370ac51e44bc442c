use serde::Deserialize;

pub const DEFAULT_DOWNLOAD_URL: &str = "https://example.com/yeyo-thesis.pdf";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string; `None` runs on in-memory stores.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    /// Link handed out by the lead-gate form.
    pub download_url: String,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "yeyolab".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "yeyolab-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        let download_url =
            std::env::var("DOWNLOAD_URL").unwrap_or_else(|_| DEFAULT_DOWNLOAD_URL.into());
        let cors_origins = parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_default());
        Ok(Self {
            database_url,
            jwt,
            download_url,
            cors_origins,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            download_url: DEFAULT_DOWNLOAD_URL.into(),
            cors_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(String::from)
        .collect()
}
