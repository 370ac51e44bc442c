use std::sync::Arc;

use uuid::Uuid;

use crate::{
    app::spawn_local,
    client::{api::ApiClient, auth::AuthContext, session::MemorySessionStore},
    state::AppState,
};

/// Starts the API on in-memory stores; returns its base URL.
pub async fn spawn_backend() -> String {
    spawn_local(AppState::fake())
        .await
        .expect("test server should bind")
}

pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

/// Fresh context against `base`, backed by a memory store.
pub fn context(base: &str) -> (AuthContext, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::default());
    let ctx = AuthContext::new(ApiClient::new(base), store.clone());
    (ctx, store)
}
