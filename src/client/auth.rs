//! Who is signed in, and the operations that change it.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    auth::dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateProfileRequest},
    client::{
        api::{ApiClient, ProfileKind},
        cancel::RequestScope,
        error::ClientError,
        session::SessionStore,
    },
    profiles::dto::ProfileCompletionRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Session restoration has not finished yet.
    Initializing,
    Authenticated(PublicUser),
    Anonymous,
}

/// Current user plus the token that proves it.
///
/// The in-memory token and the [`SessionStore`] always agree once
/// initialization is over: both hold the token while `Authenticated`, and
/// neither does while `Anonymous`.
pub struct AuthContext {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    state: AuthState,
    token: Option<String>,
}

impl AuthContext {
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            state: AuthState::Initializing,
            token: None,
        }
    }

    /// Builds the context and immediately tries to restore a stored session.
    pub async fn start(
        api: ApiClient,
        store: Arc<dyn SessionStore>,
        scope: &RequestScope,
    ) -> Self {
        let mut ctx = Self::new(api, store);
        ctx.restore(scope).await;
        ctx
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&PublicUser> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Initializing
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Silent session restoration. A token the backend no longer accepts is
    /// discarded. If `scope` is cancelled the context stays `Initializing`
    /// and restoration can be attempted again.
    #[instrument(skip_all)]
    pub async fn restore(&mut self, scope: &RequestScope) -> &AuthState {
        self.state = AuthState::Initializing;
        let Some(token) = self.store.read() else {
            debug!("no stored session");
            self.token = None;
            self.state = AuthState::Anonymous;
            return &self.state;
        };

        match self.api.fetch_profile(scope, &token).await {
            Ok(user) => {
                info!(user_id = %user.id, "session restored");
                self.token = Some(token);
                self.state = AuthState::Authenticated(user);
            }
            Err(ClientError::Cancelled) => {
                debug!("session restore cancelled");
            }
            Err(e) => {
                warn!(error = %e, "stored session rejected; discarding token");
                self.discard_session();
            }
        }
        &self.state
    }

    /// On failure the message is returned and nothing is touched.
    #[instrument(skip(self, scope, password))]
    pub async fn login(
        &mut self,
        scope: &RequestScope,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self.api.login(scope, &req).await?;
        self.establish(res);
        Ok(())
    }

    #[instrument(skip_all, fields(email = %data.email))]
    pub async fn register(
        &mut self,
        scope: &RequestScope,
        data: &RegisterRequest,
    ) -> Result<(), ClientError> {
        let res = self.api.register(scope, data).await?;
        self.establish(res);
        Ok(())
    }

    /// Replaces the current user with the backend's updated copy.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &mut self,
        scope: &RequestScope,
        data: &UpdateProfileRequest,
    ) -> Result<(), ClientError> {
        let token = self.require_token()?;
        let res = self.api.update_profile(scope, &token, data).await;
        self.apply_user(res)
    }

    /// Founder or investor profile completion.
    #[instrument(skip(self, scope, data))]
    pub async fn complete_profile(
        &mut self,
        scope: &RequestScope,
        kind: ProfileKind,
        data: &ProfileCompletionRequest,
    ) -> Result<(), ClientError> {
        let token = self.require_token()?;
        let res = self.api.complete_profile(scope, &token, kind, data).await;
        self.apply_user(res)
    }

    /// Client-side only; always ends `Anonymous` with no token anywhere.
    pub fn logout(&mut self) {
        self.discard_session();
        info!("logged out");
    }

    fn require_token(&self) -> Result<String, ClientError> {
        match (&self.state, &self.token) {
            (AuthState::Authenticated(_), Some(token)) => Ok(token.clone()),
            _ => Err(ClientError::NotAuthenticated),
        }
    }

    fn establish(&mut self, res: AuthResponse) {
        // a store failure leaves the session usable for this run only
        if let Err(e) = self.store.save(&res.access_token) {
            warn!(error = %e, "session token not persisted");
        }
        info!(user_id = %res.user.id, "session established");
        self.token = Some(res.access_token);
        self.state = AuthState::Authenticated(res.user);
    }

    fn apply_user(&mut self, res: Result<PublicUser, ClientError>) -> Result<(), ClientError> {
        match res {
            Ok(user) => {
                self.state = AuthState::Authenticated(user);
                Ok(())
            }
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("token rejected; signing out");
                    self.discard_session();
                }
                Err(e)
            }
        }
    }

    fn discard_session(&mut self) {
        self.store.clear();
        self.token = None;
        self.state = AuthState::Anonymous;
    }
}
