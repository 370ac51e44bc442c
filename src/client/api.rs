//! Typed wrapper over the backend REST API.
//!
//! Authenticated calls take the bearer token as an argument; nothing about
//! the session is kept inside the client, so a request can never pick up a
//! token that was valid when some other request started.

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateProfileRequest},
        repo_types::UserType,
    },
    bookings::dto::{BookingRequest, BookingResponse},
    client::{cancel::RequestScope, error::ClientError},
    error::ErrorBody,
    profiles::dto::ProfileCompletionRequest,
    subscriptions::handlers::{SubscribeRequest, SubscribeResponse},
};

/// Which API call failed; picks the fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    FetchProfile,
    UpdateProfile,
    CompleteProfile,
    CreateBooking,
    Subscribe,
}

impl Operation {
    pub fn default_message(&self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::Register => "Registration failed",
            Operation::FetchProfile => "Failed to load profile",
            Operation::UpdateProfile | Operation::CompleteProfile => "Profile update failed",
            Operation::CreateBooking => "Failed to submit booking. Please try again.",
            Operation::Subscribe => "Failed to process request. Please try again.",
        }
    }
}

/// Role chosen on the founder or investor completion form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Founder,
    Investor,
}

impl ProfileKind {
    pub fn path(&self) -> &'static str {
        match self {
            ProfileKind::Founder => "/register/founder",
            ProfileKind::Investor => "/register/investor",
        }
    }

    pub fn user_type(&self) -> UserType {
        match self {
            ProfileKind::Founder => UserType::Founder,
            ProfileKind::Investor => UserType::Investor,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `backend_url` is the site origin; requests go to `<backend_url>/api`.
    pub fn new(backend_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), backend_url)
    }

    pub fn with_client(http: reqwest::Client, backend_url: &str) -> Self {
        let base_url = format!("{}/api", backend_url.trim_end_matches('/'));
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        scope: &RequestScope,
        op: Operation,
        req: RequestBuilder,
    ) -> Result<T, ClientError> {
        let call = async {
            let res = req.send().await.map_err(|e| transport(op, e))?;
            let status = res.status();
            if !status.is_success() {
                let detail = res
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .map(|b| b.detail)
                    .filter(|d| !d.trim().is_empty());
                debug!(?op, %status, ?detail, "request rejected");
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: detail.unwrap_or_else(|| op.default_message().to_string()),
                });
            }
            res.json::<T>().await.map_err(|e| transport(op, e))
        };

        match scope.run(call).await {
            Ok(res) => res,
            Err(_) => {
                debug!(?op, "request cancelled");
                Err(ClientError::Cancelled)
            }
        }
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        scope: &RequestScope,
        op: Operation,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ClientError> {
        let req = self.request(method, path, token).json(body);
        self.send(scope, op, req).await
    }

    #[instrument(skip(self, scope, req), fields(email = %req.email))]
    pub async fn login(
        &self,
        scope: &RequestScope,
        req: &LoginRequest,
    ) -> Result<AuthResponse, ClientError> {
        self.send_json(scope, Operation::Login, Method::POST, "/auth/login", None, req)
            .await
    }

    #[instrument(skip(self, scope, req), fields(email = %req.email))]
    pub async fn register(
        &self,
        scope: &RequestScope,
        req: &RegisterRequest,
    ) -> Result<AuthResponse, ClientError> {
        self.send_json(scope, Operation::Register, Method::POST, "/auth/register", None, req)
            .await
    }

    #[instrument(skip_all)]
    pub async fn fetch_profile(
        &self,
        scope: &RequestScope,
        token: &str,
    ) -> Result<PublicUser, ClientError> {
        let req = self.request(Method::GET, "/auth/profile", Some(token));
        self.send(scope, Operation::FetchProfile, req).await
    }

    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        scope: &RequestScope,
        token: &str,
        req: &UpdateProfileRequest,
    ) -> Result<PublicUser, ClientError> {
        self.send_json(
            scope,
            Operation::UpdateProfile,
            Method::PUT,
            "/auth/profile",
            Some(token),
            req,
        )
        .await
    }

    #[instrument(skip(self, scope, token, req))]
    pub async fn complete_profile(
        &self,
        scope: &RequestScope,
        token: &str,
        kind: ProfileKind,
        req: &ProfileCompletionRequest,
    ) -> Result<PublicUser, ClientError> {
        self.send_json(
            scope,
            Operation::CompleteProfile,
            Method::POST,
            kind.path(),
            Some(token),
            req,
        )
        .await
    }

    #[instrument(skip(self, scope, req), fields(date = %req.date, time = %req.time))]
    pub async fn create_booking(
        &self,
        scope: &RequestScope,
        req: &BookingRequest,
    ) -> Result<BookingResponse, ClientError> {
        self.send_json(scope, Operation::CreateBooking, Method::POST, "/bookings", None, req)
            .await
    }

    #[instrument(skip(self, scope))]
    pub async fn subscribe_email(
        &self,
        scope: &RequestScope,
        email: &str,
    ) -> Result<SubscribeResponse, ClientError> {
        let body = SubscribeRequest {
            email: Some(email.to_string()),
        };
        self.send_json(scope, Operation::Subscribe, Method::POST, "/email-subscribe", None, &body)
            .await
    }
}

fn transport(op: Operation, e: reqwest::Error) -> ClientError {
    warn!(?op, error = %e, "request failed");
    ClientError::Transport {
        message: op.default_message().to_string(),
        cause: e.to_string(),
    }
}
