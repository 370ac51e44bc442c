use tracing::debug;

use crate::client::{
    auth::AuthContext,
    cancel::{Canceller, RequestScope},
    notify::ViewOutcome,
    router::{Guard, Route},
};

use super::{require, require_email};

#[derive(Default)]
pub struct LoginView {
    pub email: String,
    pub password: String,
    submitting: bool,
    scope: RequestScope,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(auth: &AuthContext) -> Guard {
        Guard::anonymous_only(auth)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn canceller(&self) -> Canceller {
        self.scope.canceller()
    }

    pub async fn submit(&mut self, auth: &mut AuthContext) -> ViewOutcome {
        if let Err(e) = require_email(&self.email).and_then(|_| require(&self.password, "password")) {
            return ViewOutcome::error(e.to_string());
        }

        self.submitting = true;
        let res = auth.login(&self.scope, self.email.trim(), &self.password).await;
        self.submitting = false;

        match res {
            Ok(()) => ViewOutcome::success("Login successful!").then(Route::Profile),
            Err(e) => {
                debug!(error = %e, "login rejected");
                ViewOutcome::from_error(&e)
            }
        }
    }
}
