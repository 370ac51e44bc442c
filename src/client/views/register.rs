use crate::{
    auth::dto::RegisterRequest,
    client::{
        auth::AuthContext,
        cancel::{Canceller, RequestScope},
        error::ValidationError,
        notify::ViewOutcome,
        router::{Guard, Route},
    },
    validation::is_valid_password,
};

use super::{optional, require, require_email};

#[derive(Default)]
pub struct RegisterView {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub company: String,
    pub additional_info: String,
    submitting: bool,
    scope: RequestScope,
}

impl RegisterView {
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

    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        require(&self.name, "name")?;
        require_email(&self.email)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !is_valid_password(&self.password) {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            company: optional(&self.company),
            additional_info: optional(&self.additional_info),
        })
    }

    pub async fn submit(&mut self, auth: &mut AuthContext) -> ViewOutcome {
        let req = match self.validate() {
            Ok(req) => req,
            Err(e) => return ViewOutcome::error(e.to_string()),
        };

        self.submitting = true;
        let res = auth.register(&self.scope, &req).await;
        self.submitting = false;

        match res {
            Ok(()) => ViewOutcome::success("Registration successful!").then(Route::Profile),
            Err(e) => ViewOutcome::from_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::repo_types::UserType,
        client::notify::Toast,
        test_support::{context, spawn_backend, unique_email},
    };

    fn filled(email: String) -> RegisterView {
        RegisterView {
            name: "A".into(),
            email,
            password: "12345678".into(),
            confirm_password: "12345678".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn mismatch_blocks_without_a_request() {
        // any request would fail with a transport error instead
        let (mut auth, _store) = context("http://127.0.0.1:9");
        let mut view = filled("a@x.com".into());
        view.confirm_password = "87654321".into();
        let out = view.submit(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::error("Passwords do not match")));
        assert_eq!(out.navigate, None);
        assert!(auth.is_loading());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut view = filled("a@x.com".into());
        view.password = "1234567".into();
        view.confirm_password = "1234567".into();
        assert_eq!(view.validate().unwrap_err(), ValidationError::PasswordTooShort);
    }

    #[test]
    fn blank_optionals_are_omitted() {
        let mut view = filled("a@x.com".into());
        view.company = "  ".into();
        view.additional_info = "likes rockets".into();
        let req = view.validate().unwrap();
        assert_eq!(req.company, None);
        assert_eq!(req.additional_info.as_deref(), Some("likes rockets"));
    }

    #[tokio::test]
    async fn registration_lands_on_profile_as_pending() {
        let base = spawn_backend().await;
        let (mut auth, _store) = context(&base);
        auth.restore(&RequestScope::new()).await;

        let mut view = filled(unique_email());
        let out = view.submit(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::success("Registration successful!")));
        assert_eq!(out.navigate, Some(Route::Profile));
        assert_eq!(auth.user().unwrap().user_type, UserType::Pending);
    }

    #[tokio::test]
    async fn duplicate_email_shows_conflict() {
        let base = spawn_backend().await;
        let (mut auth, _store) = context(&base);
        auth.restore(&RequestScope::new()).await;
        let email = unique_email();
        filled(email.clone()).submit(&mut auth).await;
        auth.logout();

        let out = filled(email).submit(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::error("Email already registered")));
        assert!(!auth.is_authenticated());
    }
}
