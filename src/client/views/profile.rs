use crate::{
    auth::dto::UpdateProfileRequest,
    client::{
        auth::AuthContext,
        cancel::{Canceller, RequestScope},
        error::ClientError,
        notify::ViewOutcome,
        router::{Guard, Route},
    },
};

use super::require;

/// Current user's page, with an inline edit form and sign-out.
#[derive(Default)]
pub struct ProfileView {
    pub name: String,
    pub company: String,
    pub additional_info: String,
    editing: bool,
    submitting: bool,
    scope: RequestScope,
}

impl ProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(auth: &AuthContext) -> Guard {
        Guard::signed_in(auth)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn canceller(&self) -> Canceller {
        self.scope.canceller()
    }

    /// Opens the edit form filled with the current values.
    pub fn start_edit(&mut self, auth: &AuthContext) {
        if let Some(user) = auth.user() {
            self.name = user.name.clone();
            self.company = user.company.clone().unwrap_or_default();
            self.additional_info = user.additional_info.clone().unwrap_or_default();
            self.editing = true;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    pub async fn save(&mut self, auth: &mut AuthContext) -> ViewOutcome {
        if let Err(e) = require(&self.name, "name") {
            return ViewOutcome::error(e.to_string());
        }
        // blank text is sent as-is so the backend clears the field
        let req = UpdateProfileRequest {
            name: Some(self.name.trim().to_string()),
            user_type: None,
            company: Some(self.company.trim().to_string()),
            additional_info: Some(self.additional_info.trim().to_string()),
        };

        self.submitting = true;
        let res = auth.update_profile(&self.scope, &req).await;
        self.submitting = false;

        match res {
            Ok(()) => {
                self.editing = false;
                ViewOutcome::success("Profile updated successfully!")
            }
            Err(ClientError::Cancelled) => ViewOutcome::none(),
            // no session, or the backend just rejected it
            Err(e) if !auth.is_authenticated() => ViewOutcome::from_error(&e).then(Route::Login),
            Err(e) => ViewOutcome::from_error(&e),
        }
    }

    pub fn sign_out(&mut self, auth: &mut AuthContext) -> ViewOutcome {
        self.scope.cancel();
        self.editing = false;
        auth.logout();
        ViewOutcome::none().then(Route::Landing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::dto::RegisterRequest,
        client::{notify::Toast, session::SessionStore},
        test_support::{context, spawn_backend, unique_email},
    };

    #[tokio::test]
    async fn edit_and_save_updates_the_user() {
        let base = spawn_backend().await;
        let (mut auth, _store) = context(&base);
        let scope = RequestScope::new();
        auth.restore(&scope).await;
        auth.register(
            &scope,
            &RegisterRequest {
                name: "Ada".into(),
                email: unique_email(),
                password: "12345678".into(),
                company: Some("Old Co".into()),
                additional_info: None,
            },
        )
        .await
        .unwrap();

        let mut view = ProfileView::new();
        assert_eq!(ProfileView::guard(&auth), Guard::Render);
        view.start_edit(&auth);
        assert!(view.is_editing());
        assert_eq!(view.company, "Old Co");

        view.name = "Ada L.".into();
        view.company = "New Co".into();
        let out = view.save(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::success("Profile updated successfully!")));
        assert!(!view.is_editing());
        let user = auth.user().unwrap();
        assert_eq!(user.name, "Ada L.");
        assert_eq!(user.company.as_deref(), Some("New Co"));
    }

    #[tokio::test]
    async fn clearing_fields_removes_them() {
        let base = spawn_backend().await;
        let (mut auth, _store) = context(&base);
        let scope = RequestScope::new();
        auth.restore(&scope).await;
        auth.register(
            &scope,
            &RegisterRequest {
                name: "Ada".into(),
                email: unique_email(),
                password: "12345678".into(),
                company: Some("Old Co".into()),
                additional_info: Some("info".into()),
            },
        )
        .await
        .unwrap();

        let mut view = ProfileView::new();
        view.start_edit(&auth);
        assert_eq!(view.additional_info, "info");
        view.company.clear();
        view.additional_info = "   ".into();
        let out = view.save(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::success("Profile updated successfully!")));

        let user = auth.user().unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.company, None);
        assert_eq!(user.additional_info, None);

        // the backend agrees after a fresh fetch
        let fresh = auth
            .api()
            .fetch_profile(&scope, auth.token().unwrap())
            .await
            .unwrap();
        assert_eq!(fresh.company, None);
        assert_eq!(fresh.additional_info, None);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_locally() {
        let (mut auth, _store) = context("http://127.0.0.1:9");
        let mut view = ProfileView::new();
        let out = view.save(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::error("Please fill in name")));
    }

    #[tokio::test]
    async fn saving_without_a_session_points_to_login() {
        let (mut auth, _store) = context("http://127.0.0.1:9");
        auth.logout();
        assert_eq!(ProfileView::guard(&auth), Guard::SignInRequired);
        let mut view = ProfileView::new();
        view.name = "Ada".into();
        let out = view.save(&mut auth).await;
        assert_eq!(out.toast, Some(Toast::error("Please sign in first")));
        assert_eq!(out.navigate, Some(Route::Login));
    }

    #[tokio::test]
    async fn sign_out_returns_to_landing() {
        let (mut auth, store) = context("http://127.0.0.1:9");
        let mut view = ProfileView::new();
        let out = view.sign_out(&mut auth);
        assert_eq!(out, ViewOutcome::none().then(Route::Landing));
        assert!(!auth.is_authenticated());
        assert_eq!(store.read(), None);
    }
}
