//! Path to view mapping. Guarding happens per view, see [`Guard`].

use crate::client::auth::{AuthContext, AuthState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    InvestorRegistration,
    FounderRegistration,
    Profile,
    Booking,
    NotFound,
}

const ROUTES: &[(&str, Route)] = &[
    ("/", Route::Landing),
    ("/login", Route::Login),
    ("/register", Route::Register),
    ("/register/investor", Route::InvestorRegistration),
    ("/register/founder", Route::FounderRegistration),
    ("/profile", Route::Profile),
    ("/book-call", Route::Booking),
];

impl Route {
    /// Query strings, fragments and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };
        ROUTES
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, r)| *r)
            .unwrap_or(Route::NotFound)
    }

    pub fn path(&self) -> &'static str {
        ROUTES
            .iter()
            .find(|(_, r)| r == self)
            .map(|(p, _)| *p)
            .unwrap_or("/404")
    }
}

/// A view's decision about whether to render given the auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Session restoration still running.
    Loading,
    Render,
    Redirect(Route),
    SignInRequired,
}

impl Guard {
    /// For views that only make sense to anonymous visitors.
    pub fn anonymous_only(auth: &AuthContext) -> Self {
        match auth.state() {
            AuthState::Initializing => Guard::Loading,
            AuthState::Authenticated(_) => Guard::Redirect(Route::Profile),
            AuthState::Anonymous => Guard::Render,
        }
    }

    pub fn signed_in(auth: &AuthContext) -> Self {
        match auth.state() {
            AuthState::Initializing => Guard::Loading,
            AuthState::Authenticated(_) => Guard::Render,
            AuthState::Anonymous => Guard::SignInRequired,
        }
    }
}
