use crate::client::{
    api::ApiClient,
    cancel::{Canceller, RequestScope},
    notify::ViewOutcome,
};

use super::require_email;

/// Email-for-download dialog on the landing page.
#[derive(Default)]
pub struct LeadGateView {
    pub email: String,
    open: bool,
    download_url: Option<String>,
    submitting: bool,
    scope: RequestScope,
}

impl LeadGateView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn canceller(&self) -> Canceller {
        self.scope.canceller()
    }

    /// Link handed out after the last successful submission.
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub async fn submit(&mut self, api: &ApiClient) -> ViewOutcome {
        if let Err(e) = require_email(&self.email) {
            return ViewOutcome::error(e.to_string());
        }

        self.submitting = true;
        let res = api.subscribe_email(&self.scope, self.email.trim()).await;
        self.submitting = false;

        match res {
            Ok(res) => {
                self.download_url = Some(res.download_url);
                self.email.clear();
                self.open = false;
                ViewOutcome::success(res.message)
            }
            Err(e) => ViewOutcome::from_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::notify::Toast,
        config::DEFAULT_DOWNLOAD_URL,
        subscriptions::handlers::SUBSCRIBED_MESSAGE,
        test_support::{spawn_backend, unique_email},
    };

    #[tokio::test]
    async fn subscribing_hands_out_the_download() {
        let base = spawn_backend().await;
        let api = ApiClient::new(&base);
        let mut view = LeadGateView::new();
        view.open();
        view.email = unique_email();

        let out = view.submit(&api).await;
        assert_eq!(out.toast, Some(Toast::success(SUBSCRIBED_MESSAGE)));
        assert_eq!(view.download_url(), Some(DEFAULT_DOWNLOAD_URL));
        assert!(view.email.is_empty());
        assert!(!view.is_open());
    }

    #[tokio::test]
    async fn invalid_email_keeps_the_dialog_open() {
        let api = ApiClient::new("http://127.0.0.1:9");
        let mut view = LeadGateView::new();
        view.open();
        view.email = "not-an-email".into();
        let out = view.submit(&api).await;
        assert_eq!(out.toast, Some(Toast::error("Please enter a valid email address")));
        assert!(view.is_open());
        assert_eq!(view.download_url(), None);
    }

    #[tokio::test]
    async fn cancelled_submission_is_silent() {
        let base = spawn_backend().await;
        let api = ApiClient::new(&base);
        let mut view = LeadGateView::new();
        view.email = unique_email();
        view.canceller().cancel();
        assert_eq!(view.submit(&api).await, ViewOutcome::none());
        assert!(!view.email.is_empty());
    }
}
