use crate::client::{error::ClientError, router::Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification shown after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// What the shell should do after a view handled an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOutcome {
    pub toast: Option<Toast>,
    pub navigate: Option<Route>,
}

impl ViewOutcome {
    /// Nothing to show; used when the request was cancelled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            toast: Some(Toast::success(message)),
            navigate: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            toast: Some(Toast::error(message)),
            navigate: None,
        }
    }

    pub fn then(mut self, route: Route) -> Self {
        self.navigate = Some(route);
        self
    }

    /// Error toast for `err`, or nothing if it was a cancellation.
    pub fn from_error(err: &ClientError) -> Self {
        match err {
            ClientError::Cancelled => Self::none(),
            other => Self::error(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(&self.toast, Some(t) if t.kind == ToastKind::Success)
    }
}
