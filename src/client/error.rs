use thiserror::Error;

/// Client-side form validation failure. Blocks submission; no request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in {0}")]
    Required(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please select both date and time")]
    MissingDateOrTime,
    #[error("Please pick a date from today onwards")]
    PastDate,
    #[error("Please pick one of the available times")]
    UnknownTimeSlot,
    #[error("Please choose a valid {0}")]
    UnknownOption(&'static str),
}

/// Failure of a client operation. `Display` is the text shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Non-2xx answer; `message` is the server's `detail` or the operation default.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("{message}")]
    Transport { message: String, cause: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("Please sign in first")]
    NotAuthenticated,

    #[error("could not persist session: {0}")]
    Storage(String),
}

impl ClientError {
    /// The backend rejected the credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}
