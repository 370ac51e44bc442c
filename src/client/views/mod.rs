//! Form views. Each owns its field values, a `submitting` flag and a
//! [`RequestScope`](crate::client::cancel::RequestScope) that is cancelled
//! when the view is dropped.

pub mod booking;
pub mod completion;
pub mod lead_gate;
pub mod login;
pub mod profile;
pub mod register;

pub use booking::BookingView;
pub use completion::{FounderForm, FounderRegistrationView, InvestorForm, InvestorRegistrationView};
pub use lead_gate::LeadGateView;
pub use login::LoginView;
pub use profile::ProfileView;
pub use register::RegisterView;

use crate::{
    client::error::ValidationError,
    validation::{is_valid_email, non_blank},
};

fn require(value: &str, label: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(label));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ValidationError> {
    require(value, "email")?;
    if !is_valid_email(value.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// `None` for blank input, trimmed text otherwise.
fn optional(value: &str) -> Option<String> {
    non_blank(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_trim_and_check() {
        assert_eq!(require("  ", "name"), Err(ValidationError::Required("name")));
        assert_eq!(require_email("nope"), Err(ValidationError::InvalidEmail));
        assert!(require_email(" a@x.com ").is_ok());
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" Acme "), Some("Acme".to_string()));
    }
}
