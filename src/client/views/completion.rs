//! Founder and investor profile completion. Both forms share one view and
//! differ only in their fields and in how they fold into `additional_info`.

use crate::{
    client::{
        api::ProfileKind,
        auth::AuthContext,
        cancel::{Canceller, RequestScope},
        error::ValidationError,
        notify::ViewOutcome,
        router::{Guard, Route},
    },
    profiles::dto::ProfileCompletionRequest,
};

use super::{optional, require};

pub const FOUNDER_STAGES: [&str; 5] = [
    "Idea Stage",
    "MVP Development",
    "Early Traction",
    "Growth Stage",
    "Scaling",
];

pub const MONTHLY_REVENUE: [&str; 6] = [
    "$0",
    "$1 - $1K",
    "$1K - $5K",
    "$5K - $25K",
    "$25K - $100K",
    "$100K+",
];

pub const INVESTMENT_RANGES: [&str; 5] = [
    "$10K - $50K",
    "$50K - $250K",
    "$250K - $1M",
    "$1M - $5M",
    "$5M+",
];

pub const INVESTMENT_STAGES: [&str; 5] = ["Pre-Seed", "Seed", "Series A", "Series B+", "All Stages"];

fn pick(value: &str, options: &[&str], label: &'static str) -> Result<(), ValidationError> {
    require(value, label)?;
    if !options.contains(&value) {
        return Err(ValidationError::UnknownOption(label));
    }
    Ok(())
}

pub trait CompletionForm: Default {
    const KIND: ProfileKind;
    const SUCCESS: &'static str;

    fn company(&self) -> &str;
    fn validate(&self) -> Result<(), ValidationError>;
    fn additional_info(&self) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct FounderForm {
    pub company: String,
    pub stage: String,
    pub revenue: String,
    pub additional_info: String,
}

impl CompletionForm for FounderForm {
    const KIND: ProfileKind = ProfileKind::Founder;
    const SUCCESS: &'static str = "Founder profile completed successfully!";

    fn company(&self) -> &str {
        &self.company
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.company, "company")?;
        pick(&self.stage, &FOUNDER_STAGES, "stage")?;
        if !self.revenue.is_empty() && !MONTHLY_REVENUE.contains(&self.revenue.as_str()) {
            return Err(ValidationError::UnknownOption("revenue"));
        }
        Ok(())
    }

    fn additional_info(&self) -> String {
        format!(
            "Stage: {}, Revenue: {}, Additional Info: {}",
            self.stage,
            self.revenue,
            self.additional_info.trim()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvestorForm {
    pub company: String,
    pub investment_range: String,
    pub investment_stage: String,
    pub areas_of_interest: String,
}

impl CompletionForm for InvestorForm {
    const KIND: ProfileKind = ProfileKind::Investor;
    const SUCCESS: &'static str = "Investor profile completed successfully!";

    fn company(&self) -> &str {
        &self.company
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.company, "company")?;
        pick(&self.investment_range, &INVESTMENT_RANGES, "investment range")?;
        pick(&self.investment_stage, &INVESTMENT_STAGES, "investment stage")
    }

    fn additional_info(&self) -> String {
        format!(
            "Investment Range: {}, Investment Stage: {}, Additional Info: {}",
            self.investment_range,
            self.investment_stage,
            self.areas_of_interest.trim()
        )
    }
}

/// Identity fields come from the signed-in user; `form` holds the rest.
#[derive(Default)]
pub struct ProfileCompletionView<F: CompletionForm> {
    pub name: String,
    pub email: String,
    pub form: F,
    submitting: bool,
    scope: RequestScope,
}

pub type FounderRegistrationView = ProfileCompletionView<FounderForm>;
pub type InvestorRegistrationView = ProfileCompletionView<InvestorForm>;

impl<F: CompletionForm> ProfileCompletionView<F> {
    /// Pre-filled from the current user when there is one.
    pub fn new(auth: &AuthContext) -> Self {
        let mut view = Self {
            name: String::new(),
            email: String::new(),
            form: F::default(),
            submitting: false,
            scope: RequestScope::new(),
        };
        if let Some(user) = auth.user() {
            view.name = user.name.clone();
            view.email = user.email.clone();
        }
        view
    }

    pub fn guard(auth: &AuthContext) -> Guard {
        Guard::signed_in(auth)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn canceller(&self) -> Canceller {
        self.scope.canceller()
    }

    pub fn payload(&self) -> ProfileCompletionRequest {
        ProfileCompletionRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: optional(self.form.company()),
            additional_info: Some(self.form.additional_info()),
        }
    }

    pub async fn submit(&mut self, auth: &mut AuthContext) -> ViewOutcome {
        if !auth.is_authenticated() {
            return ViewOutcome::error("Please sign in first").then(Route::Login);
        }
        if let Err(e) = self.form.validate() {
            return ViewOutcome::error(e.to_string());
        }

        self.submitting = true;
        let res = auth
            .complete_profile(&self.scope, F::KIND, &self.payload())
            .await;
        self.submitting = false;

        match res {
            Ok(()) => ViewOutcome::success(F::SUCCESS).then(Route::Profile),
            Err(e) => ViewOutcome::from_error(&e),
        }
    }
}
