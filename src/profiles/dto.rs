use serde::{Deserialize, Serialize};

/// Founder or investor profile completion; identity fields are pre-filled
/// from the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCompletionRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}
