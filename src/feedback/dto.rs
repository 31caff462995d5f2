use serde::{Deserialize, Serialize};

use super::followup::FollowupQuestion;

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, rename = "userProgress", alias = "user_progress")]
    pub user_progress: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
    pub question: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FollowupRequest {
    #[serde(default, rename = "moduleName", alias = "module_name")]
    pub module_name: Option<String>,
    /// Free-form; accepted for compatibility, not used for selection.
    #[serde(default, rename = "userProgress", alias = "user_progress")]
    pub user_progress: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct FollowupResponse {
    pub success: bool,
    pub questions: Vec<FollowupQuestion>,
    #[serde(rename = "moduleName")]
    pub module_name: String,
    pub timestamp: String,
}
