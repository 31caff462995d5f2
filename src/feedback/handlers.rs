use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, instrument, warn};

use super::{
    canned::feedback_for,
    dto::{FeedbackRequest, FeedbackResponse, FollowupRequest, FollowupResponse},
    followup::select_questions,
};
use crate::{error::ApiError, state::AppState};

const MAX_TOPIC_CHARS: usize = 100;
const MIN_PROGRESS_CHARS: usize = 10;
const MAX_PROGRESS_CHARS: usize = 1000;

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/llm-feedback", post(llm_feedback))
        .route("/followup-question", post(followup_question))
}

/// Returns the trimmed `(topic, progress)` pair or the reason it was refused.
fn validate_feedback(req: FeedbackRequest) -> Result<(String, String), ApiError> {
    let topic = req.topic.map(|t| t.trim().to_string()).unwrap_or_default();
    let progress = req
        .user_progress
        .map(|p| p.trim().to_string())
        .unwrap_or_default();

    if topic.is_empty() || progress.is_empty() {
        return Err(ApiError::bad_request(
            "Both topic and userProgress are required",
        ));
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(ApiError::bad_request("Topic must be 100 characters or less"));
    }
    let progress_len = progress.chars().count();
    if !(MIN_PROGRESS_CHARS..=MAX_PROGRESS_CHARS).contains(&progress_len) {
        return Err(ApiError::bad_request(
            "User progress must be between 10 and 1000 characters",
        ));
    }
    Ok((topic, progress))
}

#[instrument(skip(body))]
pub async fn llm_feedback(
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        warn!(error = %e, "unreadable feedback body");
        ApiError::bad_request("Both topic and userProgress are required")
    })?;
    let (topic, _progress) = validate_feedback(req)?;

    let canned = feedback_for(&topic);
    debug!(%topic, "feedback served");
    Ok(Json(FeedbackResponse {
        feedback: canned.feedback.to_string(),
        question: canned.question.to_string(),
    }))
}

#[instrument(skip(body))]
pub async fn followup_question(
    body: Result<Json<FollowupRequest>, JsonRejection>,
) -> Result<Json<FollowupResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        warn!(error = %e, "unreadable follow-up body");
        ApiError::bad_request("Invalid request body")
    })?;

    let module_name = req
        .module_name
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::bad_request("Module name is required"))?;

    let now = OffsetDateTime::now_utc();
    let questions = select_questions(
        &module_name,
        &mut rand::thread_rng(),
        now.unix_timestamp_nanos() / 1_000_000,
    );
    let timestamp = now
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal(e.into()))?;

    debug!(
        module = %module_name,
        picked = questions.len(),
        with_progress = req.user_progress.is_some(),
        "follow-up questions generated"
    );
    Ok(Json(FollowupResponse {
        success: true,
        questions,
        module_name,
        timestamp,
    }))
}
