use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error::ProgressError, repo_types::ProgressRecord};

/// Body of `POST /progress`.
///
/// `module_name` stays loosely typed so a number or object is reported as a
/// validation failure inside the envelope instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertProgressRequest {
    #[serde(default, alias = "moduleName")]
    pub module_name: Option<serde_json::Value>,
    #[serde(default, alias = "isCompleted")]
    pub is_completed: bool,
}

/// Uniform response shape for every progress operation.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip)]
    pub failure: Option<ProgressError>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message: None,
            exists: None,
            count: None,
            failure: None,
        }
    }

    pub fn failed(data: T, err: ProgressError) -> Self {
        Self {
            success: false,
            data,
            error: Some(err.to_string()),
            message: None,
            exists: None,
            count: None,
            failure: Some(err),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_exists(mut self, exists: bool) -> Self {
        self.exists = Some(exists);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.failure
            .as_ref()
            .map(ProgressError::status)
            .unwrap_or(StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

pub type RecordEnvelope = Envelope<Option<ProgressRecord>>;
pub type ListEnvelope = Envelope<Vec<ProgressRecord>>;
