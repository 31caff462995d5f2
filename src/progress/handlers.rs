use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{Envelope, ListEnvelope, RecordEnvelope, UpsertProgressRequest},
    error::ProgressError,
};
use crate::{auth::Principal, state::AppState};

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/progress", get(list_progress).post(upsert_progress))
        .route(
            "/progress/:module_name",
            get(get_progress).delete(delete_progress),
        )
}

#[instrument(skip(state, body))]
pub async fn upsert_progress(
    State(state): State<AppState>,
    principal: Option<Principal>,
    body: Result<Json<UpsertProgressRequest>, JsonRejection>,
) -> RecordEnvelope {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            // missing principal outranks a bad body
            let err = if principal.is_none() {
                ProgressError::AuthenticationMissing
            } else {
                ProgressError::ValidationFailed(rejection.body_text())
            };
            return Envelope::failed(None, err);
        }
    };
    let module_name = req.module_name.as_ref().and_then(|v| v.as_str());
    state
        .progress
        .upsert(principal, module_name, req.is_completed)
        .await
}

#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(module_name): Path<String>,
) -> RecordEnvelope {
    state.progress.get(principal, Some(&module_name)).await
}

#[instrument(skip(state))]
pub async fn list_progress(
    State(state): State<AppState>,
    principal: Option<Principal>,
) -> ListEnvelope {
    state.progress.list(principal).await
}

#[instrument(skip(state))]
pub async fn delete_progress(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(module_name): Path<String>,
) -> RecordEnvelope {
    state.progress.delete(principal, Some(&module_name)).await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{app::build_app, auth::keys::JwtKeys, state::AppState};

    fn bearer(state: &AppState, user_id: Uuid) -> String {
        let token = JwtKeys::from_ref(state)
            .sign_access(user_id)
            .expect("sign access");
        format!("Bearer {token}")
    }

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            req = req.header(header::AUTHORIZATION, auth);
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("request");

        let res = build_app(state.clone()).oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn upsert_then_get_over_http() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/progress",
            Some(&auth),
            Some(json!({"moduleName": " Introduction to AI ", "isCompleted": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Module marked as complete!");
        assert_eq!(body["data"]["module_name"], "Introduction to AI");

        let (status, body) = send(
            &state,
            Method::GET,
            "/api/progress/Introduction%20to%20AI",
            Some(&auth),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], true);
        assert_eq!(body["data"]["is_completed"], true);
    }

    #[tokio::test]
    async fn missing_token_yields_unauthorized_envelope() {
        let state = AppState::fake();
        let (status, body) = send(&state, Method::GET, "/api/progress", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "User not authenticated");
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn garbage_token_is_treated_as_unauthenticated() {
        let state = AppState::fake();
        let (status, body) = send(
            &state,
            Method::DELETE,
            "/api/progress/Intro",
            Some("Bearer not-a-jwt"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "User not authenticated");
    }

    #[tokio::test]
    async fn non_string_module_name_is_a_validation_failure() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/progress",
            Some(&auth),
            Some(json!({"module_name": 42, "is_completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Module name is required and must be a string");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn malformed_body_stays_inside_the_envelope() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/progress")
            .header(header::AUTHORIZATION, &auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let res = build_app(state).oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn list_and_delete_over_http() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());

        for (name, done) in [("A", false), ("B", true), ("A", true)] {
            send(
                &state,
                Method::POST,
                "/api/progress",
                Some(&auth),
                Some(json!({"module_name": name, "is_completed": done})),
            )
            .await;
        }

        let (_, body) = send(&state, Method::GET, "/api/progress", Some(&auth), None).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["module_name"], "A");
        assert_eq!(body["data"][1]["module_name"], "B");

        let (status, body) =
            send(&state, Method::DELETE, "/api/progress/B", Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Progress deleted successfully");

        let (_, body) = send(&state, Method::GET, "/api/progress", Some(&auth), None).await;
        assert_eq!(body["count"], 1);
    }
}
