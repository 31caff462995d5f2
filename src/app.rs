use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, feedback, progress};

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    api_version: String,
    environment: String,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_version: state.config.api_version.clone(),
        environment: state.config.env.to_string(),
    })
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Backend is running." }))
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(progress::router())
                .merge(feedback::router())
                .route("/health", get(|| async { "ok" }))
                .route("/status", get(status)),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let res = build_app(AppState::fake())
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf8"))
    }

    #[tokio::test]
    async fn root_and_health() {
        assert_eq!(
            get_body("/").await,
            (StatusCode::OK, "Backend is running.".to_string())
        );
        assert_eq!(get_body("/api/health").await, (StatusCode::OK, "ok".to_string()));
    }

    #[tokio::test]
    async fn status_reports_environment() {
        let (status, body) = get_body("/api/status").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["api_version"], "v1");
        assert_eq!(json["environment"], "development");
    }

    #[tokio::test]
    async fn me_requires_token() {
        let (status, body) = get_body("/api/me").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing Authorization header"));
    }
}
