pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match API
        .route("/api/v1/match", post(handlers::handle_match))
        // Model API
        .route("/api/v1/model", get(handlers::handle_model_status))
        .route("/api/v1/model/retrain", post(handlers::handle_retrain))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn test_config(dir: &Path) -> Config {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            model_path: dir.join("model.bin"),
            dataset_path: dir.join("dataset.csv"),
            force_retrain: false,
            min_dataset_rows: 100,
            synthetic_target_rows: 120,
            training_seed: 42,
            forest_trees: 10,
            forest_max_depth: 8,
            forest_min_samples_split: 4,
        }
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_model_state() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(AppState::new(test_config(dir.path())));

        let (status, body) = send(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "match-api");
        assert_eq!(body["model_state"], "uninitialized");
    }

    #[tokio::test]
    async fn test_match_with_rule_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(AppState::new(test_config(dir.path())));

        let (status, body) = send(
            app,
            "POST",
            "/api/v1/match",
            Some(json!({
                "resume_text": "Python developer with 5 years of experience in Django, Machine Learning and SQL.",
                "target_job": "Senior Python Developer required with experience in Django and ML."
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_used"], "Rule-Based Fallback");
        assert_eq!(body["probability"], 100.0);
        assert_eq!(body["confidence"], "High");
        assert_eq!(body["experience_analysis"]["status"], "Exceeds");
        assert_eq!(body["roadmap"]["phases"].as_array().unwrap().len(), 4);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_blank_target_job_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(AppState::new(test_config(dir.path())));

        let (status, body) = send(
            app,
            "POST",
            "/api/v1/match",
            Some(json!({ "resume_text": "Python", "target_job": "   " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_retrain_then_status_ready() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(test_config(dir.path()));

        let (status, body) = send(build_router(state.clone()), "POST", "/api/v1/model/retrain", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["metrics"]["rows"], 120);

        let (status, body) = send(build_router(state.clone()), "GET", "/api/v1/model", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "ready");
        assert_eq!(body["model_used"], "Random Forest v2.0");
        assert_eq!(
            body["model_path"],
            dir.path().join("model.bin").display().to_string()
        );
        assert_eq!(
            body["dataset_path"],
            dir.path().join("dataset.csv").display().to_string()
        );

        let (status, body) = send(
            build_router(state),
            "POST",
            "/api/v1/match",
            Some(json!({ "resume_text": "Java, Spring Boot", "target_job": "Java Developer" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_used"], "Random Forest v2.0");
    }

    #[tokio::test]
    async fn test_failed_retrain_is_training_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.synthetic_target_rows = 0;
        let state = AppState::new(config);

        let (status, body) = send(build_router(state.clone()), "POST", "/api/v1/model/retrain", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "TRAINING_ERROR");

        let (_, body) = send(build_router(state), "GET", "/api/v1/model", None).await;
        assert_eq!(body["state"], "fallback");
    }
}
