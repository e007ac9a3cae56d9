pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes", get(handlers::handle_list_resumes))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/select", post(handlers::handle_select))
        .route("/api/v1/session/text", put(handlers::handle_edit))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .route("/api/v1/session/tailor", post(handlers::handle_tailor))
        .route("/api/v1/session/compare", post(handlers::handle_compare))
        .route("/api/v1/session/changes", get(handlers::handle_changes))
        .route("/api/v1/session/export", post(handlers::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::errors::AppError;
    use crate::export::ExportGateway;
    use crate::models::resume::ResumeDocument;
    use crate::session::SharedSession;
    use crate::store::DocumentStore;
    use crate::tailoring::{TailorRequest, TailoredSections, TailoringGateway};

    const JANE: &str = r#"{
        "name": "Jane Doe",
        "email": "jane@example.com",
        "summary": "Backend engineer.",
        "experience": [
            {"company": "Acme", "position": "Engineer", "description": "Built APIs"}
        ],
        "skills": ["Python", "SQL"]
    }"#;

    /// Answers with fixed sections, or a gateway error when `sections` is None.
    struct FakeTailor {
        sections: Option<Value>,
        entered: Arc<Notify>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeTailor {
        fn answering(sections: Value) -> Self {
            Self {
                sections: Some(sections),
                entered: Arc::new(Notify::new()),
                gate: None,
            }
        }

        fn failing() -> Self {
            Self {
                sections: None,
                entered: Arc::new(Notify::new()),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl TailoringGateway for FakeTailor {
        async fn tailor(&self, request: &TailorRequest) -> Result<TailoredSections, AppError> {
            assert!(!request.job_description.trim().is_empty());
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.sections {
                Some(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                None => Err(AppError::Gateway("Tailoring failed: status 500".into())),
            }
        }
    }

    struct FakeExporter {
        configured: bool,
    }

    #[async_trait]
    impl ExportGateway for FakeExporter {
        fn ensure_configured(&self) -> Result<(), AppError> {
            if self.configured {
                Ok(())
            } else {
                Err(AppError::Configuration("endpoint is not configured".into()))
            }
        }

        async fn render(&self, document: &ResumeDocument) -> Result<Bytes, AppError> {
            assert!(document.name.is_some());
            Ok(Bytes::from_static(b"%PDF-1.7 fake"))
        }
    }

    fn app(dir: &TempDir, tailor: FakeTailor) -> Router {
        app_with(dir, tailor, FakeExporter { configured: true })
    }

    fn app_with(dir: &TempDir, tailor: FakeTailor, exporter: FakeExporter) -> Router {
        let resumes = dir.path().join("resumes");
        std::fs::create_dir_all(&resumes).unwrap();
        std::fs::write(resumes.join("jane.json"), JANE).unwrap();
        std::fs::write(resumes.join("madonna.json"), r#"{"name": "Madonna"}"#).unwrap();
        std::fs::write(resumes.join("broken.json"), "{ nope").unwrap();

        let vars = HashMap::from([
            ("RESUMES_DIR", resumes.display().to_string()),
            ("EXPORT_DIR", dir.path().join("out").display().to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        build_router(AppState {
            store: DocumentStore::new(&config.resumes_dir),
            config,
            session: SharedSession::default(),
            tailor: Arc::new(tailor),
            exporter: Arc::new(exporter),
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn select(app: &Router, id: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/v1/session/select",
            Some(json!({"resume_id": id})),
        )
        .await
    }

    async fn tailor(app: &Router) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/v1/session/tailor",
            Some(json!({"job_description": "Senior Rust engineer"})),
        )
        .await
    }

    fn rust_rewrite() -> Value {
        json!({
            "summary": "Rust backend engineer.",
            "skills": ["Python", "SQL", "Rust"]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(&app(&dir, FakeTailor::failing()), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_resumes() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());

        let (status, body) = send(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": "broken.json", "name": "Error Reading Resume"},
                {"id": "jane.json", "name": "Jane Doe"},
                {"id": "madonna.json", "name": "Madonna"}
            ])
        );
    }

    #[tokio::test]
    async fn test_load_tailor_reset_flow() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::answering(rust_rewrite()));

        let (status, loaded) = select(&app, "jane.json").await;
        assert_eq!(status, StatusCode::OK);
        let loaded_text = loaded["text"].as_str().unwrap().to_string();
        assert_eq!(loaded["change_count"], 0);
        assert_eq!(loaded["changes_summary"], "No changes detected.");
        assert_eq!(loaded["legend"].as_array().unwrap().len(), 3);

        let (status, tailored) = tailor(&app).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tailored["change_count"], 2);
        let text = tailored["text"].as_str().unwrap();
        assert!(text.contains("Rust backend engineer."));
        assert!(text.contains("jane@example.com"));
        let summary = tailored["changes_summary"].as_str().unwrap();
        assert!(summary.contains("1. Summary: Content modified"));
        assert!(summary.contains("2. Skills: Added items - Rust"));
        let highlights = tailored["highlights"].as_array().unwrap();
        assert_eq!(highlights.len(), 2);
        assert!(highlights.iter().all(|h| h["category"] == "modified"));

        let (status, changes) = send(&app, Method::GET, "/api/v1/session/changes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(changes["changes"][0]["type"], "text_modified");
        assert_eq!(changes["changes"][1]["type"], "items_added");
        assert!(changes["detailed"]
            .as_str()
            .unwrap()
            .starts_with("=== CHANGE 1: Summary ==="));

        let (status, reset) = send(&app, Method::POST, "/api/v1/session/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reset["text"], loaded_text.as_str());
        assert_eq!(reset["change_count"], 0);
        assert!(reset["highlights"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, Method::GET, "/api/v1/session/changes", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_session() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());
        let (_, loaded) = select(&app, "jane.json").await;

        let (status, body) = select(&app, "broken.json").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PARSE_ERROR");

        let (status, body) = select(&app, "missing.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (_, session) = send(&app, Method::GET, "/api/v1/session", None).await;
        assert_eq!(session["resume_id"], "jane.json");
        assert_eq!(session["text"], loaded["text"]);
    }

    #[tokio::test]
    async fn test_gateway_failure_leaves_session_untouched() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());
        let (_, loaded) = select(&app, "jane.json").await;

        let (status, body) = tailor(&app).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("status 500"));

        let (_, session) = send(&app, Method::GET, "/api/v1/session", None).await;
        assert_eq!(session["text"], loaded["text"]);
        assert_eq!(session["change_count"], 0);

        // the busy mark is gone after the failure
        let (status, _) = send(&app, Method::POST, "/api/v1/session/reset", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tailor_input_errors() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::answering(rust_rewrite()));

        let (status, _) = tailor(&app).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        select(&app, "jane.json").await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/session/tailor",
            Some(json!({"job_description": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(
            &app,
            Method::PUT,
            "/api/v1/session/text",
            Some(json!({"text": "{ \"summary\": "})),
        )
        .await;
        let (status, body) = tailor(&app).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_compare_after_direct_edit() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());
        let (_, loaded) = select(&app, "jane.json").await;

        let edited = loaded["text"]
            .as_str()
            .unwrap()
            .replace("Built APIs", "Built gRPC APIs");
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/session/text",
            Some(json!({"text": edited})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, compared) = send(&app, Method::POST, "/api/v1/session/compare", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compared["change_count"], 1);
        assert!(compared["changes_summary"]
            .as_str()
            .unwrap()
            .contains("1. Experience[0]: Content modified"));
        // company, position and description lines
        assert_eq!(compared["highlights"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_export_writes_named_file() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());
        select(&app, "jane.json").await;

        let (status, body) = send(&app, Method::POST, "/api/v1/session/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bytes"], 13);
        let written = dir.path().join("out").join("Jane_Doe_Resume.pdf");
        assert_eq!(std::fs::read(written).unwrap(), b"%PDF-1.7 fake");
    }

    #[tokio::test]
    async fn test_export_single_token_name_is_input_error() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());
        select(&app, "madonna.json").await;

        let (status, body) = send(&app, Method::POST, "/api/v1/session/export", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INPUT_ERROR");
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_unconfigured_export_is_reported_before_name_check() {
        let dir = TempDir::new().unwrap();
        let app = app_with(&dir, FakeTailor::failing(), FakeExporter { configured: false });
        select(&app, "madonna.json").await;

        let (status, body) = send(&app, Method::POST, "/api/v1/session/export", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_select_keeps_stored_layout() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, FakeTailor::failing());
        std::fs::write(
            dir.path().join("resumes").join("sparse.json"),
            r#"{"email": "j@x.io", "skills": ["Rust"], "name": "Jane Doe", "summary": null}"#,
        )
        .unwrap();

        let (status, loaded) = select(&app, "sparse.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            loaded["text"],
            "{\n    \"email\": \"j@x.io\",\n    \"skills\": [\n        \"Rust\"\n    ],\n    \"name\": \"Jane Doe\",\n    \"summary\": null\n}"
        );
    }

    #[tokio::test]
    async fn test_concurrent_tailor_is_rejected_while_busy() {
        let dir = TempDir::new().unwrap();
        let entered = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let fake = FakeTailor {
            sections: Some(rust_rewrite()),
            entered: entered.clone(),
            gate: Some(gate.clone()),
        };
        let app = app(&dir, fake);
        select(&app, "jane.json").await;

        let first = {
            let app = app.clone();
            tokio::spawn(async move { tailor(&app).await })
        };
        entered.notified().await;

        let (status, body) = tailor(&app).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "BUSY");
        let (status, _) = send(&app, Method::POST, "/api/v1/session/reset", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        gate.notify_one();
        let (status, body) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["change_count"], 2);
    }
}
