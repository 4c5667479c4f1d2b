use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use medguard_core::ReportFailure;
use medguard_reporter::RequestOrchestrator;

/// Shared application state for API handlers.
pub struct AppState {
    pub orchestrator: Arc<RequestOrchestrator>,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/verification-report", post(verification_report))
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "medguard",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.orchestrator.service().provider_name(),
    }))
}

/// Generate a report for one evidence payload.
///
/// Every failure, including a malformed payload, comes back as the same 503.
async fn verification_report(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state
        .orchestrator
        .request_verification_report_from_value(&payload)
        .await
    {
        Ok(report) => Ok(Json(json!({
            "reportText": report.report_text(),
            "verdict": report.verdict(),
        }))),
        Err(failure) => Err(failure_response(failure)),
    }
}

fn failure_response(failure: ReportFailure) -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": failure.message() })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use medguard_core::{EvidenceBundle, REPORT_FAILURE_MESSAGE};
    use medguard_reporter::providers::mock::MockProvider;
    use medguard_reporter::{ReportService, ReportSettings};

    fn state(provider: MockProvider) -> Arc<AppState> {
        let service = ReportService::new(Arc::new(provider), ReportSettings::default());
        let orchestrator = RequestOrchestrator::new(Arc::new(service)).with_delay(Duration::ZERO);
        Arc::new(AppState {
            orchestrator: Arc::new(orchestrator),
        })
    }

    #[test]
    fn router_builds() {
        let _ = build_router(state(MockProvider::new("mock")));
    }

    #[tokio::test]
    async fn health_names_provider() {
        let Json(body) = health(State(state(MockProvider::new("mock")))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "medguard");
        assert_eq!(body["provider"], "mock");
    }

    #[tokio::test]
    async fn report_endpoint_returns_text_and_verdict() {
        let provider = MockProvider::new("mock")
            .with_response(r#"{"report": "Several discrepancies were found."}"#);
        let payload = serde_json::to_value(EvidenceBundle::placeholder()).unwrap();

        let Json(body) = verification_report(State(state(provider)), Json(payload))
            .await
            .unwrap();

        assert_eq!(body["reportText"], "Several discrepancies were found.");
        assert_eq!(body["verdict"], json!(medguard_core::Verdict::Suspicious));
    }

    #[tokio::test]
    async fn malformed_payload_is_normalized_503() {
        let (status, Json(body)) = verification_report(
            State(state(MockProvider::new("mock"))),
            Json(json!({ "recognizedText": "x" })),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": REPORT_FAILURE_MESSAGE }));
    }

    #[tokio::test]
    async fn transport_failure_is_normalized_503() {
        let provider = MockProvider::new("mock").with_transport_error("connection reset");
        let payload = serde_json::to_value(EvidenceBundle::placeholder()).unwrap();

        let (status, Json(body)) = verification_report(State(state(provider)), Json(payload))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.to_string().contains("connection reset"));
    }
}
