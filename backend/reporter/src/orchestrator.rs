use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use medguard_core::{EvidenceBundle, ReportFailure, VerificationReport, VerifyError};
use medguard_logging::{redact_sensitive_data, EventLogger, VerificationEvent};

use crate::service::ReportService;

/// Pause before each request so the scripted progress display has time to play.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(2000);

/// Boundary between a user action and the [`ReportService`].
///
/// Every failure is logged in full and then replaced by [`ReportFailure`];
/// callers get a report or the one normalized message, nothing in between.
pub struct RequestOrchestrator {
    service: Arc<ReportService>,
    delay: Duration,
}

impl RequestOrchestrator {
    pub fn new(service: Arc<ReportService>) -> Self {
        Self {
            service,
            delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Override the pre-request delay. `Duration::ZERO` disables it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn service(&self) -> &ReportService {
        &self.service
    }

    pub async fn request_verification_report(
        &self,
        bundle: &EvidenceBundle,
    ) -> Result<VerificationReport, ReportFailure> {
        let evidence_chars = bundle.recognized_text.len()
            + bundle.barcode_payload.len()
            + bundle.image_analysis_summary.len()
            + bundle.database_match_summary.len();

        self.run(evidence_chars, self.service.generate_report(bundle))
            .await
    }

    /// Same as [`request_verification_report`](Self::request_verification_report)
    /// for payloads that have not been validated yet.
    pub async fn request_verification_report_from_value(
        &self,
        payload: &Value,
    ) -> Result<VerificationReport, ReportFailure> {
        let evidence_chars = payload.to_string().len();
        self.run(
            evidence_chars,
            self.service.generate_report_from_value(payload),
        )
        .await
    }

    async fn run<F>(
        &self,
        evidence_chars: usize,
        generate: F,
    ) -> Result<VerificationReport, ReportFailure>
    where
        F: Future<Output = Result<VerificationReport, VerifyError>>,
    {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        EventLogger::log_event(request_id, VerificationEvent::Requested { evidence_chars });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match generate.await {
            Ok(report) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                info!(request_id = %request_id, latency_ms, "Verification report ready");
                EventLogger::log_event(
                    request_id,
                    VerificationEvent::Completed {
                        report_chars: report.report_text().len(),
                        verdict: report.verdict().to_string(),
                        latency_ms,
                    },
                );
                Ok(report)
            }
            Err(e) => {
                let detail = redact_sensitive_data(&e.to_string());
                error!(
                    request_id = %request_id,
                    provider = %self.service.provider_name(),
                    error_kind = e.kind(),
                    error = %detail,
                    "Error generating verification report"
                );
                EventLogger::log_event(
                    request_id,
                    VerificationEvent::Failed {
                        error_kind: e.kind().to_string(),
                        error_msg: detail,
                    },
                );
                Err(ReportFailure)
            }
        }
    }
}
