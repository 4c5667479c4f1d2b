use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use medguard_core::{
    EvidenceBundle, LlmProvider, LlmRequest, OutputSchema, VerificationReport, VerifyError,
};

use crate::prompt::{render_instruction, report_schema};

/// Model parameters for report generation.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            model: "google/gemini-2.0-flash-001".to_string(),
            max_tokens: 2048,
            temperature: 0.2,
        }
    }
}

/// Turns an [`EvidenceBundle`] into a [`VerificationReport`] with one model call.
///
/// The service holds no per-request state. Each call renders the instruction,
/// submits it with the report schema, and hands back the report only if the
/// response satisfies that schema.
pub struct ReportService {
    provider: Arc<dyn LlmProvider>,
    settings: ReportSettings,
    schema: OutputSchema,
}

impl ReportService {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ReportSettings) -> Self {
        Self {
            provider,
            settings,
            schema: report_schema(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Validate an untyped payload, then generate.
    ///
    /// A malformed payload fails here without touching the provider.
    pub async fn generate_report_from_value(
        &self,
        payload: &Value,
    ) -> Result<VerificationReport, VerifyError> {
        let bundle = EvidenceBundle::from_value(payload)?;
        self.generate_report(&bundle).await
    }

    pub async fn generate_report(
        &self,
        bundle: &EvidenceBundle,
    ) -> Result<VerificationReport, VerifyError> {
        let request = LlmRequest {
            model: self.settings.model.clone(),
            system_prompt: String::new(),
            user_prompt: render_instruction(bundle),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            output_schema: Some(self.schema.clone()),
        };

        debug!(
            provider = %self.provider.name(),
            model = %request.model,
            prompt_chars = request.user_prompt.len(),
            "Requesting verification report"
        );

        let response = self.provider.complete(&request).await?;
        let text = self.schema.extract(&response.content)?;
        let report = VerificationReport::new(text)?;

        info!(
            provider = %response.provider,
            model = %response.model,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            report_chars = report.report_text().len(),
            "Verification report generated"
        );

        Ok(report)
    }
}
