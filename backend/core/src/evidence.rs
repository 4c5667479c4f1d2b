use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VerifyError;

/// The four text findings gathered for one medicine sample.
///
/// Fields are opaque text. Nothing checks that they agree with each other, and
/// empty strings are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceBundle {
    /// Text read from the packaging.
    #[serde(alias = "ocrText")]
    pub recognized_text: String,
    /// Decoded barcode or QR content.
    #[serde(alias = "barcodeData")]
    pub barcode_payload: String,
    /// Visual discrepancies against reference imagery.
    #[serde(alias = "imageAnalysisResults")]
    pub image_analysis_summary: String,
    /// Registry lookup results.
    #[serde(alias = "databaseMatches")]
    pub database_match_summary: String,
}

/// Canonical field names paired with the legacy names still accepted on input.
pub const EVIDENCE_FIELDS: [(&str, &str); 4] = [
    ("recognizedText", "ocrText"),
    ("barcodePayload", "barcodeData"),
    ("imageAnalysisSummary", "imageAnalysisResults"),
    ("databaseMatchSummary", "databaseMatches"),
];

impl EvidenceBundle {
    pub fn new(
        recognized_text: impl Into<String>,
        barcode_payload: impl Into<String>,
        image_analysis_summary: impl Into<String>,
        database_match_summary: impl Into<String>,
    ) -> Self {
        Self {
            recognized_text: recognized_text.into(),
            barcode_payload: barcode_payload.into(),
            image_analysis_summary: image_analysis_summary.into(),
            database_match_summary: database_match_summary.into(),
        }
    }

    /// Validate an untyped payload and build a bundle from it.
    ///
    /// Fails on the first field that is absent or not a JSON string.
    pub fn from_value(value: &Value) -> Result<Self, VerifyError> {
        let object = value.as_object().ok_or_else(|| {
            VerifyError::Validation(format!(
                "evidence must be a JSON object, got {}",
                json_type(value)
            ))
        })?;

        let [text, barcode, analysis, matches] = EVIDENCE_FIELDS;
        Ok(Self {
            recognized_text: required_string(object, text)?,
            barcode_payload: required_string(object, barcode)?,
            image_analysis_summary: required_string(object, analysis)?,
            database_match_summary: required_string(object, matches)?,
        })
    }

    /// Stand-in evidence used until real extraction exists.
    pub fn placeholder() -> Self {
        Self::new(
            "Paracetamol 500mg, Batch: XYZ123, Exp: 12/2025. Manufactured by PharmaCo.",
            "GTIN: 01234567890123, SN: 9876543210",
            "Packaging color saturation is 5% lower than reference. Font kerning on the batch \
             number shows minor deviation. Pill image analysis indicates the color is within \
             tolerance, but the logo imprint is slightly off-center.",
            "Batch number XYZ123 is valid and registered to PharmaCo, but it was marked as \
             'recalled' 2 months ago due to packaging defects. No other red flags in the database.",
        )
    }
}

fn required_string(
    object: &serde_json::Map<String, Value>,
    (name, legacy): (&str, &str),
) -> Result<String, VerifyError> {
    match object.get(name).or_else(|| object.get(legacy)) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(VerifyError::Validation(format!(
            "field `{name}` must be a string, got {}",
            json_type(other)
        ))),
        None => Err(VerifyError::Validation(format!(
            "missing required field `{name}`"
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
