//! Instruction template for the verification report.
//!
//! Evidence is interpolated verbatim. Nothing is escaped, trimmed, or
//! truncated, so whatever the aggregator produced is exactly what the model sees.

use medguard_core::{EvidenceBundle, OutputSchema};

/// Name of the single string property the model must return.
pub const REPORT_FIELD: &str = "report";

const SCHEMA_NAME: &str = "verification_report";

const REPORT_FIELD_DESCRIPTION: &str =
    "A comprehensive report summarizing the authenticity check for the medicine.";

pub fn report_schema() -> OutputSchema {
    OutputSchema::single_string(SCHEMA_NAME, REPORT_FIELD, REPORT_FIELD_DESCRIPTION)
}

pub fn render_instruction(bundle: &EvidenceBundle) -> String {
    format!(
        "You are an expert in medicine verification and authenticity.\n\
         Based on the following information, generate a comprehensive verification report \
         summarizing the authenticity check for the medicine.\n\
         \n\
         OCR Text: {ocr}\n\
         Barcode Data: {barcode}\n\
         Image Analysis Results: {analysis}\n\
         Database Matches: {matches}\n\
         \n\
         Write a detailed report, including all the details, and all potential discrepancies \
         and their severity. Conclude with an overall assessment of the medicine's authenticity.\n\
         Be very thorough.\n",
        ocr = bundle.recognized_text,
        barcode = bundle.barcode_payload,
        analysis = bundle.image_analysis_summary,
        matches = bundle.database_match_summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_every_field_verbatim() {
        let bundle = EvidenceBundle::new(
            "Paracetamol 500mg, Batch: XYZ123, Exp: 12/2025.",
            "GTIN: 01234567890123",
            "Color 5% off reference.\nLogo {imprint} off-center.",
            "Batch XYZ123 recalled 2 months ago.",
        );
        let instruction = render_instruction(&bundle);
        assert!(instruction.contains(&bundle.recognized_text));
        assert!(instruction.contains(&bundle.barcode_payload));
        assert!(instruction.contains(&bundle.image_analysis_summary));
        assert!(instruction.contains(&bundle.database_match_summary));
    }

    #[test]
    fn directs_the_model() {
        let instruction = render_instruction(&EvidenceBundle::placeholder());
        assert!(instruction.contains("detailed report"));
        assert!(instruction.contains("discrepancies and their severity"));
        assert!(instruction.contains("overall assessment"));
        assert!(instruction.contains("Be very thorough."));
    }

    #[test]
    fn schema_declares_report_field() {
        let schema = report_schema();
        assert_eq!(schema.field(), REPORT_FIELD);
        assert_eq!(schema.to_json_schema()["required"][0], REPORT_FIELD);
    }
}
