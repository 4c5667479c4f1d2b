use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// Free-text authenticity report produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    report_text: String,
}

impl VerificationReport {
    /// Wrap model output. Blank text is not a report.
    pub fn new(report_text: impl Into<String>) -> Result<Self, VerifyError> {
        let report_text = report_text.into();
        if report_text.trim().is_empty() {
            return Err(VerifyError::Generation("report text is empty".into()));
        }
        Ok(Self { report_text })
    }

    pub fn report_text(&self) -> &str {
        &self.report_text
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::assess(&self.report_text)
    }
}

/// Keywords whose presence anywhere in a report flags it as suspicious.
pub const SUSPICIOUS_KEYWORDS: [&str; 3] = ["suspicious", "discrepancies", "recalled"];

/// Badge shown next to a report. Derived from the text, never from the model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Suspicious,
    Verified,
}

impl Verdict {
    /// Case-insensitive keyword scan over the report text.
    pub fn assess(report_text: &str) -> Self {
        let lowered = report_text.to_lowercase();
        if SUSPICIOUS_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Verdict::Suspicious
        } else {
            Verdict::Verified
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Suspicious => write!(f, "Suspicious"),
            Verdict::Verified => write!(f, "Verified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_report() {
        assert!(VerificationReport::new("").is_err());
        assert!(VerificationReport::new("  \n\t").is_err());
    }

    #[test]
    fn serializes_report_text_field() {
        let report = VerificationReport::new("All good.").unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["reportText"], "All good.");
    }

    #[test]
    fn keyword_scan_flags_suspicious() {
        assert_eq!(
            Verdict::assess("Batch was RECALLED two months ago."),
            Verdict::Suspicious
        );
        assert_eq!(
            Verdict::assess("Several Discrepancies were found."),
            Verdict::Suspicious
        );
        assert_eq!(
            Verdict::assess("Packaging and pill match the reference."),
            Verdict::Verified
        );
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Suspicious.to_string(), "Suspicious");
        assert_eq!(Verdict::Verified.to_string(), "Verified");
    }
}
