pub mod error;
pub mod evidence;
pub mod report;
pub mod schema;
pub mod traits;

pub use error::{ReportFailure, VerifyError, REPORT_FAILURE_MESSAGE};
pub use evidence::{EvidenceBundle, EVIDENCE_FIELDS};
pub use report::{Verdict, VerificationReport, SUSPICIOUS_KEYWORDS};
pub use schema::OutputSchema;
pub use traits::{LlmProvider, LlmRequest, LlmResponse};
