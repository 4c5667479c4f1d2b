pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod service;

pub use orchestrator::{RequestOrchestrator, DEFAULT_REQUEST_DELAY};
pub use prompt::{render_instruction, report_schema, REPORT_FIELD};
pub use service::{ReportService, ReportSettings};
