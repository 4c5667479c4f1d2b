//! Structured logging for MedGuard.
//!
//! Console and rolling NDJSON file output, secret redaction, and the
//! per-request verification event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, VerificationEvent};
pub use logger::{bootstrap_logger, init_logger};
pub use redact::redact_sensitive_data;
