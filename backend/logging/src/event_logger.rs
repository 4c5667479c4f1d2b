//! Verification Event Logger
//!
//! One structured record per lifecycle step of a report request, written on
//! the `verification_events` target so it can be filtered or routed separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerificationEvent {
    Requested {
        evidence_chars: usize,
    },
    Completed {
        report_chars: usize,
        verdict: String,
        latency_ms: u64,
    },
    Failed {
        error_kind: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: VerificationEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact and emit one verification event.
    pub fn log_event(request_id: Uuid, event: VerificationEvent) -> EventLogEntry {
        let entry = Self::entry(request_id, event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();

        match &entry.event {
            VerificationEvent::Failed { .. } => {
                warn!(
                    target: "verification_events",
                    request_id = %request_id,
                    event = %payload,
                    "Verification event"
                );
            }
            _ => {
                info!(
                    target: "verification_events",
                    request_id = %request_id,
                    event = %payload,
                    "Verification event"
                );
            }
        }

        entry
    }

    fn entry(request_id: Uuid, mut event: VerificationEvent) -> EventLogEntry {
        if let VerificationEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        EventLogEntry {
            request_id,
            timestamp: Utc::now(),
            event,
        }
    }
}
