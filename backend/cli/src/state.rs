//! The four-state presentation flow: idle, verifying, complete, error.
//!
//! Owned entirely by the shell. The core never sees these states.

use medguard_core::{ReportFailure, VerificationReport};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    Idle,
    Verifying,
    Complete(VerificationReport),
    Error(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {state}")]
pub struct InvalidTransition {
    pub action: &'static str,
    pub state: &'static str,
}

impl VerificationState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Verifying => "verifying",
            Self::Complete(_) => "complete",
            Self::Error(_) => "error",
        }
    }

    /// Idle → Verifying. Clears nothing else because idle holds nothing.
    pub fn start(self) -> Result<Self, InvalidTransition> {
        match self {
            Self::Idle => Ok(Self::Verifying),
            other => Err(InvalidTransition {
                action: "start",
                state: other.name(),
            }),
        }
    }

    /// Verifying → Complete or Error, depending on the orchestrator's answer.
    pub fn finish(
        self,
        outcome: Result<VerificationReport, ReportFailure>,
    ) -> Result<Self, InvalidTransition> {
        match self {
            Self::Verifying => Ok(match outcome {
                Ok(report) => Self::Complete(report),
                Err(failure) => Self::Error(failure.to_string()),
            }),
            other => Err(InvalidTransition {
                action: "finish",
                state: other.name(),
            }),
        }
    }

    /// Back to idle from anywhere, dropping any report or error.
    pub fn reset(self) -> Self {
        Self::Idle
    }

    pub fn report(&self) -> Option<&VerificationReport> {
        match self {
            Self::Complete(report) => Some(report),
            _ => None,
        }
    }
}
