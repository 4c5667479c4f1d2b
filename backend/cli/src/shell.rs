//! `medguard verify`: capture, wait, show, and optionally download or start over.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use medguard_core::{EvidenceBundle, ReportFailure, VerificationReport};
use medguard_reporter::RequestOrchestrator;

use crate::capture::{capture_images, CapturedImages};
use crate::display::{self, note_error, note_info, note_success};
use crate::progress;
use crate::state::VerificationState;

/// Where the four evidence fields come from.
#[derive(Debug, Clone)]
pub enum EvidenceSource {
    /// Built-in stand-in until real extraction exists.
    Placeholder,
    /// Operator-supplied JSON, validated by the report service.
    Payload(Value),
}

impl EvidenceSource {
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Placeholder);
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read evidence file: {}", path.display()))?;
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("Evidence file is not valid JSON: {}", path.display()))?;
        Ok(Self::Payload(value))
    }
}

pub struct VerifyOptions {
    pub evidence: EvidenceSource,
    pub show_progress: bool,
    pub color: bool,
    /// Write the report here as soon as it is ready.
    pub download: Option<PathBuf>,
    pub download_file_name: String,
    pub interactive: bool,
}

/// What the user picked after seeing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Download,
    Reset,
    Quit,
}

pub fn parse_action(input: &str) -> Option<Action> {
    match input.trim().to_ascii_lowercase().as_str() {
        "d" | "download" => Some(Action::Download),
        "r" | "n" | "new" | "reset" => Some(Action::Reset),
        "q" | "quit" | "exit" | "" => Some(Action::Quit),
        _ => None,
    }
}

/// Run one verification: idle → verifying → complete | error.
///
/// The scripted progress plays beside the request and is dropped the moment
/// the request resolves, whichever step it happens to be on.
pub async fn verify_once(
    orchestrator: &RequestOrchestrator,
    images: &CapturedImages,
    evidence: &EvidenceSource,
    show_progress: bool,
    color: bool,
) -> Result<VerificationState> {
    let state = VerificationState::Idle.start()?;

    info!(
        packaging = %images.packaging.path.display(),
        pill = %images.pill.path.display(),
        "Starting verification"
    );

    let progress = show_progress.then(|| tokio::spawn(progress::play(color)));

    let outcome: Result<VerificationReport, ReportFailure> = match evidence {
        EvidenceSource::Placeholder => {
            orchestrator
                .request_verification_report(&EvidenceBundle::placeholder())
                .await
        }
        EvidenceSource::Payload(payload) => {
            orchestrator
                .request_verification_report_from_value(payload)
                .await
        }
    };

    if let Some(handle) = progress {
        handle.abort();
    }

    Ok(state.finish(outcome)?)
}

fn show(state: &VerificationState, color: bool) {
    match state {
        VerificationState::Complete(report) => {
            print!("{}", display::render_report(report, color));
        }
        VerificationState::Error(message) => {
            eprint!("{}", display::render_failure(message, color));
        }
        VerificationState::Idle | VerificationState::Verifying => {}
    }
}

async fn save(report: &VerificationReport, target: &Path) -> Result<()> {
    let written = display::download_report(report, target).await?;
    note_success(&format!("Report saved to {}", written.display()));
    Ok(())
}

fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn prompt_action(input: &mut impl BufRead, has_report: bool) -> Result<Action> {
    let prompt = if has_report {
        "\n[d] download report  [r] start new verification  [q] quit > "
    } else {
        "\n[r] try again  [q] quit > "
    };
    loop {
        match parse_action(&prompt_line(input, prompt)?) {
            Some(Action::Download) if !has_report => note_info("No report to download."),
            Some(action) => return Ok(action),
            None => note_info("Unrecognised choice."),
        }
    }
}

/// Entry point for `medguard verify`. Returns whether the last run produced a report.
pub async fn run(
    orchestrator: &RequestOrchestrator,
    packaging: PathBuf,
    pill: PathBuf,
    options: VerifyOptions,
    input: &mut impl BufRead,
) -> Result<bool> {
    let mut images = capture_images(&packaging, &pill).await?;

    loop {
        let state = verify_once(
            orchestrator,
            &images,
            &options.evidence,
            options.show_progress,
            options.color,
        )
        .await?;
        show(&state, options.color);

        if let (Some(report), Some(target)) = (state.report(), options.download.as_deref()) {
            save(report, target).await?;
        }

        if !options.interactive {
            return Ok(state.report().is_some());
        }

        loop {
            match prompt_action(input, state.report().is_some())? {
                Action::Download => {
                    if let Some(report) = state.report() {
                        let target = display::download_target(None, &options.download_file_name);
                        save(report, &target).await?;
                    }
                }
                Action::Reset => break,
                Action::Quit => return Ok(state.report().is_some()),
            }
        }

        // Starting over: the previous result is dropped and new photos are asked for.
        let _idle = state.reset();
        let packaging = prompt_line(input, "Packaging image path > ")?;
        let pill = prompt_line(input, "Pill image path > ")?;
        match capture_images(Path::new(&packaging), Path::new(&pill)).await {
            Ok(captured) => images = captured,
            Err(e) => {
                note_error(&format!("{e:#}"));
                note_info("Keeping the previous images.");
            }
        }
    }
}
