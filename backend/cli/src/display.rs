//! Terminal output: ANSI styling, notes, report rendering and download.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};

use medguard_core::{Verdict, VerificationReport};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
#[cfg(test)]
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

pub fn note_info(msg: &str) {
    if supports_color() {
        eprintln!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        eprintln!("INFO: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        eprintln!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        eprintln!("OK: {msg}");
    }
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

fn verdict_badge(verdict: Verdict, color: bool) -> String {
    match (verdict, color) {
        (Verdict::Suspicious, true) => format!("{RED}{BOLD}[ ! Suspicious ]{RESET}"),
        (Verdict::Verified, true) => format!("{GREEN}{BOLD}[ ✓ Verified ]{RESET}"),
        (verdict, false) => format!("[ {verdict} ]"),
    }
}

pub fn footer() -> String {
    format!(
        "MedGuard © {}. Your trusted partner in medicine verification.",
        Utc::now().year()
    )
}

/// Full report card: title, verdict badge, body, footer.
pub fn render_report(report: &VerificationReport, color: bool) -> String {
    let title = if color {
        format!("{BOLD}Verification Report{RESET}")
    } else {
        "Verification Report".to_string()
    };
    let rule = "-".repeat(60);

    format!(
        "{title}  {badge}\n\
         This is an AI-generated summary of the verification checks.\n\
         {rule}\n\
         {body}\n\
         {rule}\n\
         {footer}\n",
        badge = verdict_badge(report.verdict(), color),
        body = report.report_text().trim_end(),
        footer = footer(),
    )
}

pub fn render_failure(message: &str, color: bool) -> String {
    let title = if color {
        format!("{RED}{BOLD}Verification Failed{RESET}")
    } else {
        "Verification Failed".to_string()
    };
    format!(
        "{title}\nAn error occurred during the verification process.\n\nError: {message}\n"
    )
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Resolve where a download goes: a directory gets `file_name` appended,
/// anything else is used as the file path.
pub fn download_target(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// Write the plain report text, as the browser download did.
pub async fn download_report(report: &VerificationReport, target: &Path) -> Result<PathBuf> {
    tokio::fs::write(target, report.report_text())
        .await
        .with_context(|| format!("Failed to write report to {}", target.display()))?;
    Ok(target.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn renders_suspicious_badge() {
        let report =
            VerificationReport::new("Batch XYZ123 was recalled. Treat as suspicious.").unwrap();
        let text = render_report(&report, false);
        assert!(text.contains("[ Suspicious ]"));
        assert!(text.contains("Batch XYZ123 was recalled."));
        assert!(text.contains("MedGuard ©"));

        let colored = render_report(&report, true);
        assert!(strip_ansi(&colored).contains("[ ! Suspicious ]"));
    }

    #[test]
    fn renders_verified_badge() {
        let report = VerificationReport::new("Everything matches the reference.").unwrap();
        assert!(render_report(&report, false).contains("[ Verified ]"));
    }

    #[test]
    fn failure_card_shows_message() {
        let text = render_failure("service unavailable", false);
        assert!(text.starts_with("Verification Failed"));
        assert!(text.contains("Error: service unavailable"));
    }

    #[tokio::test]
    async fn downloads_into_directory_with_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = download_target(Some(dir.path()), "MedGuard-Verification-Report.txt");
        assert_eq!(target, dir.path().join("MedGuard-Verification-Report.txt"));

        let report = VerificationReport::new("Report body").unwrap();
        let written = download_report(&report, &target).await.unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), "Report body");
    }

    #[test]
    fn explicit_file_path_is_kept() {
        let target = download_target(Some(Path::new("out/report.txt")), "default.txt");
        assert_eq!(target, PathBuf::from("out/report.txt"));
        assert_eq!(download_target(None, "default.txt"), PathBuf::from("default.txt"));
    }
}
