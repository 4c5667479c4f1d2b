//! Scripted progress display shown while a report is generated.
//!
//! Timings are fixed and unrelated to the real request. The display advances
//! through the steps and then waits on the last one until it is cancelled.

use std::time::Duration;

use crate::display::{BOLD, CYAN, DIM, GREEN, RESET};

pub struct Step {
    pub label: &'static str,
    pub duration: Duration,
}

const fn step(label: &'static str, millis: u64) -> Step {
    Step {
        label,
        duration: Duration::from_millis(millis),
    }
}

pub const VERIFICATION_STEPS: [Step; 5] = [
    step("Uploading Images", 500),
    step("Scanning Barcode & OCR", 1500),
    step("Analyzing Image Properties", 2000),
    step("Verifying Against Database", 1500),
    step("Generating Final Report", 1000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

/// Index of the step that is current after `elapsed`.
///
/// Step `i` hands over to `i + 1` after its own duration. The last step's
/// duration is never consumed; it stays current.
pub fn current_step(elapsed: Duration) -> usize {
    let mut boundary = Duration::ZERO;
    for (index, step) in VERIFICATION_STEPS[..VERIFICATION_STEPS.len() - 1].iter().enumerate() {
        boundary += step.duration;
        if elapsed < boundary {
            return index;
        }
    }
    VERIFICATION_STEPS.len() - 1
}

pub fn step_status(index: usize, current: usize) -> StepStatus {
    if index < current {
        StepStatus::Completed
    } else if index == current {
        StepStatus::Current
    } else {
        StepStatus::Pending
    }
}

/// Render the whole step list with `current` highlighted.
pub fn render_steps(current: usize, color: bool) -> String {
    let mut out = String::new();
    for (index, step) in VERIFICATION_STEPS.iter().enumerate() {
        let line = match (step_status(index, current), color) {
            (StepStatus::Completed, true) => format!("  {GREEN}✓{RESET} {DIM}{}{RESET}", step.label),
            (StepStatus::Current, true) => format!("  {CYAN}⟳{RESET} {BOLD}{}{RESET}", step.label),
            (StepStatus::Pending, true) => format!("  {DIM}○ {}{RESET}", step.label),
            (StepStatus::Completed, false) => format!("  [x] {}", step.label),
            (StepStatus::Current, false) => format!("  [>] {}", step.label),
            (StepStatus::Pending, false) => format!("  [ ] {}", step.label),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Play the script on stderr. Never returns on its own after the last step;
/// the caller aborts it once the real request resolves.
pub async fn play(color: bool) {
    eprintln!("Verification in Progress...");
    let start = tokio::time::Instant::now();
    let last = VERIFICATION_STEPS.len() - 1;
    let mut shown = None;

    loop {
        let current = current_step(start.elapsed());
        if shown != Some(current) {
            if shown.is_some() {
                eprintln!();
            }
            eprint!("{}", render_steps(current, color));
            shown = Some(current);
        }
        if current == last {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    eprintln!("Please wait, this may take a moment.");
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_on_cumulative_durations() {
        assert_eq!(current_step(Duration::ZERO), 0);
        assert_eq!(current_step(Duration::from_millis(499)), 0);
        assert_eq!(current_step(Duration::from_millis(500)), 1);
        assert_eq!(current_step(Duration::from_millis(1999)), 1);
        assert_eq!(current_step(Duration::from_millis(2000)), 2);
        assert_eq!(current_step(Duration::from_millis(4000)), 3);
        assert_eq!(current_step(Duration::from_millis(5500)), 4);
        assert_eq!(current_step(Duration::from_secs(60)), 4);
    }

    #[test]
    fn statuses_relative_to_current() {
        assert_eq!(step_status(0, 2), StepStatus::Completed);
        assert_eq!(step_status(2, 2), StepStatus::Current);
        assert_eq!(step_status(4, 2), StepStatus::Pending);
    }

    #[test]
    fn plain_rendering_marks_each_step() {
        let text = render_steps(1, false);
        assert!(text.contains("[x] Uploading Images"));
        assert!(text.contains("[>] Scanning Barcode & OCR"));
        assert!(text.contains("[ ] Generating Final Report"));
    }

    #[tokio::test(start_paused = true)]
    async fn play_keeps_running_until_aborted() {
        let handle = tokio::spawn(play(false));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
