//! Operator command processing.
//!
//! Consumes one inbound text at a time and mutates [`MonitorState`]
//! accordingly, replying through the notifier. Sender filtering happens
//! upstream in the scheduler; everything arriving here is from the
//! operator.

use crate::bot::Notifier;
use crate::monitor::{CourseCode, CourseRecord, MonitorState};

/// Handle one operator message: a command (`/start`, `/stop`, `/list`,
/// matched case-insensitively after trimming) or freeform course-code
/// input while awaiting courses.
pub fn handle_message(state: &mut MonitorState, text: &str, notifier: &dyn Notifier) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "/start" => {
            state.start();
            notifier.notify(
                "🤖 Monitoring started.\nPlease enter course codes (comma or space separated), e.g.:\nECA20, CSE15 MAT21",
            );
        }
        "/stop" => {
            state.stop();
            notifier.notify("🛑 Monitoring stopped.");
        }
        "/list" => notifier.notify(&status_report(state)),
        _ => handle_course_input(state, trimmed, notifier),
    }
}

/// Freeform text is only accepted as a course list while monitoring is
/// enabled and nothing is tracked yet; once a set is tracked it cannot be
/// appended to until cleared.
fn handle_course_input(state: &mut MonitorState, text: &str, notifier: &dyn Notifier) {
    if !state.is_enabled() {
        return;
    }
    if !state.tracked().is_empty() {
        notifier.notify(
            "ℹ️ A course list is already set. Send /stop to clear it, or /list to see status.",
        );
        return;
    }

    let codes: Vec<CourseCode> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(CourseCode::parse)
        .collect();
    if codes.is_empty() {
        notifier.notify("⚠️ No valid course codes found. Send codes like: ECA20, CSE15");
        return;
    }

    state.set_courses(codes);
    let listed: Vec<&str> = state.tracked().iter().map(CourseCode::as_str).collect();
    notifier.notify(&format!("📌 Monitoring courses: {}", listed.join(", ")));
}

fn status_report(state: &MonitorState) -> String {
    if !state.is_enabled() {
        return "ℹ️ Monitoring is not active. Send /start to begin.".to_string();
    }
    if state.tracked().is_empty() {
        return "📋 No courses are currently being monitored.".to_string();
    }

    let mut lines = vec!["📋 Courses status:".to_string()];
    for code in state.tracked() {
        match state.record(code) {
            Some(CourseRecord::Found { slot, vacancy }) => {
                lines.push(format!("{code}: ✅ Found (Slot {slot}, Vacancy {vacancy})"));
            }
            _ => lines.push(format!("{code}: 🔍 Searching")),
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Notifier capturing every message for assertions.
    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, text: &str) {
            self.sent.borrow_mut().push(text.to_string());
        }
    }

    impl Recorder {
        fn last(&self) -> String {
            self.sent.borrow().last().cloned().unwrap_or_default()
        }
        fn count(&self) -> usize {
            self.sent.borrow().len()
        }
    }

    #[test]
    fn test_start_enters_awaiting_courses() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();

        handle_message(&mut state, " /START ", &recorder);

        assert!(state.is_enabled());
        assert!(state.tracked().is_empty());
        assert!(recorder.last().contains("Monitoring started"));
    }

    #[test]
    fn test_stop_clears_and_disables() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "/start", &recorder);
        handle_message(&mut state, "ECA20", &recorder);

        handle_message(&mut state, "/Stop", &recorder);

        assert!(!state.is_enabled());
        assert!(state.tracked().is_empty());
        assert!(recorder.last().contains("Monitoring stopped"));
    }

    #[test]
    fn test_course_tokens_normalized_and_deduped() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "/start", &recorder);

        handle_message(&mut state, " eca20, CSE15  mat21,eca20 ", &recorder);

        let tracked: Vec<&str> = state.tracked().iter().map(CourseCode::as_str).collect();
        assert_eq!(tracked, vec!["ECA20", "CSE15", "MAT21"]);
        assert_eq!(recorder.last(), "📌 Monitoring courses: ECA20, CSE15, MAT21");
    }

    #[test]
    fn test_all_empty_tokens_is_invalid() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "/start", &recorder);

        handle_message(&mut state, " , ,, ", &recorder);

        assert!(state.tracked().is_empty());
        assert!(recorder.last().contains("No valid course codes"));
    }

    #[test]
    fn test_no_append_once_tracked() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "/start", &recorder);
        handle_message(&mut state, "ECA20", &recorder);

        handle_message(&mut state, "CSE15", &recorder);

        let tracked: Vec<&str> = state.tracked().iter().map(CourseCode::as_str).collect();
        assert_eq!(tracked, vec!["ECA20"]);
        assert!(recorder.last().contains("already set"));
    }

    #[test]
    fn test_freeform_ignored_while_disabled() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();

        handle_message(&mut state, "ECA20", &recorder);

        assert!(state.tracked().is_empty());
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_list_disabled() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();

        handle_message(&mut state, "/list", &recorder);

        assert!(recorder.last().contains("not active"));
        assert!(!recorder.last().contains("Found"));
    }

    #[test]
    fn test_list_empty_tracked() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "/start", &recorder);

        handle_message(&mut state, "/list", &recorder);

        assert!(recorder.last().contains("No courses"));
        assert!(!recorder.last().contains("Found"));
    }

    #[test]
    fn test_list_reports_found_and_searching() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "/start", &recorder);
        handle_message(&mut state, "ECA20 CSE15", &recorder);
        state.mark_found(&CourseCode::parse("ECA20").unwrap(), "O", 5);

        handle_message(&mut state, "/list", &recorder);

        let report = recorder.last();
        assert!(report.contains("ECA20: ✅ Found (Slot O, Vacancy 5)"));
        assert!(report.contains("CSE15: 🔍 Searching"));
    }

    #[test]
    fn test_blank_message_ignored() {
        let mut state = MonitorState::new();
        let recorder = Recorder::default();
        handle_message(&mut state, "   ", &recorder);
        assert_eq!(recorder.count(), 0);
    }
}
