//! Monitor state machine: the tracked course set, per-course records and
//! the found/pending lifecycle driving each scan cycle.

pub mod commands;
pub mod course;
pub mod scan;

pub use course::CourseCode;

use std::collections::HashMap;

/// Per-course tracking record.
///
/// Slot and vacancy exist exactly when the course has been found, and a
/// found record never reverts to pending for the lifetime of the tracked
/// set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRecord {
    Pending,
    Found { slot: &'static str, vacancy: u32 },
}

impl CourseRecord {
    pub fn is_found(&self) -> bool {
        matches!(self, CourseRecord::Found { .. })
    }
}

/// Overall task phase, derived from the state rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Monitoring disabled.
    Idle,
    /// Enabled, waiting for the operator to submit course codes.
    AwaitingCourses,
    /// Enabled with a non-empty tracked set.
    Scanning,
}

/// Mutable monitor state, owned by the scheduler loop and passed into the
/// command processor and the scan cycle. Exactly one record exists per
/// tracked course, created the moment the course is added.
#[derive(Debug, Default)]
pub struct MonitorState {
    enabled: bool,
    tracked: Vec<CourseCode>,
    records: HashMap<CourseCode, CourseRecord>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> Phase {
        if !self.enabled {
            Phase::Idle
        } else if self.tracked.is_empty() {
            Phase::AwaitingCourses
        } else {
            Phase::Scanning
        }
    }

    /// `/start`: reset everything and await a fresh course list.
    pub fn start(&mut self) {
        self.enabled = true;
        self.tracked.clear();
        self.records.clear();
    }

    /// `/stop`: clear everything and disable.
    pub fn stop(&mut self) {
        self.enabled = false;
        self.tracked.clear();
        self.records.clear();
    }

    /// Tracked courses in the order the operator submitted them.
    pub fn tracked(&self) -> &[CourseCode] {
        &self.tracked
    }

    pub fn record(&self, code: &CourseCode) -> Option<&CourseRecord> {
        self.records.get(code)
    }

    /// Replace the tracked set with `codes`, deduplicated preserving
    /// order, each with a fresh pending record.
    pub fn set_courses(&mut self, codes: Vec<CourseCode>) {
        self.tracked.clear();
        self.records.clear();
        for code in codes {
            if !self.tracked.contains(&code) {
                self.records.insert(code.clone(), CourseRecord::Pending);
                self.tracked.push(code);
            }
        }
    }

    /// Tracked courses still pending, in tracked order.
    pub fn pending(&self) -> Vec<CourseCode> {
        self.tracked
            .iter()
            .filter(|c| !self.records.get(*c).is_some_and(|r| r.is_found()))
            .cloned()
            .collect()
    }

    /// Transition a course to found. Monotonic: once found, later calls
    /// for the same course are ignored.
    pub fn mark_found(&mut self, code: &CourseCode, slot: &'static str, vacancy: u32) {
        if let Some(record) = self.records.get_mut(code) {
            if !record.is_found() {
                *record = CourseRecord::Found { slot, vacancy };
            }
        }
    }

    /// Clear the tracked set and records but keep the enable flag, so the
    /// operator can submit the next course list without another `/start`.
    pub fn clear_courses(&mut self) {
        self.tracked.clear();
        self.records.clear();
    }
}
