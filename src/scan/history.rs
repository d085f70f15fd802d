//! Result reporting for the scanning screen.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::ScanOutcome;
use crate::model::attendance::AttendanceType;

/// Entries kept per session, newest first.
pub const RECENT_SCANS_CAPACITY: usize = 10;

const UNKNOWN_STUDENT_NAME: &str = "Unknown Student";

/// One line of the on-screen scan history.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": "u1",
        "name": "Emma Williams",
        "time": "2026-10-16T08:02:11Z",
        "success": true,
        "message": "Checked In"
    })
)]
pub struct ScanRecord {
    /// Student id when the scan resolved, otherwise the raw input.
    pub id: String,
    pub name: String,
    #[schema(value_type = String, format = "date-time")]
    pub time: DateTime<Utc>,
    pub success: bool,
    pub message: String,
}

impl ScanRecord {
    pub fn from_outcome(outcome: &ScanOutcome, time: DateTime<Utc>) -> Self {
        let (id, name) = match &outcome.student {
            Some(student) => (student.id.clone(), student.full_name.clone()),
            None => (outcome.input.clone(), UNKNOWN_STUDENT_NAME.to_string()),
        };

        let message = match &outcome.result {
            Ok(record) => match record.attendance_type {
                AttendanceType::Classroom => "Checked In".to_string(),
                AttendanceType::Bus => "Boarded".to_string(),
            },
            Err(e) => e.to_string(),
        };

        Self {
            id,
            name,
            time,
            success: outcome.result.is_ok(),
            message,
        }
    }
}

/// Bounded most-recent-first history owned by a single scan session.
#[derive(Debug, Clone, Default)]
pub struct RecentScans {
    entries: VecDeque<ScanRecord>,
}

impl RecentScans {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(RECENT_SCANS_CAPACITY),
        }
    }

    /// Pushes to the front, dropping the oldest entry past capacity.
    pub fn push(&mut self, record: ScanRecord) {
        self.entries.push_front(record);
        self.entries.truncate(RECENT_SCANS_CAPACITY);
    }

    pub fn to_vec(&self) -> Vec<ScanRecord> {
        self.entries.iter().cloned().collect()
    }
}
