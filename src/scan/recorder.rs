use chrono::{DateTime, Utc};
use tracing::warn;

use super::error::ScanError;
use super::validator::{BusCheckIn, ClassroomCheckIn};
use crate::model::attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceType, NewAttendanceRecord,
};
use crate::store::{AttendanceStore, StoreError};

/// What gets written for a validated scan. Scans only ever record arrivals,
/// so the status is always [`AttendanceStatus::Present`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIn {
    Classroom(ClassroomCheckIn),
    Bus(BusCheckIn),
}

impl CheckIn {
    /// The record is dated by the UTC calendar day of the scan.
    pub fn to_new_record(&self, scanned_at: DateTime<Utc>) -> NewAttendanceRecord {
        let date = scanned_at.date_naive();

        match self {
            CheckIn::Classroom(c) => NewAttendanceRecord {
                student_id: c.student_id.clone(),
                class_id: Some(c.class_id.clone()),
                schedule_id: Some(c.schedule_id.clone()),
                bus_route_id: None,
                recorded_by: Some(c.operator_id.clone()),
                status: AttendanceStatus::Present,
                attendance_type: AttendanceType::Classroom,
                date,
                scanned_at,
            },
            CheckIn::Bus(b) => NewAttendanceRecord {
                student_id: b.student_id.clone(),
                class_id: None,
                schedule_id: None,
                bus_route_id: Some(b.route_id.clone()),
                recorded_by: None,
                status: AttendanceStatus::Present,
                attendance_type: AttendanceType::Bus,
                date,
                scanned_at,
            },
        }
    }
}

/// Inserts the record once. A uniqueness collision means the student is
/// already checked in for this context today.
pub async fn record(
    store: &dyn AttendanceStore,
    check_in: &CheckIn,
    scanned_at: DateTime<Utc>,
) -> Result<AttendanceRecord, ScanError> {
    match store.insert_attendance(check_in.to_new_record(scanned_at)).await {
        Ok(record) => Ok(record),
        Err(StoreError::UniqueViolation(_)) => Err(ScanError::DuplicateCheckIn),
        Err(StoreError::Backend(message)) => {
            warn!(error = %message, "Attendance insert failed");
            Err(ScanError::RecordingFailed(message))
        }
    }
}
