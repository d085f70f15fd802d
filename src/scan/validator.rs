//! Eligibility checks for a resolved student.
//!
//! The `decide_*` functions are pure: they take relational state that has
//! already been fetched and return either the tuple to record or the precise
//! reason the scan is refused.

use super::error::ScanError;
use crate::model::bus::BusAssignment;
use crate::model::class_schedule::ScheduleEntry;
use crate::store::AttendanceStore;

/// A classroom scan that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomCheckIn {
    pub student_id: String,
    pub class_id: String,
    pub schedule_id: String,
    pub operator_id: String,
}

/// A bus scan that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusCheckIn {
    pub student_id: String,
    pub route_id: String,
}

/// Enrollment in the slot's class gates classroom attendance.
pub fn decide_classroom(
    student_id: &str,
    operator_id: &str,
    schedule: Option<&ScheduleEntry>,
    enrolled: bool,
) -> Result<ClassroomCheckIn, ScanError> {
    let schedule = schedule.ok_or(ScanError::ScheduleNotFound)?;

    if !enrolled {
        return Err(ScanError::StudentNotEnrolled);
    }

    Ok(ClassroomCheckIn {
        student_id: student_id.to_string(),
        class_id: schedule.class_id.clone(),
        schedule_id: schedule.id.clone(),
        operator_id: operator_id.to_string(),
    })
}

pub fn decide_bus(
    student_id: &str,
    route_id: &str,
    assignment: Option<&BusAssignment>,
) -> Result<BusCheckIn, ScanError> {
    match assignment {
        Some(_) => Ok(BusCheckIn {
            student_id: student_id.to_string(),
            route_id: route_id.to_string(),
        }),
        None => Err(ScanError::NotAssignedToRoute),
    }
}

pub async fn validate_classroom(
    store: &dyn AttendanceStore,
    student_id: &str,
    schedule_id: &str,
    operator_id: &str,
) -> Result<ClassroomCheckIn, ScanError> {
    let schedule = store
        .find_schedule(schedule_id)
        .await
        .map_err(|e| ScanError::LookupFailed(e.to_string()))?;

    let enrolled = match &schedule {
        Some(entry) => store
            .is_enrolled(student_id, &entry.class_id)
            .await
            .map_err(|e| ScanError::LookupFailed(e.to_string()))?,
        None => false,
    };

    decide_classroom(student_id, operator_id, schedule.as_ref(), enrolled)
}

pub async fn validate_bus(
    store: &dyn AttendanceStore,
    student_id: &str,
    route_id: &str,
) -> Result<BusCheckIn, ScanError> {
    let assignment = store
        .find_active_bus_assignment(student_id, route_id)
        .await
        .map_err(|e| ScanError::LookupFailed(e.to_string()))?;

    decide_bus(student_id, route_id, assignment.as_ref())
}
