//! Persistence seam for the check-in workflow.
//!
//! The workflow only reads students, schedules, enrollments and bus
//! assignments, and inserts attendance records. Everything else in the
//! database belongs to the surrounding administration tools.

use chrono::NaiveDate;
use derive_more::Display;
use futures::future::BoxFuture;

use crate::model::{
    attendance::{AttendanceRecord, NewAttendanceRecord},
    bus::{BusAssignment, BusRoute},
    class_schedule::{DayOfWeek, ScheduleEntry, ScheduleSlot},
    report::{ClassTally, RouteTally},
    student::Student,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlStore;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An insert collided with a uniqueness constraint.
    #[display(fmt = "unique constraint violated: {}", _0)]
    UniqueViolation(String),

    #[display(fmt = "{}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Row access used by the scan pipeline, the schedule picker and the daily
/// report. Implementations must enforce at most one attendance record per
/// (student, schedule, date) and per (student, bus route, date), reporting
/// a collision as [`StoreError::UniqueViolation`].
pub trait AttendanceStore: Send + Sync {
    /// The token of the active student owning `code`, if any.
    fn find_token_by_code<'a>(
        &'a self,
        code: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<String>>>;

    fn find_active_student_by_token<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<Student>>>;

    fn find_schedule<'a>(
        &'a self,
        schedule_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<ScheduleEntry>>>;

    fn is_enrolled<'a>(
        &'a self,
        student_id: &'a str,
        class_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<bool>>;

    fn find_active_bus_assignment<'a>(
        &'a self,
        student_id: &'a str,
        route_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<BusAssignment>>>;

    fn insert_attendance(
        &self,
        record: NewAttendanceRecord,
    ) -> BoxFuture<'_, StoreResult<AttendanceRecord>>;

    fn find_active_route<'a>(
        &'a self,
        route_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<BusRoute>>>;

    /// Active routes sorted by name.
    fn list_active_routes(&self) -> BoxFuture<'_, StoreResult<Vec<BusRoute>>>;

    /// Slots on `day` whose class is taught by `teacher_id`, sorted by period.
    fn teacher_slots<'a>(
        &'a self,
        teacher_id: &'a str,
        day: DayOfWeek,
    ) -> BoxFuture<'a, StoreResult<Vec<ScheduleSlot>>>;

    fn class_tallies(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<ClassTally>>>;

    fn route_tallies(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<RouteTally>>>;

    /// (active students, distinct students with a present record on `date`).
    fn student_presence(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<(i64, i64)>>;
}
