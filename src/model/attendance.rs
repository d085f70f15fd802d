use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceType {
    Classroom,
    Bus,
}

/// A stored attendance event. At most one exists per (student, context, date)
/// where the context is `schedule_id` for classroom records and
/// `bus_route_id` for bus records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "0b7c8f2e-1c5d-4f7e-8a1b-3c2d4e5f6a7b",
        "student_id": "u1",
        "class_id": "c7",
        "schedule_id": "sch42",
        "bus_route_id": null,
        "recorded_by": "t9",
        "status": "present",
        "type": "classroom",
        "date": "2026-10-16",
        "scanned_at": "2026-10-16T08:02:11Z"
    })
)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    #[schema(nullable = true)]
    pub class_id: Option<String>,
    #[schema(nullable = true)]
    pub schedule_id: Option<String>,
    #[schema(nullable = true)]
    pub bus_route_id: Option<String>,
    #[schema(nullable = true)]
    pub recorded_by: Option<String>,
    pub status: AttendanceStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub attendance_type: AttendanceType,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "date-time")]
    pub scanned_at: DateTime<Utc>,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub student_id: String,
    pub class_id: Option<String>,
    pub schedule_id: Option<String>,
    pub bus_route_id: Option<String>,
    pub recorded_by: Option<String>,
    pub status: AttendanceStatus,
    pub attendance_type: AttendanceType,
    pub date: NaiveDate,
    pub scanned_at: DateTime<Utc>,
}

impl NewAttendanceRecord {
    pub fn into_record(self, id: String) -> AttendanceRecord {
        AttendanceRecord {
            id,
            student_id: self.student_id,
            class_id: self.class_id,
            schedule_id: self.schedule_id,
            bus_route_id: self.bus_route_id,
            recorded_by: self.recorded_by,
            status: self.status,
            attendance_type: self.attendance_type,
            date: self.date,
            scanned_at: self.scanned_at,
        }
    }
}
