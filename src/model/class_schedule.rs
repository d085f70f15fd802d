use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// School days a slot can recur on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl DayOfWeek {
    /// Maps a calendar weekday to a school day. Weekends have none.
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(DayOfWeek::Monday),
            Weekday::Tue => Some(DayOfWeek::Tuesday),
            Weekday::Wed => Some(DayOfWeek::Wednesday),
            Weekday::Thu => Some(DayOfWeek::Thursday),
            Weekday::Fri => Some(DayOfWeek::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }
}

/// One recurring (class, room, day, period, week) teaching slot.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ScheduleEntry {
    pub id: String,
    pub class_id: String,
    #[schema(nullable = true)]
    pub room_id: Option<String>,
    pub period_id: String,
    pub day: DayOfWeek,
    #[schema(example = 1)]
    pub week_number: i32,
}

/// A slot joined with its class, period and room, as shown when a teacher
/// picks the period to take attendance for.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "sch42",
        "class_id": "c7",
        "class_name": "Grade 9 - Section A",
        "subject": "Mathematics",
        "grade": "Grade 9",
        "section": "A",
        "period_number": 2,
        "start_time": "09:00:00",
        "end_time": "09:45:00",
        "day": "Monday",
        "week_number": 1,
        "room_name": "Room 02"
    })
)]
pub struct ScheduleSlot {
    pub id: String,
    pub class_id: String,
    pub class_name: String,
    pub subject: String,
    pub grade: String,
    pub section: String,
    pub period_number: i32,
    #[schema(value_type = String, format = "time")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time")]
    pub end_time: NaiveTime,
    pub day: DayOfWeek,
    pub week_number: i32,
    #[schema(nullable = true)]
    pub room_name: Option<String>,
}
