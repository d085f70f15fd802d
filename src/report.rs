//! Daily attendance figures per class, per bus route and school-wide.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::report::{ClassTally, RouteTally};
use crate::store::{AttendanceStore, StoreResult};

/// `present / total` as a percentage rounded to one decimal; 0 when there is
/// nobody to count.
pub fn percentage(present: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (present as f64 / total as f64 * 1000.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClassAttendance {
    pub class_id: String,
    pub class_name: String,
    pub grade: String,
    pub section: String,
    pub present: i64,
    pub absent: i64,
    pub total: i64,
    #[schema(example = 92.5)]
    pub percentage: f64,
}

impl From<ClassTally> for ClassAttendance {
    fn from(t: ClassTally) -> Self {
        Self {
            percentage: percentage(t.present, t.enrolled),
            absent: (t.enrolled - t.present).max(0),
            present: t.present,
            total: t.enrolled,
            class_id: t.class_id,
            class_name: t.class_name,
            grade: t.grade,
            section: t.section,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RouteAttendance {
    pub route_id: String,
    pub route_name: String,
    pub present: i64,
    pub absent: i64,
    pub total: i64,
    pub percentage: f64,
}

impl From<RouteTally> for RouteAttendance {
    fn from(t: RouteTally) -> Self {
        Self {
            percentage: percentage(t.present, t.assigned),
            absent: (t.assigned - t.present).max(0),
            present: t.present,
            total: t.assigned,
            route_id: t.route_id,
            route_name: t.route_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OverallAttendance {
    pub active_students: i64,
    pub present: i64,
    pub absent: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyReport {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub overall: OverallAttendance,
    pub classes: Vec<ClassAttendance>,
    pub routes: Vec<RouteAttendance>,
}

pub async fn daily_report(store: &dyn AttendanceStore, date: NaiveDate) -> StoreResult<DailyReport> {
    let (active_students, present) = store.student_presence(date).await?;
    let classes = store.class_tallies(date).await?;
    let routes = store.route_tallies(date).await?;

    Ok(DailyReport {
        date,
        overall: OverallAttendance {
            active_students,
            present,
            absent: (active_students - present).max(0),
            percentage: percentage(present, active_students),
        },
        classes: classes.into_iter().map(ClassAttendance::from).collect(),
        routes: routes.into_iter().map(RouteAttendance::from).collect(),
    })
}
