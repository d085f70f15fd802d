use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::model::class_schedule::{DayOfWeek, ScheduleSlot};
use crate::store::AttendanceStore;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodayScheduleQuery {
    /// Teacher whose classes to list.
    #[param(example = "t9")]
    pub teacher_id: String,
    /// Defaults to the current UTC date.
    #[param(value_type = Option<String>, format = "date", example = "2026-10-16")]
    pub date: Option<NaiveDate>,
}

/// Today's schedule slots for a teacher
///
/// Lists the slots of classes taught by the teacher on the weekday of
/// `date`, ordered by period. Saturdays and Sundays have no slots.
#[utoipa::path(
    get,
    path = "/api/schedule/today",
    params(TodayScheduleQuery),
    responses(
        (status = 200, description = "Slots ordered by period number", body = [ScheduleSlot]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn today(
    store: web::Data<dyn AttendanceStore>,
    query: web::Query<TodayScheduleQuery>,
) -> actix_web::Result<impl Responder> {
    let query = query.into_inner();
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let Some(day) = DayOfWeek::from_weekday(date.weekday()) else {
        return Ok(HttpResponse::Ok().json(Vec::<ScheduleSlot>::new()));
    };

    let slots = store
        .teacher_slots(&query.teacher_id, day)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, teacher_id = %query.teacher_id, "Failed to load schedule");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(slots))
}
