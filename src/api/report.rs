use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::report;
use crate::store::AttendanceStore;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Defaults to the current UTC date.
    #[param(value_type = Option<String>, format = "date", example = "2026-10-16")]
    pub date: Option<NaiveDate>,
}

/// Daily attendance report
///
/// Present and absent counts per class, per bus route and school-wide for
/// one day.
#[utoipa::path(
    get,
    path = "/api/reports/daily",
    params(ReportQuery),
    responses(
        (status = 200, description = "Attendance figures for the day", body = crate::report::DailyReport),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn daily(
    store: web::Data<dyn AttendanceStore>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let report = report::daily_report(store.get_ref(), date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %date, "Failed to build daily report");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(report))
}
