use actix_web::{HttpResponse, Responder, web};

use crate::store::AttendanceStore;

/// Active bus routes
#[utoipa::path(
    get,
    path = "/api/bus/routes",
    responses(
        (status = 200, description = "Active routes sorted by name", body = [crate::model::bus::BusRoute]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Bus"
)]
pub async fn list_routes(store: web::Data<dyn AttendanceStore>) -> actix_web::Result<impl Responder> {
    let routes = store.list_active_routes().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list bus routes");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(routes))
}
