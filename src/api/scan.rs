use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::model::attendance::AttendanceRecord;
use crate::scan::history::ScanRecord;
use crate::scan::session::SessionRegistry;
use crate::scan::{ScanContext, ScanOutcome};
use crate::store::AttendanceStore;

#[derive(Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Raw scanner output: an embedded `STUDENT:` token or a short student code.
    #[schema(example = "S1024")]
    pub code: String,
}

#[derive(Serialize, ToSchema)]
pub struct StudentSummary {
    #[schema(example = "u1")]
    pub id: String,
    #[schema(example = "S1024")]
    pub student_code: String,
    #[schema(example = "Emma Williams")]
    pub full_name: String,
}

#[derive(Serialize, ToSchema)]
pub struct ScanResponse {
    pub success: bool,
    /// Failure reason name, absent on success.
    #[schema(example = "DuplicateCheckIn", nullable = true)]
    pub code: Option<String>,
    #[schema(example = "Already checked in today")]
    pub message: String,
    #[schema(nullable = true)]
    pub student: Option<StudentSummary>,
    #[schema(nullable = true)]
    pub record: Option<AttendanceRecord>,
    /// Recent scans of this session, newest first.
    pub recent: Vec<ScanRecord>,
}

impl ScanResponse {
    fn new(outcome: ScanOutcome, recent: Vec<ScanRecord>) -> Self {
        let student = outcome.student.map(|s| StudentSummary {
            id: s.id,
            student_code: s.student_code,
            full_name: s.full_name,
        });

        match outcome.result {
            Ok(record) => Self {
                success: true,
                code: None,
                message: recent
                    .first()
                    .map(|r| r.message.clone())
                    .unwrap_or_default(),
                student,
                record: Some(record),
                recent,
            },
            Err(e) => Self {
                success: false,
                code: Some(e.code().to_string()),
                message: e.to_string(),
                student,
                record: None,
                recent,
            },
        }
    }
}

/// Open a scan session
#[utoipa::path(
    post,
    path = "/api/scan/sessions",
    request_body = ScanContext,
    responses(
        (status = 201, description = "Session opened", body = crate::scan::session::SessionInfo),
        (status = 404, description = "Schedule slot or bus route not found", body = crate::scan::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::scan::error::ErrorBody)
    ),
    tag = "Scan"
)]
pub async fn open_session(
    store: web::Data<dyn AttendanceStore>,
    registry: web::Data<SessionRegistry>,
    payload: web::Json<ScanContext>,
) -> actix_web::Result<impl Responder> {
    let info = registry
        .open(store.get_ref(), payload.into_inner(), Utc::now())
        .await?;

    Ok(HttpResponse::Created().json(info))
}

/// Submit a scan
///
/// Resolves the scanned student, checks eligibility for the session's
/// context and records a `present` attendance record.
#[utoipa::path(
    post,
    path = "/api/scan/sessions/{id}/scans",
    params(("id" = String, Path, description = "Scan session id")),
    request_body = ScanRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = ScanResponse),
        (status = 404, description = "Unknown student, missing slot or session", body = ScanResponse),
        (status = 409, description = "Already checked in today, or a scan is in progress", body = ScanResponse),
        (status = 422, description = "Not enrolled in the class or not assigned to the route", body = ScanResponse),
        (status = 500, description = "Recording failed", body = ScanResponse)
    ),
    tag = "Scan"
)]
#[instrument(name = "api_scan", skip(store, registry, payload), fields(session_id = %path))]
pub async fn submit_scan(
    store: web::Data<dyn AttendanceStore>,
    registry: web::Data<SessionRegistry>,
    path: web::Path<String>,
    payload: web::Json<ScanRequest>,
) -> actix_web::Result<impl Responder> {
    let (outcome, recent) = registry
        .scan(store.get_ref(), &path, &payload.code, Utc::now())
        .await?;

    let status = match &outcome.result {
        Ok(_) => actix_web::http::StatusCode::CREATED,
        Err(e) => e.status_code(),
    };

    Ok(HttpResponse::build(status).json(ScanResponse::new(outcome, recent)))
}

/// Recent scans of a session
///
/// Waits for a scan outstanding on the session, then returns the history
/// including it.
#[utoipa::path(
    get,
    path = "/api/scan/sessions/{id}/recent",
    params(("id" = String, Path, description = "Scan session id")),
    responses(
        (status = 200, description = "Newest first, at most 10", body = [ScanRecord]),
        (status = 404, description = "Session not found", body = crate::scan::error::ErrorBody)
    ),
    tag = "Scan"
)]
pub async fn recent_scans(
    registry: web::Data<SessionRegistry>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shared = registry.get(&path).await?;
    let recent = shared.lock().await.recent();

    Ok(HttpResponse::Ok().json(recent))
}

/// Close a scan session
#[utoipa::path(
    delete,
    path = "/api/scan/sessions/{id}",
    params(("id" = String, Path, description = "Scan session id")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session not found", body = crate::scan::error::ErrorBody)
    ),
    tag = "Scan"
)]
pub async fn close_session(
    registry: web::Data<SessionRegistry>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    registry.close(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::class_schedule::DayOfWeek;
    use crate::model::student::UserStatus;
    use crate::store::memory::MemoryStore;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    fn app_data() -> (web::Data<dyn AttendanceStore>, web::Data<SessionRegistry>) {
        let store = MemoryStore::new();
        store.add_student("u1", "S1024", "Emma Williams", UserStatus::Active);
        store.add_class("c7", "Grade 9 - Section A", "t9");
        store.add_period("p2", 2);
        store.add_schedule("sch42", "c7", "p2", DayOfWeek::Friday);
        store.enroll("u1", "c7");
        store.add_route("r3", "East Route", UserStatus::Active);

        let store: Arc<dyn AttendanceStore> = Arc::new(store);
        (
            web::Data::from(store),
            web::Data::new(SessionRegistry::new(100, Duration::from_secs(60))),
        )
    }

    macro_rules! scan_app {
        () => {{
            let (store, registry) = app_data();
            test::init_service(
                App::new()
                    .app_data(store)
                    .app_data(registry)
                    .route("/scan/sessions", web::post().to(open_session))
                    .route("/scan/sessions/{id}", web::delete().to(close_session))
                    .route("/scan/sessions/{id}/scans", web::post().to(submit_scan))
                    .route("/scan/sessions/{id}/recent", web::get().to(recent_scans)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn classroom_scan_then_duplicate() {
        let app = scan_app!();

        let req = test::TestRequest::post()
            .uri("/scan/sessions")
            .set_json(json!({"type": "classroom", "schedule_id": "sch42", "operator_id": "t9"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let session: Value = test::read_body_json(resp).await;
        let id = session["session_id"].as_str().unwrap().to_string();

        let scan = |code: &str| {
            test::TestRequest::post()
                .uri(&format!("/scan/sessions/{id}/scans"))
                .set_json(json!({ "code": code }))
                .to_request()
        };

        let resp = test::call_service(&app, scan("S1024")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Checked In");
        assert_eq!(body["student"]["full_name"], "Emma Williams");
        assert_eq!(body["record"]["schedule_id"], "sch42");
        assert_eq!(body["record"]["type"], "classroom");

        let resp = test::call_service(&app, scan("S1024")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DuplicateCheckIn");
        assert_eq!(body["recent"].as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get()
            .uri(&format!("/scan/sessions/{id}/recent"))
            .to_request();
        let recent: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(recent[0]["message"], "Already checked in today");
        assert_eq!(recent[1]["success"], true);
    }

    #[actix_web::test]
    async fn recent_waits_for_outstanding_scan() {
        let (store, registry) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .app_data(registry.clone())
                .route("/scan/sessions/{id}/recent", web::get().to(recent_scans)),
        )
        .await;

        let context = ScanContext::Bus {
            route_id: "r3".into(),
        };
        let info = registry
            .open(store.get_ref(), context, Utc::now())
            .await
            .unwrap();
        let shared = registry.get(&info.session_id).await.unwrap();
        let busy = shared.lock().await;

        let req = test::TestRequest::get()
            .uri(&format!("/scan/sessions/{}/recent", info.session_id))
            .to_request();
        let release = async move {
            actix_web::rt::task::yield_now().await;
            drop(busy);
        };
        let (resp, ()) = futures::join!(test::call_service(&app, req), release);

        assert_eq!(resp.status(), StatusCode::OK);
        let recent: Value = test::read_body_json(resp).await;
        assert_eq!(recent, json!([]));
    }

    #[actix_web::test]
    async fn off_route_bus_scan_is_unprocessable() {
        let app = scan_app!();

        let req = test::TestRequest::post()
            .uri("/scan/sessions")
            .set_json(json!({"type": "bus", "route_id": "r3"}))
            .to_request();
        let session: Value = test::call_and_read_body_json(&app, req).await;
        let id = session["session_id"].as_str().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/scan/sessions/{id}/scans"))
            .set_json(json!({ "code": "STUDENT:u1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "NotAssignedToRoute");
        assert_eq!(body["student"]["id"], "u1");
        assert!(body["record"].is_null());
    }

    #[actix_web::test]
    async fn unknown_route_and_session_are_not_found() {
        let app = scan_app!();

        let req = test::TestRequest::post()
            .uri("/scan/sessions")
            .set_json(json!({"type": "bus", "route_id": "r404"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "RouteNotFound");

        let req = test::TestRequest::post()
            .uri("/scan/sessions/missing/scans")
            .set_json(json!({ "code": "S1024" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/scan/sessions/missing")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
