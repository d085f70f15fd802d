use crate::api::scan::{ScanRequest, ScanResponse, StudentSummary};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceType};
use crate::model::bus::BusRoute;
use crate::model::class_schedule::{DayOfWeek, ScheduleSlot};
use crate::model::student::UserStatus;
use crate::report::{ClassAttendance, DailyReport, OverallAttendance, RouteAttendance};
use crate::scan::ScanContext;
use crate::scan::error::ErrorBody;
use crate::scan::history::ScanRecord;
use crate::scan::session::SessionInfo;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "School Attendance API",
        version = "1.0.0",
        description = r#"
## School Attendance

QR check-in for classrooms and school buses.

### Key Features
- **Scan sessions**
  - A device opens a session for one classroom slot or one bus route, then submits scans
  - Each session keeps its 10 most recent scans, newest first
- **Check-in rules**
  - Students are identified by their QR token (`STUDENT:<id>`) or short student code
  - Classroom scans require enrollment in the slot's class
  - Bus scans require an active assignment to the route
  - At most one record per student per slot or route per day
- **Schedule & routes**
  - Today's slots for a teacher, active bus routes
- **Reports**
  - Daily present/absent figures per class, per route and school-wide

### Response Format
Failed scans carry `success: false`, a `code` naming the reason and a
human-readable `message`.
"#,
    ),
    paths(
        crate::api::scan::open_session,
        crate::api::scan::submit_scan,
        crate::api::scan::recent_scans,
        crate::api::scan::close_session,

        crate::api::schedule::today,

        crate::api::bus::list_routes,

        crate::api::report::daily
    ),
    components(
        schemas(
            ScanContext,
            SessionInfo,
            ScanRequest,
            ScanResponse,
            StudentSummary,
            ScanRecord,
            ErrorBody,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceType,
            UserStatus,
            DayOfWeek,
            ScheduleSlot,
            BusRoute,
            DailyReport,
            OverallAttendance,
            ClassAttendance,
            RouteAttendance
        )
    ),
    tags(
        (name = "Scan", description = "QR scan sessions and check-in"),
        (name = "Schedule", description = "Teacher schedule lookup"),
        (name = "Bus", description = "Bus routes"),
        (name = "Reports", description = "Daily attendance reports"),
    )
)]
pub struct ApiDoc;
