//! QR check-in pipeline: resolve the scanned student, check eligibility for
//! the selected context, record the arrival, report the outcome.
//!
//! One call to [`run_scan`] is one pass through
//! `Resolving -> Validating -> Recording`. Every failure comes back as a
//! [`ScanError`] inside the [`ScanOutcome`]; nothing is retried.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::model::{attendance::AttendanceRecord, student::Student};
use crate::store::AttendanceStore;

pub mod error;
pub mod history;
pub mod recorder;
pub mod resolver;
pub mod session;
pub mod token;
pub mod validator;

pub use error::ScanError;
use recorder::CheckIn;

/// What a scanning device is taking attendance for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScanContext {
    /// A classroom period, operated by a staff member.
    Classroom {
        schedule_id: String,
        operator_id: String,
    },
    Bus {
        route_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The input as received from the scanner.
    pub input: String,
    /// Present once the input resolved, even if a later step failed.
    pub student: Option<Student>,
    pub result: Result<AttendanceRecord, ScanError>,
}

#[instrument(name = "scan", skip(store, raw))]
pub async fn run_scan(
    store: &dyn AttendanceStore,
    context: &ScanContext,
    raw: &str,
    scanned_at: DateTime<Utc>,
) -> ScanOutcome {
    let student = match resolver::resolve_student(store, raw).await {
        Ok(student) => student,
        Err(e) => {
            info!(input = raw, reason = %e, "Scan rejected");
            return ScanOutcome {
                input: raw.to_string(),
                student: None,
                result: Err(e),
            };
        }
    };

    debug!(student_id = %student.id, "Student resolved, validating");
    let result = check_in(store, context, &student, scanned_at).await;

    match &result {
        Ok(record) => info!(
            student_id = %student.id,
            record_id = %record.id,
            "Attendance recorded"
        ),
        Err(e) => info!(student_id = %student.id, reason = %e, "Scan rejected"),
    }

    ScanOutcome {
        input: raw.to_string(),
        student: Some(student),
        result,
    }
}

async fn check_in(
    store: &dyn AttendanceStore,
    context: &ScanContext,
    student: &Student,
    scanned_at: DateTime<Utc>,
) -> Result<AttendanceRecord, ScanError> {
    let check_in = match context {
        ScanContext::Classroom {
            schedule_id,
            operator_id,
        } => CheckIn::Classroom(
            validator::validate_classroom(store, &student.id, schedule_id, operator_id).await?,
        ),
        ScanContext::Bus { route_id } => {
            CheckIn::Bus(validator::validate_bus(store, &student.id, route_id).await?)
        }
    };

    recorder::record(store, &check_in, scanned_at).await
}
