use actix_web::http::StatusCode;
use derive_more::Display;
use serde::Serialize;
use strum_macros::AsRefStr;
use utoipa::ToSchema;

/// Why a scan did not produce an attendance record.
///
/// Every variant is reported back to the operator; none is retried.
#[derive(Debug, Display, Clone, PartialEq, Eq, AsRefStr)]
pub enum ScanError {
    /// The scanned code or token does not belong to an active student.
    #[display(fmt = "Student not found")]
    UnknownStudent,

    #[display(fmt = "Schedule slot not found")]
    ScheduleNotFound,

    #[display(fmt = "Student is not enrolled in this class")]
    StudentNotEnrolled,

    #[display(fmt = "Not assigned to this bus")]
    NotAssignedToRoute,

    #[display(fmt = "Already checked in today")]
    DuplicateCheckIn,

    /// The insert failed for a reason other than a duplicate.
    #[display(fmt = "{}", _0)]
    RecordingFailed(String),

    /// A read failed before anything was recorded.
    #[display(fmt = "{}", _0)]
    LookupFailed(String),
}

impl std::error::Error for ScanError {}

impl ScanError {
    /// Stable machine-readable name, e.g. `DuplicateCheckIn`.
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ScanError::UnknownStudent | ScanError::ScheduleNotFound => StatusCode::NOT_FOUND,
            ScanError::StudentNotEnrolled | ScanError::NotAssignedToRoute => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ScanError::DuplicateCheckIn => StatusCode::CONFLICT,
            ScanError::RecordingFailed(_) | ScanError::LookupFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON shape of a failed request.
#[derive(Debug, Serialize, ToSchema)]
#[schema(
    example = json!({
        "success": false,
        "code": "DuplicateCheckIn",
        "message": "Already checked in today"
    })
)]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl From<&ScanError> for ErrorBody {
    fn from(e: &ScanError) -> Self {
        Self {
            success: false,
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}
