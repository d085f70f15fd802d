use tracing::debug;

use super::error::ScanError;
use super::token::ScanInput;
use crate::model::student::Student;
use crate::store::AttendanceStore;

/// Maps raw scanner input to the active student it identifies.
pub async fn resolve_student(
    store: &dyn AttendanceStore,
    raw: &str,
) -> Result<Student, ScanError> {
    let token = match ScanInput::classify(raw) {
        ScanInput::Empty => return Err(ScanError::UnknownStudent),
        ScanInput::EmbeddedToken(token) => token.to_string(),
        ScanInput::StudentCode(code) => {
            debug!(code, "Looking up token by student code");
            store
                .find_token_by_code(code)
                .await
                .map_err(|e| ScanError::LookupFailed(e.to_string()))?
                .ok_or(ScanError::UnknownStudent)?
        }
    };

    store
        .find_active_student_by_token(&token)
        .await
        .map_err(|e| ScanError::LookupFailed(e.to_string()))?
        .ok_or(ScanError::UnknownStudent)
}
