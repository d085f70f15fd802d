use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle flag shared by students, bus routes and bus assignments.
/// Rows are deactivated, never hard-deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "8c1f5c3e-5a0b-4a57-9a43-52b2f0f6f001",
        "student_code": "S1024",
        "full_name": "Emma Williams",
        "grade": "Grade 9",
        "section": "A",
        "status": "active",
        "qr_code": "STUDENT:8c1f5c3e"
    })
)]
pub struct Student {
    pub id: String,

    #[schema(example = "S1024")]
    pub student_code: String,

    #[schema(example = "Emma Williams")]
    pub full_name: String,

    #[schema(example = "Grade 9")]
    pub grade: String,

    #[schema(example = "A")]
    pub section: String,

    pub status: UserStatus,

    #[schema(example = "STUDENT:8c1f5c3e", nullable = true)]
    pub qr_code: Option<String>,
}
