use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::student::UserStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "r3",
        "name": "North Route",
        "driver_name": "John Smith",
        "status": "active"
    })
)]
pub struct BusRoute {
    pub id: String,
    pub name: String,
    #[schema(nullable = true)]
    pub driver_name: Option<String>,
    pub status: UserStatus,
}

/// Links a student to the route they ride. Deactivated rather than deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusAssignment {
    pub id: String,
    pub student_id: String,
    pub route_id: String,
    pub stop_id: Option<String>,
    pub status: UserStatus,
}
