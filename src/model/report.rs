use serde::{Deserialize, Serialize};

/// Raw per-class counts for one date, before percentages are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClassTally {
    pub class_id: String,
    pub class_name: String,
    pub grade: String,
    pub section: String,
    pub enrolled: i64,
    pub present: i64,
}

/// Raw per-route counts for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RouteTally {
    pub route_id: String,
    pub route_name: String,
    pub assigned: i64,
    pub present: i64,
}
