use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

/// One user's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "9d7c6f0e-2b51-4f7e-8a43-61a0b3a9c1d2",
        "user_id": "0b1f9c2e-7f43-4c5a-9a3d-2f1d8b8e6c11",
        "date": "2024-01-31",
        "status": "present",
        "created_at": "2024-01-31T08:59:12Z",
        "updated_at": "2024-01-31T08:59:12Z"
    })
)]
pub struct AttendanceRecord {
    pub id: String,
    pub user_id: String,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}
