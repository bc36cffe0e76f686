use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    pub id: Uuid,
    pub requested_by: Uuid,
    pub requested_to: Uuid,
    pub date: NaiveDate,
    pub period: String, // e.g. "Morning", "Slot 1"
    pub time: NaiveTime,
    pub class_label: Option<String>,
    pub status: SubstitutionStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionInput {
    pub requested_to: Uuid,
    pub date: NaiveDate,
    pub period: String,
    pub time: NaiveTime,
    pub class_label: Option<String>,
    pub message: Option<String>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum SubstitutionStatus {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}
