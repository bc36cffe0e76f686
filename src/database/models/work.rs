use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NightWorkRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub hours: i64,
    pub reason: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightWorkInput {
    pub date: NaiveDate,
    pub hours: i64,
    pub reason: String,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompensatoryWork {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub hours: i64,
    pub reason: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensatoryWorkInput {
    pub date: NaiveDate,
    pub hours: i64,
    pub reason: String,
    #[serde(default)]
    pub approved: bool,
}
