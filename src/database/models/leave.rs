use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: DateTime<Utc>, // TIMESTAMPTZ
    pub end_date: DateTime<Utc>,   // TIMESTAMPTZ
    pub reason: String,
    pub is_hourly: bool,
    pub hours: i64,
    pub status: LeaveStatus,
    pub hod_approval: bool,
    pub principal_approval: bool,
    pub hod_approval_date: Option<DateTime<Utc>>,
    pub principal_approval_date: Option<DateTime<Utc>>,
    pub substitution_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub leave_type: LeaveType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub reason: String,
    #[serde(default)]
    pub is_hourly: bool,
    #[serde(default)]
    pub hours: i64,
    pub substitution_id: Option<Uuid>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum LeaveType {
        Earned => "earned",
        Casual => "casual",
        Medical => "medical",
        Compensatory => "compensatory",
        Maternity => "maternity",
        Paternity => "paternity",
        OnDuty => "onduty",
        Custom => "custom",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveStatus {
        Pending => "pending",
        PendingPrincipal => "pending_principal",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

impl LeaveStatus {
    /// Approved, rejected and cancelled requests admit no further
    /// transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
        )
    }
}

/// Raw workflow counts for a set of leave requests.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCounts {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
    pub rejected: i64,
}

/// Department-level counts exposed to the HOD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCounts {
    #[serde(flatten)]
    pub leaves: LeaveCounts,
    pub staff_count: i64,
}
