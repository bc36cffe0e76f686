use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::leave::LeaveType;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    pub user_id: Uuid,
    pub earned_leave: i64,
    pub casual_leave: i64,
    pub medical_leave: i64,
    pub night_work_credits: i64,
    pub compensatory_leave: i64,
    pub last_updated: DateTime<Utc>,
}

impl LeaveBalance {
    pub fn counter(&self, kind: BalanceKind) -> i64 {
        match kind {
            BalanceKind::Earned => self.earned_leave,
            BalanceKind::Casual => self.casual_leave,
            BalanceKind::Medical => self.medical_leave,
        }
    }
}

/// The three counters the ledger checks and debits. Compensatory,
/// maternity, paternity, on-duty and custom leave are never
/// balance-tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceKind {
    Earned,
    Casual,
    Medical,
}

impl BalanceKind {
    pub fn for_leave_type(leave_type: LeaveType) -> Option<Self> {
        match leave_type {
            LeaveType::Earned => Some(BalanceKind::Earned),
            LeaveType::Casual => Some(BalanceKind::Casual),
            LeaveType::Medical => Some(BalanceKind::Medical),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            BalanceKind::Earned => "earned_leave",
            BalanceKind::Casual => "casual_leave",
            BalanceKind::Medical => "medical_leave",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BalanceKind::Earned => "earned",
            BalanceKind::Casual => "casual",
            BalanceKind::Medical => "medical",
        }
    }
}
