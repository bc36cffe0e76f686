use chrono::{DateTime, Datelike, Utc};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::database::models::{BalanceKind, LeaveBalance, User};
use crate::database::repositories::LeaveBalanceRepository;
use crate::error::AppError;

/// Owns the per-user leave counters and the rules for checking and
/// debiting them. Only earned, casual and medical leave are tracked;
/// every other leave type passes through the workflow without touching
/// a counter.
#[derive(Clone)]
pub struct BalanceLedger {
    balances: LeaveBalanceRepository,
}

impl BalanceLedger {
    pub fn new(balances: LeaveBalanceRepository) -> Self {
        Self { balances }
    }

    /// Ensure-exists entry point: every ledger operation starts here.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<LeaveBalance, AppError> {
        Ok(self.balances.get_or_create(user_id).await?)
    }

    /// HOD-gate check. False once the counter has reached zero.
    pub async fn has_sufficient(
        &self,
        user_id: Uuid,
        kind: BalanceKind,
    ) -> Result<bool, AppError> {
        let balance = self.balances.get_or_create(user_id).await?;
        Ok(balance.counter(kind) > 0)
    }

    /// Principal-gate debit. Deliberately unconditional: there is no
    /// sufficiency re-check here, storage just clamps at zero.
    pub async fn debit_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: Uuid,
        kind: BalanceKind,
    ) -> Result<LeaveBalance, AppError> {
        let balance = self.balances.debit_tx(tx, user_id, kind, 1).await?;

        log::info!(
            "Debited 1 {} leave for user {} (remaining: {})",
            kind.label(),
            user_id,
            balance.counter(kind)
        );

        Ok(balance)
    }

    /// Monthly accrual: two earned days per month of service, as a
    /// full recompute rather than an increment, so repeated calls in
    /// the same month are idempotent.
    pub async fn update_earned_leave(&self, user: &User) -> Result<LeaveBalance, AppError> {
        self.balances.get_or_create(user.id).await?;

        let earned = 2 * months_since(user.date_joined, Utc::now());
        let balance = self.balances.set_earned_leave(user.id, earned).await?;

        Ok(balance)
    }
}

/// Whole calendar-month difference, by year and month only.
pub(crate) fn months_since(joined: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.year() as i64 - joined.year() as i64) * 12 + now.month() as i64
        - joined.month() as i64
}
