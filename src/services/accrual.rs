use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CompensatoryWork, LeaveBalance};
use crate::database::repositories::{LeaveBalanceRepository, NightWorkRepository};
use crate::error::AppError;

/// Eight compensatory hours convert into one compensatory-leave day.
/// The night-work ratio (three approved records per earned day) is
/// applied in SQL by `LeaveBalanceRepository::apply_night_work_tx`.
const COMPENSATORY_HOURS_PER_DAY: i64 = 8;

/// Recomputes night-work credits and grants compensatory days whenever
/// the underlying work records change. Night work is a full recompute
/// from the approved-record set; compensatory work is additive per
/// save and never corrected retroactively. The asymmetry is inherited
/// behavior and kept as-is.
#[derive(Clone)]
pub struct CreditAccrualEngine {
    pool: SqlitePool,
    night_work: NightWorkRepository,
    balances: LeaveBalanceRepository,
}

impl CreditAccrualEngine {
    pub fn new(
        pool: SqlitePool,
        night_work: NightWorkRepository,
        balances: LeaveBalanceRepository,
    ) -> Self {
        Self {
            pool,
            night_work,
            balances,
        }
    }

    /// Run after every create, update or delete of a night-work
    /// record, whether or not `approved` changed: the counters must
    /// reflect the currently-existing approved set. Earned leave moves
    /// by the derived-day delta only, so contributions from monthly
    /// accrual and compensatory conversion survive the recompute.
    pub async fn recalculate_night_work(&self, user_id: Uuid) -> Result<LeaveBalance, AppError> {
        self.balances.get_or_create(user_id).await?;

        let mut tx = self.pool.begin().await?;
        let approved = self.night_work.count_approved_tx(&mut tx, user_id).await?;
        let balance = self
            .balances
            .apply_night_work_tx(&mut tx, user_id, approved)
            .await?;
        tx.commit().await?;

        log::info!(
            "Recalculated night work for user {}: {} credits, {} earned",
            user_id,
            balance.night_work_credits,
            balance.earned_leave
        );

        Ok(balance)
    }

    /// Run on every save of a compensatory-work record. Grants
    /// `hours / 8` days when the record is approved; unapproved saves
    /// only ensure the balance row exists.
    pub async fn grant_compensatory(
        &self,
        record: &CompensatoryWork,
    ) -> Result<LeaveBalance, AppError> {
        let balance = self.balances.get_or_create(record.user_id).await?;

        if !record.approved {
            return Ok(balance);
        }

        let days = record.hours / COMPENSATORY_HOURS_PER_DAY;
        if days == 0 {
            return Ok(balance);
        }

        let balance = self
            .balances
            .credit_compensatory(record.user_id, days)
            .await?;

        log::info!(
            "Granted {} compensatory day(s) to user {} (total: {})",
            days,
            record.user_id,
            balance.compensatory_leave
        );

        Ok(balance)
    }
}
