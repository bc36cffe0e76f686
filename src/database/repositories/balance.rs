use anyhow::Result;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::database::models::{BalanceKind, LeaveBalance};

const BALANCE_COLUMNS: &str = r#"
    user_id,
    earned_leave,
    casual_leave,
    medical_leave,
    night_work_credits,
    compensatory_leave,
    last_updated
"#;

#[derive(Clone)]
pub struct LeaveBalanceRepository {
    pool: SqlitePool,
}

impl LeaveBalanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Balances are created lazily: the first read or write for a user
    /// inserts the default row.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<LeaveBalance> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO
                leave_balances (user_id, last_updated)
            VALUES
                (?, ?)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            SELECT {BALANCE_COLUMNS}
            FROM leave_balances
            WHERE user_id = ?
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<LeaveBalance>> {
        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            SELECT {BALANCE_COLUMNS}
            FROM leave_balances
            WHERE user_id = ?
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }

    /// Debit one of the tracked counters. The stored value is clamped
    /// at zero; the debit itself is unconditional.
    pub async fn debit_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: Uuid,
        kind: BalanceKind,
        amount: i64,
    ) -> Result<LeaveBalance> {
        let now = Utc::now();
        let column = kind.column();

        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            UPDATE leave_balances
            SET
                {column} = MAX(0, {column} - ?),
                last_updated = ?
            WHERE
                user_id = ?
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(amount)
        .bind(now)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(balance)
    }

    /// Full recompute of the earned-leave counter from monthly
    /// accrual.
    pub async fn set_earned_leave(&self, user_id: Uuid, earned: i64) -> Result<LeaveBalance> {
        let now = Utc::now();

        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            UPDATE leave_balances
            SET
                earned_leave = MAX(0, ?),
                last_updated = ?
            WHERE
                user_id = ?
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(earned)
        .bind(now)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    /// Apply a night-work recomputation: overwrite the credit counter
    /// with the approved-record count and shift earned leave by the
    /// derived-day delta, clamped at zero. Both assignments read the
    /// pre-update row, so the delta against the old counter and the
    /// overwrite happen in one statement.
    pub async fn apply_night_work_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: Uuid,
        credits: i64,
    ) -> Result<LeaveBalance> {
        let now = Utc::now();

        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            UPDATE leave_balances
            SET
                earned_leave = MAX(0, earned_leave + (? / 3 - night_work_credits / 3)),
                night_work_credits = ?,
                last_updated = ?
            WHERE
                user_id = ?
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(credits)
        .bind(credits)
        .bind(now)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(balance)
    }

    /// Additive compensatory-day grant.
    pub async fn credit_compensatory(&self, user_id: Uuid, days: i64) -> Result<LeaveBalance> {
        let now = Utc::now();

        let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
            r#"
            UPDATE leave_balances
            SET
                compensatory_leave = MAX(0, compensatory_leave + ?),
                last_updated = ?
            WHERE
                user_id = ?
            RETURNING {BALANCE_COLUMNS}
            "#
        ))
        .bind(days)
        .bind(now)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }
}
