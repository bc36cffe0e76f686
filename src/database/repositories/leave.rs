use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::database::models::{
    LeaveCounts, LeaveRequest, LeaveRequestInput, LeaveStatus, LeaveType, Role,
};

const LEAVE_COLUMNS: &str = r#"
    id,
    user_id,
    leave_type,
    start_date,
    end_date,
    reason,
    is_hourly,
    hours,
    status,
    hod_approval,
    principal_approval,
    hod_approval_date,
    principal_approval_date,
    substitution_id,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct LeaveRequestRepository {
    pool: SqlitePool,
}

impl LeaveRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new leave request. The entry status is decided by the
    /// workflow (staff requests enter at `pending`, HOD requests at
    /// `pending_principal`).
    pub async fn create(
        &self,
        user_id: Uuid,
        input: LeaveRequestInput,
        status: LeaveStatus,
    ) -> Result<LeaveRequest> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            INSERT INTO
                leave_requests (
                    id,
                    user_id,
                    leave_type,
                    start_date,
                    end_date,
                    reason,
                    is_hourly,
                    hours,
                    status,
                    substitution_id,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(input.leave_type)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.reason)
        .bind(input.is_hourly)
        .bind(input.hours)
        .bind(status)
        .bind(input.substitution_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests from staff in the given department, plus the HOD's own.
    pub async fn list_for_department(&self, department: &str) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE user_id IN (
                SELECT id FROM users WHERE department = ?
            )
            ORDER BY created_at DESC
            "#
        ))
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn list_all(&self) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Everything waiting on the principal: staff requests that
    /// cleared the HOD gate, and HOD-authored requests which skip it.
    pub async fn list_pending_principal(&self) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leave_requests
            WHERE status = ?
                OR (
                    status = ?
                    AND user_id IN (SELECT id FROM users WHERE role = ?)
                )
            ORDER BY created_at DESC
            "#
        ))
        .bind(LeaveStatus::PendingPrincipal)
        .bind(LeaveStatus::Pending)
        .bind(Role::Hod)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Count custom leave requests for a user whose start date falls
    /// in the given calendar month and that are still in flight or
    /// already approved. Rejected and cancelled requests give the slot
    /// back.
    pub async fn count_custom_in_month(&self, user_id: Uuid, month: DateTime<Utc>) -> Result<i64> {
        let month_key = month.format("%Y-%m").to_string();

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COUNT(*)
            FROM
                leave_requests
            WHERE
                user_id = ?
                AND leave_type = ?
                AND strftime('%Y-%m', start_date) = ?
                AND status IN (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(LeaveType::Custom)
        .bind(month_key)
        .bind(LeaveStatus::Pending)
        .bind(LeaveStatus::PendingPrincipal)
        .bind(LeaveStatus::Approved)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// HOD gate: stamp the approval and move the request on to the
    /// principal. The pending precondition sits in the UPDATE itself,
    /// so a request settled by a concurrent call matches zero rows and
    /// comes back as `None`.
    pub async fn set_hod_approved(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE leave_requests
            SET
                hod_approval = 1,
                hod_approval_date = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
                AND status = ?
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(LeaveStatus::PendingPrincipal)
        .bind(now)
        .bind(id)
        .bind(LeaveStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Principal gate: final approval, applied inside the same
    /// transaction as the balance debit. Guarded on the request still
    /// being in flight; `None` means it was settled concurrently and
    /// the caller must roll back.
    pub async fn set_principal_approved_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<Option<LeaveRequest>> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE leave_requests
            SET
                principal_approval = 1,
                principal_approval_date = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
                AND status IN (?, ?)
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(LeaveStatus::Approved)
        .bind(now)
        .bind(id)
        .bind(LeaveStatus::Pending)
        .bind(LeaveStatus::PendingPrincipal)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(request)
    }

    /// Set the status only; approval flags and balances stay as they
    /// are (rejection and cancellation never unwind them). The
    /// transition is guarded on the current status so a request that
    /// already left the expected states matches zero rows.
    pub async fn set_status_from(
        &self,
        id: Uuid,
        status: LeaveStatus,
        expected: &[LeaveStatus],
    ) -> Result<Option<LeaveRequest>> {
        let now = Utc::now();
        let placeholders = vec!["?"; expected.len()].join(", ");

        let sql = format!(
            r#"
            UPDATE leave_requests
            SET
                status = ?,
                updated_at = ?
            WHERE
                id = ?
                AND status IN ({placeholders})
            RETURNING {LEAVE_COLUMNS}
            "#
        );

        let mut query = sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(status)
            .bind(now)
            .bind(id);
        for from in expected {
            query = query.bind(*from);
        }

        let request = query.fetch_optional(&self.pool).await?;

        Ok(request)
    }

    pub async fn counts_for_user(&self, user_id: Uuid) -> Result<LeaveCounts> {
        let counts = sqlx::query_as::<_, LeaveCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(status = 'approved'), 0) AS approved,
                COALESCE(SUM(status = 'pending'), 0) AS pending,
                COALESCE(SUM(status = 'rejected'), 0) AS rejected
            FROM
                leave_requests
            WHERE
                user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn counts_for_department(&self, department: &str) -> Result<LeaveCounts> {
        let counts = sqlx::query_as::<_, LeaveCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(status = 'approved'), 0) AS approved,
                COALESCE(SUM(status = 'pending'), 0) AS pending,
                COALESCE(SUM(status = 'rejected'), 0) AS rejected
            FROM
                leave_requests
            WHERE
                user_id IN (
                    SELECT id FROM users WHERE department = ? AND role = ?
                )
            "#,
        )
        .bind(department)
        .bind(Role::Staff)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
