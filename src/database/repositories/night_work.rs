use anyhow::Result;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::database::models::{NightWorkInput, NightWorkRecord};

const NIGHT_WORK_COLUMNS: &str = r#"
    id,
    user_id,
    date,
    hours,
    reason,
    approved,
    created_at
"#;

#[derive(Clone)]
pub struct NightWorkRepository {
    pool: SqlitePool,
}

impl NightWorkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, input: NightWorkInput) -> Result<NightWorkRecord> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let record = sqlx::query_as::<_, NightWorkRecord>(&format!(
            r#"
            INSERT INTO
                night_work_records (id, user_id, date, hours, reason, approved, created_at)
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING {NIGHT_WORK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(input.date)
        .bind(input.hours)
        .bind(input.reason)
        .bind(input.approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<NightWorkRecord>> {
        let record = sqlx::query_as::<_, NightWorkRecord>(&format!(
            r#"
            SELECT {NIGHT_WORK_COLUMNS}
            FROM night_work_records
            WHERE id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<NightWorkRecord>> {
        let records = sqlx::query_as::<_, NightWorkRecord>(&format!(
            r#"
            SELECT {NIGHT_WORK_COLUMNS}
            FROM night_work_records
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn update(&self, id: Uuid, input: NightWorkInput) -> Result<NightWorkRecord> {
        let record = sqlx::query_as::<_, NightWorkRecord>(&format!(
            r#"
            UPDATE night_work_records
            SET
                date = ?,
                hours = ?,
                reason = ?,
                approved = ?
            WHERE
                id = ?
            RETURNING {NIGHT_WORK_COLUMNS}
            "#
        ))
        .bind(input.date)
        .bind(input.hours)
        .bind(input.reason)
        .bind(input.approved)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM night_work_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count of currently-approved records, read inside the
    /// recomputation transaction.
    pub async fn count_approved_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: Uuid,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COUNT(*)
            FROM
                night_work_records
            WHERE
                user_id = ?
                AND approved = 1
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count)
    }
}
