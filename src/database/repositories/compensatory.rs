use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CompensatoryWork, CompensatoryWorkInput};

const COMPENSATORY_COLUMNS: &str = r#"
    id,
    user_id,
    date,
    hours,
    reason,
    approved,
    created_at
"#;

#[derive(Clone)]
pub struct CompensatoryWorkRepository {
    pool: SqlitePool,
}

impl CompensatoryWorkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        input: CompensatoryWorkInput,
    ) -> Result<CompensatoryWork> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let record = sqlx::query_as::<_, CompensatoryWork>(&format!(
            r#"
            INSERT INTO
                compensatory_work (id, user_id, date, hours, reason, approved, created_at)
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING {COMPENSATORY_COLUMNS}
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

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CompensatoryWork>> {
        let record = sqlx::query_as::<_, CompensatoryWork>(&format!(
            r#"
            SELECT {COMPENSATORY_COLUMNS}
            FROM compensatory_work
            WHERE id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CompensatoryWork>> {
        let records = sqlx::query_as::<_, CompensatoryWork>(&format!(
            r#"
            SELECT {COMPENSATORY_COLUMNS}
            FROM compensatory_work
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: CompensatoryWorkInput,
    ) -> Result<CompensatoryWork> {
        let record = sqlx::query_as::<_, CompensatoryWork>(&format!(
            r#"
            UPDATE compensatory_work
            SET
                date = ?,
                hours = ?,
                reason = ?,
                approved = ?
            WHERE
                id = ?
            RETURNING {COMPENSATORY_COLUMNS}
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
}
