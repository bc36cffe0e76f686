use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Substitution, SubstitutionInput, SubstitutionStatus};

const SUBSTITUTION_COLUMNS: &str = r#"
    id,
    requested_by,
    requested_to,
    date,
    period,
    time,
    class_label,
    status,
    message,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct SubstitutionRepository {
    pool: SqlitePool,
}

impl SubstitutionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, requested_by: Uuid, input: SubstitutionInput) -> Result<Substitution> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let substitution = sqlx::query_as::<_, Substitution>(&format!(
            r#"
            INSERT INTO
                substitutions (
                    id,
                    requested_by,
                    requested_to,
                    date,
                    period,
                    time,
                    class_label,
                    status,
                    message,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {SUBSTITUTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(requested_by)
        .bind(input.requested_to)
        .bind(input.date)
        .bind(input.period)
        .bind(input.time)
        .bind(input.class_label)
        .bind(SubstitutionStatus::Pending)
        .bind(input.message)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(substitution)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Substitution>> {
        let substitution = sqlx::query_as::<_, Substitution>(&format!(
            r#"
            SELECT {SUBSTITUTION_COLUMNS}
            FROM substitutions
            WHERE id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(substitution)
    }

    /// Pending requests awaiting the user's answer.
    pub async fn list_received(&self, user_id: Uuid) -> Result<Vec<Substitution>> {
        let substitutions = sqlx::query_as::<_, Substitution>(&format!(
            r#"
            SELECT {SUBSTITUTION_COLUMNS}
            FROM substitutions
            WHERE requested_to = ? AND status = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(SubstitutionStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(substitutions)
    }

    pub async fn list_sent(&self, user_id: Uuid) -> Result<Vec<Substitution>> {
        let substitutions = sqlx::query_as::<_, Substitution>(&format!(
            r#"
            SELECT {SUBSTITUTION_COLUMNS}
            FROM substitutions
            WHERE requested_by = ?
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(substitutions)
    }

    pub async fn set_status(&self, id: Uuid, status: SubstitutionStatus) -> Result<Substitution> {
        let now = Utc::now();

        let substitution = sqlx::query_as::<_, Substitution>(&format!(
            r#"
            UPDATE substitutions
            SET
                status = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING {SUBSTITUTION_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(substitution)
    }
}
