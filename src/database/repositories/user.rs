use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Role, User, UserInput};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user record. The workflow treats users as externally
    /// owned; this exists for seeding and for adapters that sync the
    /// directory in.
    pub async fn create(&self, input: UserInput) -> Result<User> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let date_joined = input.date_joined.unwrap_or(now);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO
                users (
                    id,
                    username,
                    email,
                    role,
                    department,
                    gender,
                    date_joined,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                username,
                email,
                role,
                department,
                gender,
                date_joined,
                created_at,
                updated_at
            "#,
        )
        .bind(id)
        .bind(input.username)
        .bind(input.email)
        .bind(input.role)
        .bind(input.department)
        .bind(input.gender)
        .bind(date_joined)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                username,
                email,
                role,
                department,
                gender,
                date_joined,
                created_at,
                updated_at
            FROM
                users
            WHERE
                id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn count_staff_in_department(&self, department: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COUNT(*)
            FROM
                users
            WHERE
                department = ?
                AND role = ?
            "#,
        )
        .bind(department)
        .bind(Role::Staff)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
