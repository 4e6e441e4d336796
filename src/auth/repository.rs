use sqlx::PgPool;

use super::models::AdminAccess;
use crate::error::AppResult;

pub struct AccessRepository {
    pool: PgPool,
}

impl AccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_passcode(&self, passcode: &str) -> AppResult<Option<AdminAccess>> {
        let access = sqlx::query_as::<_, AdminAccess>(
            "SELECT id, name, passcode, created_at FROM admin_access WHERE passcode = $1 LIMIT 1",
        )
        .bind(passcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(access)
    }

    /// Admin rotates the shared payroll passcode. The table holds at most
    /// one row; the first rotation creates it.
    pub async fn upsert_passcode(&self, passcode: &str) -> AppResult<AdminAccess> {
        let existing = sqlx::query_as::<_, AdminAccess>(
            "SELECT id, name, passcode, created_at FROM admin_access ORDER BY created_at LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let access = match existing {
            Some(row) => {
                sqlx::query_as::<_, AdminAccess>(
                    r#"
                    UPDATE admin_access SET passcode = $2
                    WHERE id = $1
                    RETURNING id, name, passcode, created_at
                    "#,
                )
                .bind(row.id)
                .bind(passcode)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AdminAccess>(
                    r#"
                    INSERT INTO admin_access (passcode)
                    VALUES ($1)
                    RETURNING id, name, passcode, created_at
                    "#,
                )
                .bind(passcode)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(access)
    }
}
