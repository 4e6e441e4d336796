use chrono::NaiveDate;
use sqlx::PgPool;

use super::models::{LeaderboardRow, SnapshotRow};
use crate::error::AppResult;

pub struct LeaderboardRepository {
    pool: PgPool,
}

impl LeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist one board as history rows, all stamped with the same date.
    pub async fn insert_snapshot(
        &self,
        synced_date: NaiveDate,
        rows: &[LeaderboardRow],
    ) -> AppResult<u64> {
        let mut inserted = 0;
        for row in rows {
            let result = sqlx::query(
                r#"
                INSERT INTO leaderboard_history (agent_name, synced_date, calls, sets, ranking)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&row.agent_name)
            .bind(synced_date)
            .bind(row.calls as i32)
            .bind(row.sets as i32)
            .bind(row.ranking)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    pub async fn list_history(&self) -> AppResult<Vec<SnapshotRow>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT id, agent_name, synced_date, calls, sets, ranking, created_at
            FROM leaderboard_history
            ORDER BY synced_date DESC, ranking ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
