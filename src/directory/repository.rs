use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{Candidate, Client};
use crate::error::AppResult;

const CANDIDATE_COLUMNS: &str = r#"
    id, agent_id, client_id, name, email, role, whatsapp_number, resume_link,
    recording_link, status, show_phone_to_client, rate_per_hour, alias,
    username, password, created_at
"#;

const CLIENT_COLUMNS: &str = "id, name, email, phone_number, access_code, created_at";

/// Candidate and client directory. Admin owns the rows; the engine reads
/// status and rate only.
pub struct DirectoryRepository {
    pool: PgPool,
}

/// Fields accepted when creating or updating a candidate.
#[derive(Debug, Clone)]
pub struct CandidateDraft {
    pub agent_id: Option<String>,
    pub client_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub whatsapp_number: String,
    pub resume_link: String,
    pub recording_link: String,
    pub rate_per_hour: Decimal,
    pub alias: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DirectoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========== CANDIDATES ==========

    pub async fn list_candidates(&self) -> AppResult<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }

    pub async fn list_candidates_for_client(&self, client_id: Uuid) -> AppResult<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE client_id = $1 ORDER BY created_at DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }

    pub async fn get_candidate(&self, id: Uuid) -> AppResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    /// Rep portal identity: the candidate whose external agent id (or own
    /// id, for manually provisioned reps) matches the sync feed.
    pub async fn get_candidate_by_sync_identity(
        &self,
        agent_id: &str,
    ) -> AppResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE agent_id = $1 OR id::text = $1 LIMIT 1"
        ))
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    pub async fn create_candidate(&self, draft: &CandidateDraft) -> AppResult<Candidate> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            r#"
            INSERT INTO candidates (
                agent_id, client_id, name, email, role, whatsapp_number,
                resume_link, recording_link, status, show_phone_to_client,
                rate_per_hour, alias, username, password
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING', FALSE, $9, $10, $11, $12)
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(&draft.agent_id)
        .bind(draft.client_id)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.role)
        .bind(&draft.whatsapp_number)
        .bind(&draft.resume_link)
        .bind(&draft.recording_link)
        .bind(draft.rate_per_hour)
        .bind(&draft.alias)
        .bind(&draft.username)
        .bind(&draft.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(candidate)
    }

    pub async fn update_candidate(
        &self,
        id: Uuid,
        draft: &CandidateDraft,
    ) -> AppResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            r#"
            UPDATE candidates SET
                agent_id = $2, client_id = $3, name = $4, email = $5, role = $6,
                whatsapp_number = $7, resume_link = $8, recording_link = $9,
                rate_per_hour = $10, alias = $11, username = $12, password = $13
            WHERE id = $1
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.agent_id)
        .bind(draft.client_id)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.role)
        .bind(&draft.whatsapp_number)
        .bind(&draft.resume_link)
        .bind(&draft.recording_link)
        .bind(draft.rate_per_hour)
        .bind(&draft.alias)
        .bind(&draft.username)
        .bind(&draft.password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    pub async fn update_candidate_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> AppResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "UPDATE candidates SET status = $2 WHERE id = $1 RETURNING {CANDIDATE_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    /// Payroll's rep-access override: portal credentials and dialer alias.
    pub async fn update_candidate_credentials(
        &self,
        id: Uuid,
        alias: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            r#"
            UPDATE candidates SET alias = $2, username = $3, password = $4
            WHERE id = $1
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(alias)
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    pub async fn delete_candidate(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_candidate_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE username = $1 AND password = $2 LIMIT 1"
        ))
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(candidate)
    }

    // ========== CLIENTS ==========

    pub async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn get_client(&self, id: Uuid) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn create_client(
        &self,
        name: &str,
        email: &str,
        phone_number: &str,
        access_code: &str,
    ) -> AppResult<Client> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (name, email, phone_number, access_code)
            VALUES ($1, $2, $3, $4)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(phone_number)
        .bind(access_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        phone_number: &str,
        access_code: &str,
    ) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients SET name = $2, email = $3, phone_number = $4, access_code = $5
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone_number)
        .bind(access_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Deleting a client unassigns its candidates first; both writes share
    /// a transaction.
    pub async fn delete_client(&self, id: Uuid) -> AppResult<u64> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;

        sqlx::query("UPDATE candidates SET client_id = NULL WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    pub async fn find_client_by_access_code(&self, access_code: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE access_code = $1 LIMIT 1"
        ))
        .bind(access_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }
}
