use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::account::models::UserId;
use crate::domain::email::errors::EmailError;
use crate::domain::email::models::HistoryEntry;
use crate::domain::email::models::HistoryEntryId;
use crate::domain::email::models::NewHistoryEntry;
use crate::domain::email::models::Tone;
use crate::domain::email::ports::EmailHistoryRepository;

pub struct PostgresEmailHistoryRepository {
    pool: PgPool,
}

impl PostgresEmailHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &PgRow) -> Result<HistoryEntry, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let user_id: Uuid = row.try_get("user_id")?;
    let prompt: String = row.try_get("prompt")?;
    let tone: String = row.try_get("tone")?;
    let generated_email: String = row.try_get("generated_email")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(HistoryEntry {
        id: HistoryEntryId(id),
        user_id: UserId(user_id),
        prompt,
        tone: Tone::new(tone),
        generated_email,
        created_at,
    })
}

#[async_trait]
impl EmailHistoryRepository for PostgresEmailHistoryRepository {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, EmailError> {
        let row = sqlx::query(
            r#"
            INSERT INTO email_history (id, user_id, prompt, tone, generated_email, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, user_id, prompt, tone, generated_email, created_at
            "#,
        )
        .bind(HistoryEntryId::new().0)
        .bind(entry.user_id.0)
        .bind(&entry.prompt)
        .bind(entry.tone.as_str())
        .bind(&entry.generated_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EmailError::DatabaseError(e.to_string()))?;

        entry_from_row(&row).map_err(|e| EmailError::DatabaseError(e.to_string()))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, EmailError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, prompt, tone, generated_email, created_at
            FROM email_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EmailError::DatabaseError(e.to_string()))?;

        rows.iter()
            .map(entry_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EmailError::DatabaseError(e.to_string()))
    }
}
