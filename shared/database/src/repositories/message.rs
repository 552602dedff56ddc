//! Message Repository
//!
//! Persistence for generated communications.
//! Uses runtime SQL queries (unchecked) to avoid requiring DATABASE_URL at compile time.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use procura_models::{GeneratedMessage, MessageType, NewMessage};

pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist one generated message
    pub async fn create(&self, message: NewMessage) -> Result<GeneratedMessage> {
        let row: MessageRow = sqlx::query_as(
            r#"
            INSERT INTO messages (id, analysis_id, message_type, subject, body, recipient, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, analysis_id, message_type, subject, body, recipient, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.analysis_id)
        .bind(message.message_type.as_str())
        .bind(&message.subject)
        .bind(&message.body)
        .bind(&message.recipient)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create message")?;

        Ok(row.into())
    }

    /// Messages of an analysis, newest first
    pub async fn find_by_analysis(&self, analysis_id: Uuid) -> Result<Vec<GeneratedMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, analysis_id, message_type, subject, body, recipient, created_at
            FROM messages
            WHERE analysis_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch messages for analysis")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Messages of an analysis filtered by audience
    pub async fn find_by_analysis_and_type(
        &self,
        analysis_id: Uuid,
        message_type: MessageType,
    ) -> Result<Vec<GeneratedMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, analysis_id, message_type, subject, body, recipient, created_at
            FROM messages
            WHERE analysis_id = $1 AND message_type = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(analysis_id)
        .bind(message_type.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch messages by type")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// A single message, with the ownership check folded into the join
    pub async fn find_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<GeneratedMessage>> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            SELECT m.id, m.analysis_id, m.message_type, m.subject, m.body, m.recipient, m.created_at
            FROM messages m
            JOIN analyses a ON a.id = m.analysis_id
            WHERE m.id = $1 AND a.owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch message")?;

        Ok(row.map(|r| r.into()))
    }
}

/// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    analysis_id: Uuid,
    message_type: String,
    subject: String,
    body: String,
    recipient: String,
    created_at: chrono::DateTime<Utc>,
}

impl From<MessageRow> for GeneratedMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            analysis_id: row.analysis_id,
            message_type: MessageType::from_str(&row.message_type).unwrap_or(MessageType::Supplier),
            subject: row.subject,
            body: row.body,
            recipient: row.recipient,
            created_at: row.created_at,
        }
    }
}
