//! Chat message repository implementation.
//!
//! Only the pipeline coordinator writes analysis messages, always inside
//! the transaction it owns; nothing below the coordinator decides what
//! gets persisted on failure.

use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use landai_core::{AgentType, Error, Message, NewMessage, Result};

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, role_id, content, agent_type, document_id, context_data, created_at";

/// PostgreSQL implementation of message persistence.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

fn message_from_row(row: &PgRow) -> Result<Message> {
    let agent_type = match row.try_get::<Option<String>, _>("agent_type")? {
        Some(tag) => Some(tag.parse::<AgentType>()?),
        None => None,
    };

    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        role_id: row.try_get("role_id")?,
        content: row.try_get("content")?,
        agent_type,
        document_id: row.try_get("document_id")?,
        context_data: row.try_get("context_data")?,
        created_at: row.try_get("created_at")?,
    })
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the seeded `assistant` role id within a transaction.
    pub async fn assistant_role_id_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Uuid> {
        let row = sqlx::query("SELECT id FROM roles WHERE name = 'assistant'")
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(row.try_get("id")?),
            None => Err(Error::Internal(
                "'assistant' role not found; run migrations".to_string(),
            )),
        }
    }

    /// Check that a conversation exists and belongs to the user.
    pub async fn conversation_owned_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM conversations WHERE id = $1 AND user_id = $2")
            .bind(conversation_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        Ok(row.is_some())
    }

    /// Insert a message within the coordinator's transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        msg: &NewMessage,
    ) -> Result<Message> {
        let id = Uuid::now_v7();
        let context_data: Option<JsonValue> = match &msg.context_data {
            Some(ctx) => Some(serde_json::to_value(ctx)?),
            None => None,
        };

        let sql = format!(
            "INSERT INTO messages \
                 (id, conversation_id, role_id, content, agent_type, document_id, context_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {MESSAGE_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(msg.conversation_id)
            .bind(msg.role_id)
            .bind(&msg.content)
            .bind(msg.agent_type.map(|t| t.as_str()))
            .bind(msg.document_id)
            .bind(context_data)
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)?;

        message_from_row(&row)
    }

    /// Messages in a conversation the user owns, oldest first.
    pub async fn list_for_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>> {
        let sql = format!(
            "SELECT m.{} FROM messages m \
             JOIN conversations c ON m.conversation_id = c.id \
             WHERE c.user_id = $1 AND m.conversation_id = $2 \
             ORDER BY m.created_at",
            MESSAGE_COLUMNS.replace(", ", ", m.")
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(conversation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(message_from_row).collect()
    }
}
