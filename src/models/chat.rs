use sqlx::{FromRow, SqlitePool};

use super::now_timestamp;

#[derive(Debug, Clone, FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub game_id: i64,
    pub user_id: i64,
    pub message_content: String,
    pub created_at: String,
}

/// Chat message joined with its author's email.
#[derive(Debug, Clone, FromRow)]
pub struct ChatEntry {
    #[sqlx(flatten)]
    pub message: ChatMessage,
    pub user_email: String,
}

impl ChatEntry {
    pub fn posted_display(&self) -> String {
        super::format_timestamp(&self.message.created_at)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message content is empty")]
    EmptyContent,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ChatMessage {
    /// Append a message to a game's chat and return it with the author's
    /// email. Content is stored as submitted; it is only trimmed to decide
    /// whether it is blank.
    pub async fn post(
        pool: &SqlitePool,
        game_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<ChatEntry, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent);
        }

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO chat_messages (game_id, user_id, message_content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(game_id)
        .bind(author_id)
        .bind(content)
        .bind(now_timestamp())
        .fetch_one(pool)
        .await?;

        let entry = sqlx::query_as(
            r#"
            SELECT cm.*, u.email AS user_email
            FROM chat_messages cm
            JOIN users u ON u.id = cm.user_id
            WHERE cm.id = ?
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    /// Full transcript for a game, oldest first.
    pub async fn list_for_game(
        pool: &SqlitePool,
        game_id: i64,
    ) -> Result<Vec<ChatEntry>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT cm.*, u.email AS user_email
            FROM chat_messages cm
            JOIN users u ON u.id = cm.user_id
            WHERE cm.game_id = ?
            ORDER BY cm.created_at ASC, cm.id ASC
            "#,
        )
        .bind(game_id)
        .fetch_all(pool)
        .await
    }
}
