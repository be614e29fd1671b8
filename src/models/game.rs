use chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool};

use super::now_timestamp;

/// Format accepted from `<input type="datetime-local">`.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Storage format for `game_datetime`; sorts chronologically as text.
const DATETIME_STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, FromRow)]
pub struct Game {
    pub id: i64,
    pub gm_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub game_datetime: String,
    pub location: String,
    pub created_at: String,
}

impl Game {
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.game_datetime, DATETIME_STORAGE_FORMAT).ok()
    }

    /// e.g. "March 4, 2025 at 6:30 PM"
    pub fn display_datetime(&self) -> String {
        match self.scheduled_at() {
            Some(dt) => dt.format("%B %-d, %Y at %-I:%M %p").to_string(),
            None => self.game_datetime.clone(),
        }
    }

    pub async fn create(pool: &SqlitePool, new_game: &NewGame) -> Result<Game, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO games (gm_id, title, description, game_datetime, location, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(new_game.gm_id)
        .bind(&new_game.title)
        .bind(&new_game.description)
        .bind(new_game.game_datetime.format(DATETIME_STORAGE_FORMAT).to_string())
        .bind(&new_game.location)
        .bind(now_timestamp())
        .fetch_one(pool)
        .await
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Game>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Game joined with its host's email, for listing and detail pages.
#[derive(Debug, Clone, FromRow)]
pub struct GameWithHost {
    #[sqlx(flatten)]
    pub game: Game,
    pub host_email: String,
}

impl GameWithHost {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<GameWithHost>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT g.*, u.email AS host_email
            FROM games g
            JOIN users u ON u.id = g.gm_id
            WHERE g.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All games, latest scheduled first.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<GameWithHost>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT g.*, u.email AS host_email
            FROM games g
            JOIN users u ON u.id = g.gm_id
            ORDER BY g.game_datetime DESC, g.id DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct NewGame {
    pub gm_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub game_datetime: NaiveDateTime,
    pub location: String,
}
