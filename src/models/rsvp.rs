use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use super::now_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum RsvpStatus {
    #[serde(rename = "attending")]
    #[sqlx(rename = "attending")]
    Attending,
    #[serde(rename = "not_attending")]
    #[sqlx(rename = "not_attending")]
    NotAttending,
    #[serde(rename = "maybe")]
    #[sqlx(rename = "maybe")]
    Maybe,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] = [
        RsvpStatus::Attending,
        RsvpStatus::Maybe,
        RsvpStatus::NotAttending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Attending => "attending",
            RsvpStatus::NotAttending => "not_attending",
            RsvpStatus::Maybe => "maybe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsvpStatus::Attending => "Attending",
            RsvpStatus::NotAttending => "Not Attending",
            RsvpStatus::Maybe => "Maybe",
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid RSVP status: {0:?}")]
pub struct InvalidStatus(pub String);

impl FromStr for RsvpStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attending" => Ok(RsvpStatus::Attending),
            "not_attending" => Ok(RsvpStatus::NotAttending),
            "maybe" => Ok(RsvpStatus::Maybe),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Rsvp {
    pub id: i64,
    pub user_id: i64,
    pub game_id: i64,
    pub status: RsvpStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// RSVP joined with the responding user's email.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntry {
    #[sqlx(flatten)]
    pub rsvp: Rsvp,
    pub user_email: String,
}

impl RsvpEntry {
    pub fn updated_display(&self) -> String {
        super::format_timestamp(&self.rsvp.updated_at)
    }
}

impl Rsvp {
    /// Record `status` for the (user, game) pair in a single statement.
    ///
    /// The first call inserts with both timestamps set to now. Later calls
    /// overwrite `status` and `updated_at` and leave `created_at` alone. The
    /// UNIQUE(user_id, game_id) constraint carries the one-row-per-pair
    /// invariant, so concurrent submissions never produce a second row.
    pub async fn upsert(
        pool: &SqlitePool,
        user_id: i64,
        game_id: i64,
        status: RsvpStatus,
    ) -> Result<Rsvp, sqlx::Error> {
        let now = now_timestamp();

        sqlx::query_as(
            r#"
            INSERT INTO rsvps (user_id, game_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id, game_id) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(game_id)
        .bind(status)
        .bind(&now)
        .bind(&now)
        .fetch_one(pool)
        .await
    }

    /// Every RSVP for a game, most recently updated first.
    pub async fn list_for_game(
        pool: &SqlitePool,
        game_id: i64,
    ) -> Result<Vec<RsvpEntry>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT r.*, u.email AS user_email
            FROM rsvps r
            JOIN users u ON u.id = r.user_id
            WHERE r.game_id = ?
            ORDER BY r.updated_at DESC, r.id DESC
            "#,
        )
        .bind(game_id)
        .fetch_all(pool)
        .await
    }

    /// `Ok(None)` means the user has not responded yet.
    pub async fn get_for_user(
        pool: &SqlitePool,
        user_id: i64,
        game_id: i64,
    ) -> Result<Option<RsvpEntry>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT r.*, u.email AS user_email
            FROM rsvps r
            JOIN users u ON u.id = r.user_id
            WHERE r.user_id = ? AND r.game_id = ?
            "#,
        )
        .bind(user_id)
        .bind(game_id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_values() {
        assert_eq!("attending".parse(), Ok(RsvpStatus::Attending));
        assert_eq!("not_attending".parse(), Ok(RsvpStatus::NotAttending));
        assert_eq!("maybe".parse(), Ok(RsvpStatus::Maybe));
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert_eq!(
            "Attending".parse::<RsvpStatus>(),
            Err(InvalidStatus("Attending".to_string()))
        );
        assert!("".parse::<RsvpStatus>().is_err());
        assert!("going".parse::<RsvpStatus>().is_err());
    }

    #[test]
    fn invalid_status_is_a_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(InvalidStatus("going".to_string()));
        assert_eq!(err.to_string(), "invalid RSVP status: \"going\"");
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&RsvpStatus::NotAttending).unwrap();
        assert_eq!(json, "\"not_attending\"");
        let parsed: RsvpStatus = serde_json::from_str("\"maybe\"").unwrap();
        assert_eq!(parsed, RsvpStatus::Maybe);
    }

    #[test]
    fn display_matches_form_values() {
        for status in RsvpStatus::ALL {
            assert_eq!(status.to_string().parse::<RsvpStatus>(), Ok(status));
        }
        assert_eq!(RsvpStatus::NotAttending.label(), "Not Attending");
    }
}
