pub mod chat;
pub mod game;
pub mod rsvp;
pub mod user;

pub use chat::{ChatEntry, ChatError, ChatMessage};
pub use game::{Game, GameWithHost, NewGame};
pub use rsvp::{InvalidStatus, Rsvp, RsvpEntry, RsvpStatus};
pub use user::{CreateUserError, User};

use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as fixed-width RFC 3339 text with microsecond precision.
///
/// Every timestamp column is written through here so that lexical order
/// matches chronological order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Human-friendly rendering of a stored timestamp. Falls back to the raw
/// value when it does not parse.
pub fn format_timestamp(ts: &str) -> String {
    match ts.parse::<DateTime<Utc>>() {
        Ok(dt) => dt.format("%b %-d, %Y %H:%M UTC").to_string(),
        Err(_) => ts.to_string(),
    }
}
