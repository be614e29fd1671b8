use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::post,
    Form, Router,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::GameId;
use crate::models::{Game, Rsvp, RsvpEntry, RsvpStatus, User};
use crate::AppState;

#[derive(Template)]
#[template(path = "games/rsvp_section.html")]
struct RsvpSectionTemplate {
    game_id: i64,
    rsvps: Vec<RsvpEntry>,
    current_rsvp: Option<RsvpEntry>,
    rsvp_error: Option<String>,

    user: Option<User>,
}

#[derive(Deserialize)]
pub struct RsvpForm {
    #[serde(default)]
    status: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/games/{id}/rsvp", post(submit_rsvp))
}

async fn submit_rsvp(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    GameId(game_id): GameId,
    Form(form): Form<RsvpForm>,
) -> Result<impl IntoResponse, AppError> {
    if Game::find(&state.db, game_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let rsvp_error = match form.status.parse::<RsvpStatus>() {
        Ok(status) => {
            let rsvp = Rsvp::upsert(&state.db, user.id, game_id, status).await?;
            tracing::info!(game_id, user_id = user.id, %status, rsvp_id = rsvp.id, "rsvp recorded");
            None
        }
        Err(e) => {
            tracing::warn!(game_id, user_id = user.id, "rejected rsvp: {e}");
            Some("Invalid RSVP status value.".to_string())
        }
    };

    // Re-read so the caller sees every RSVP, including ones that landed
    // between their page load and this submission.
    let rsvps = Rsvp::list_for_game(&state.db, game_id).await?;
    let current_rsvp = Rsvp::get_for_user(&state.db, user.id, game_id).await?;

    let template = RsvpSectionTemplate {
        game_id,
        rsvps,
        current_rsvp,
        rsvp_error,

        user: Some(user),
    };
    Ok(Html(template.render()?))
}
